//! A router handle that can be registered against while serving.

use std::sync::Arc;

use http::Method;
use parking_lot::RwLock;

use crate::error::RouteError;
use crate::method_router::MethodFilter;
use crate::router::Router;
use crate::RouteMatch;

/// A cloneable, lock-protected [`Router`].
///
/// Matches take the read lock and registrations take the write lock, so
/// routes can be added after requests have started flowing. Clones share
/// the same tree.
///
/// # Example
///
/// ```rust
/// use waypoint_router::SharedRouter;
/// use http::Method;
///
/// let router = SharedRouter::default();
/// let registrar = router.clone();
///
/// registrar.add(Method::GET, "/health", ["health"]).unwrap();
/// assert!(router.find(&Method::GET, "/health").is_some());
/// ```
#[derive(Debug)]
pub struct SharedRouter<H> {
    inner: Arc<RwLock<Router<H>>>,
}

impl<H> Clone for SharedRouter<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<H> Default for SharedRouter<H> {
    fn default() -> Self {
        Self::new(Router::new())
    }
}

impl<H> SharedRouter<H> {
    /// Wraps an existing router.
    #[must_use]
    pub fn new(router: Router<H>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(router)),
        }
    }

    /// Finds the best route under the read lock.
    #[must_use]
    pub fn find(&self, method: &Method, path: &str) -> Option<RouteMatch<H>> {
        self.inner.read().find(method, path)
    }

    /// Number of successful registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns true if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Renders the route tree.
    #[must_use]
    pub fn dump(&self) -> String {
        self.inner.read().dump()
    }
}

impl<H: Clone> SharedRouter<H> {
    /// Registers a route under the write lock.
    ///
    /// # Errors
    ///
    /// Same as [`Router::add`].
    pub fn add<I>(
        &self,
        method: impl Into<MethodFilter>,
        pattern: &str,
        handlers: I,
    ) -> Result<(), RouteError>
    where
        I: IntoIterator<Item = H>,
    {
        self.inner.write().add(method, pattern, handlers)
    }
}

impl<H> From<Router<H>> for SharedRouter<H> {
    fn from(router: Router<H>) -> Self {
        Self::new(router)
    }
}
