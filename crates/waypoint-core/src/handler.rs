//! Handler trait and function adapters.
//!
//! Every entry in a route's chain is a [`Handler`]. Middlewares and
//! endpoints share the trait: a middleware does some work, calls
//! [`Context::next`] to run the rest of the chain and then continues after
//! it returns. A handler that does not call `next` lets the dispatcher move
//! on to the following entry once it returns.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use http::StatusCode;

use crate::context::Context;
use crate::error::HandlerError;

/// A boxed future that is `Send`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Result returned by every handler in a chain.
pub type HandlerResult = Result<(), HandlerError>;

/// An entry in a handler chain.
///
/// # Example
///
/// ```
/// use waypoint_core::{BoxFuture, Context, Handler, HandlerResult};
/// use http::StatusCode;
///
/// struct Hello;
///
/// impl Handler for Hello {
///     fn call<'a>(&'a self, ctx: &'a mut Context) -> BoxFuture<'a, HandlerResult> {
///         Box::pin(async move {
///             ctx.text(StatusCode::OK, "hello");
///             Ok(())
///         })
///     }
/// }
/// ```
pub trait Handler: Send + Sync + 'static {
    /// Name used in logs and route dumps.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Runs the handler against the request context.
    ///
    /// # Errors
    ///
    /// Returning an error stops the chain. Entries after this one do not
    /// run, and middlewares waiting in [`Context::next`] receive the error.
    fn call<'a>(&'a self, ctx: &'a mut Context) -> BoxFuture<'a, HandlerResult>;
}

/// A shared, type-erased handler.
pub type BoxedHandler = Arc<dyn Handler>;

/// Wraps an async closure as a [`Handler`].
pub struct FnHandler<F> {
    name: String,
    func: F,
}

impl<F> FnHandler<F>
where
    F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, HandlerResult> + Send + Sync + 'static,
{
    /// Creates a named function handler.
    #[must_use]
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Handler for FnHandler<F>
where
    F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, HandlerResult> + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn call<'a>(&'a self, ctx: &'a mut Context) -> BoxFuture<'a, HandlerResult> {
        (self.func)(ctx)
    }
}

impl<F> fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Turns an async closure into a [`BoxedHandler`].
///
/// # Example
///
/// ```
/// use waypoint_core::handler_fn;
/// use http::StatusCode;
///
/// let hello = handler_fn(|ctx| {
///     Box::pin(async move {
///         ctx.text(StatusCode::OK, "hello");
///         Ok(())
///     })
/// });
/// assert!(hello.name().contains("closure"));
/// ```
pub fn handler_fn<F>(func: F) -> BoxedHandler
where
    F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, HandlerResult> + Send + Sync + 'static,
{
    Arc::new(FnHandler::new(std::any::type_name::<F>(), func))
}

/// Like [`handler_fn`] but with an explicit name.
pub fn named<F>(name: impl Into<String>, func: F) -> BoxedHandler
where
    F: for<'a> Fn(&'a mut Context) -> BoxFuture<'a, HandlerResult> + Send + Sync + 'static,
{
    Arc::new(FnHandler::new(name, func))
}

/// The default last entry of the not-found chain: a plain-text 404.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotFound;

impl Handler for NotFound {
    fn name(&self) -> &str {
        "not_found"
    }

    fn call<'a>(&'a self, ctx: &'a mut Context) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move {
            ctx.text(StatusCode::NOT_FOUND, "Not Found");
            Ok(())
        })
    }
}
