//! High-level router API.
//!
//! This module provides the main [`Router`] struct which is the primary
//! interface for registering and matching routes.

use std::collections::HashMap;

use http::Method;

use crate::error::RouteError;
use crate::method_router::{method_slot, MethodFilter};
use crate::node::{Leaf, NodeId, Tree};
use crate::params::Params;
use crate::segment::{split_path, Pattern};
use crate::RouteMatch;

/// A scored segment-tree router.
///
/// Routes are registered with an ordered chain of handlers of any cloneable
/// type `H`. A request is matched by collecting every route structurally
/// consistent with its path and keeping the most specific one that has a
/// chain for the request method.
///
/// # Example
///
/// ```rust
/// use waypoint_router::Router;
/// use http::Method;
///
/// let mut router = Router::new();
/// router.add(Method::GET, "/1/users/:id", ["getUser"]).unwrap();
/// router.add(Method::GET, "/1/functions/*", ["callFunction"]).unwrap();
///
/// let found = router.find(&Method::GET, "/1/users/abc").unwrap();
/// assert_eq!(found.params.get("id"), Some("abc"));
/// assert_eq!(&*found.handlers, &["getUser"]);
///
/// assert!(router.find(&Method::DELETE, "/1/users/abc").is_none());
/// ```
///
/// # Route Priority
///
/// Every route gets a specificity score when it is registered:
///
/// 1. **Literal routes** (e.g., `/users/me`) score highest
/// 2. **Parameter routes** (e.g., `/users/:id`) lose one step per parameter
/// 3. **Wildcard routes** (e.g., `/files/*`) score lowest, longer prefixes
///    ahead of shorter ones
///
/// Equal scores go to the route registered first.
#[derive(Debug, Clone)]
pub struct Router<H> {
    tree: Tree<H>,
    /// Fully literal routes by case-folded path
    static_routes: HashMap<String, NodeId>,
    strict_params: bool,
    route_count: usize,
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Router<H> {
    /// Creates a new empty router.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: Tree::new(),
            static_routes: HashMap::new(),
            strict_params: false,
            route_count: 0,
        }
    }

    /// Rejects a second parameter spelling at a position that already has
    /// one, instead of giving it its own branch.
    #[must_use]
    pub fn with_strict_params(mut self, strict: bool) -> Self {
        self.strict_params = strict;
        self
    }

    /// Whether strict parameter naming is enabled.
    #[must_use]
    pub fn strict_params(&self) -> bool {
        self.strict_params
    }

    /// Number of successful registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.route_count
    }

    /// Returns true if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.route_count == 0
    }

    /// Renders the route tree for diagnostics.
    ///
    /// One line per node: indentation by depth, the segment, the score in
    /// brackets, whether a route terminates there, then the methods it
    /// answers.
    #[must_use]
    pub fn dump(&self) -> String {
        self.tree.dump()
    }

    /// Finds the best route for `method` and `path`.
    ///
    /// Literals are compared case-insensitively; bound parameter values and
    /// the wildcard suffix keep the request's original case. Returns `None`
    /// when no route has a chain for the method, which covers both unknown
    /// paths and known paths registered under other methods.
    #[must_use]
    pub fn find(&self, method: &Method, path: &str) -> Option<RouteMatch<H>> {
        let slot = method_slot(method)?;
        let parts: Vec<&str> = split_path(path).collect();
        let folded_path = path.to_lowercase();
        let folded: Vec<&str> = split_path(&folded_path).collect();

        if let Some(&id) = self.static_routes.get(&folded.join("/")) {
            if let Some(found) = self.build_match(id, slot, &parts) {
                return Some(found);
            }
        }

        let mut candidates = Vec::new();
        self.tree.collect(Tree::<H>::ROOT, &folded, &mut candidates);

        let winner = candidates
            .into_iter()
            .filter_map(|id| {
                let leaf = self.tree.leaf(id)?;
                let order = leaf.methods.order_at(slot)?;
                Some((id, leaf.score, order))
            })
            .max_by(|(_, a_score, a_order), (_, b_score, b_order)| {
                a_score.cmp(b_score).then_with(|| b_order.cmp(a_order))
            })
            .map(|(id, _, _)| id);

        match winner {
            Some(id) => self.build_match(id, slot, &parts),
            None => {
                tracing::trace!(method = %method, path = %path, "no route matched");
                None
            }
        }
    }

    fn build_match(&self, id: NodeId, slot: usize, parts: &[&str]) -> Option<RouteMatch<H>> {
        let leaf: &Leaf<H> = self.tree.leaf(id)?;
        let handlers = leaf.methods.chain_at(slot)?.clone();
        let params = Params::bind(&leaf.variable_names, parts);
        let wildcard = leaf.has_wildcard.then(|| {
            parts
                .get(leaf.variable_names.len()..)
                .unwrap_or_default()
                .join("/")
        });

        Some(RouteMatch {
            pattern: leaf.pattern.clone(),
            params,
            handlers,
            score: leaf.score,
            wildcard,
        })
    }
}

impl<H: Clone> Router<H> {
    /// Registers a handler chain for `method` and `pattern`.
    ///
    /// Registering the same method and pattern again appends to the
    /// existing chain. [`MethodFilter::Any`] registers under all nine
    /// routable methods.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError`] if the pattern is malformed, the method is an
    /// extension method, the chain is empty, or strict mode finds a
    /// parameter naming conflict. Nothing is registered on error.
    pub fn add<I>(
        &mut self,
        method: impl Into<MethodFilter>,
        pattern: &str,
        handlers: I,
    ) -> Result<(), RouteError>
    where
        I: IntoIterator<Item = H>,
    {
        let filter = method.into();
        filter.slots()?;

        let handlers: Vec<H> = handlers.into_iter().collect();
        if handlers.is_empty() {
            return Err(RouteError::NoHandlers {
                pattern: pattern.to_string(),
            });
        }

        let parsed = Pattern::parse(pattern)?;
        let id = self
            .tree
            .insert(&parsed, self.strict_params)?;
        if let Some(leaf) = self.tree.leaf_mut(id) {
            leaf.methods.append(&filter, &handlers, self.route_count)?;
        }
        if let Some(key) = parsed.static_key() {
            self.static_routes.entry(key).or_insert(id);
        }
        self.route_count += 1;

        tracing::debug!(
            method = %filter,
            pattern = %pattern,
            score = parsed.score(),
            handlers = handlers.len(),
            "route registered"
        );
        Ok(())
    }
}
