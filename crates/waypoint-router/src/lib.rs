//! Scored segment-tree router for Waypoint.
//!
//! This crate stores route patterns in a segment tree and picks, for every
//! request, the single most specific route that fits the path and has a
//! handler chain for the request method.
//!
//! # Features
//!
//! - **Segment Tree**: one node per path segment, literal nodes shared
//! - **Path Parameters**: named segments bound by position (`/users/:id`)
//! - **Wildcards**: a trailing `*` captures the rest of the path (`/files/*`)
//! - **Specificity Scoring**: literal routes beat parameter routes, which
//!   beat wildcard routes
//! - **Method-Based Routing**: one handler chain per HTTP method, `ANY`
//!   expanded at registration
//!
//! # Example
//!
//! ```rust
//! use waypoint_router::{MethodFilter, Router};
//! use http::Method;
//!
//! let mut router = Router::new();
//!
//! router.add(Method::GET, "/users", ["listUsers"]).unwrap();
//! router.add(Method::GET, "/users/:id", ["getUser"]).unwrap();
//! router.add(MethodFilter::Any, "/files/*", ["serveFile"]).unwrap();
//!
//! let route_match = router.find(&Method::GET, "/users/123").unwrap();
//! assert_eq!(&*route_match.pattern, "/users/:id");
//! assert_eq!(route_match.params.get("id"), Some("123"));
//!
//! let route_match = router.find(&Method::POST, "/files/a/b.txt").unwrap();
//! assert_eq!(route_match.wildcard.as_deref(), Some("a/b.txt"));
//! ```
//!
//! # Architecture
//!
//! Nodes live in an arena and refer to children by index. Matching explores
//! every branch consistent with the path and reduces the candidates by score:
//!
//! ```text
//!                    (root)
//!                      │
//!              ┌───────┴───────┐
//!              │               │
//!            "users"        "files"
//!              │               │
//!        ┌─────┴─────┐        "*"
//!        │           │       [102]
//!      [1001]      ":id"
//!   [GET]            │
//!                  [901]
//!                  [GET]
//! ```

mod error;
mod method_router;
mod node;
mod params;
mod router;
mod segment;
mod shared;

use std::sync::Arc;

pub use error::RouteError;
pub use method_router::{MethodFilter, MethodRouter, METHODS};
pub use params::Params;
pub use router::Router;
pub use segment::{Pattern, Segment};
pub use shared::SharedRouter;

/// A matched route with its handler chain and bound parameters.
#[derive(Debug, Clone)]
pub struct RouteMatch<H> {
    /// The pattern of the winning route, as registered
    pub pattern: Arc<str>,
    /// Bound path parameters
    pub params: Params,
    /// Handler chain for the request method
    pub handlers: Arc<[H]>,
    /// Specificity score of the winning route
    pub score: usize,
    /// Path suffix consumed by a trailing `*`, joined with `/`
    pub wildcard: Option<String>,
}

impl<H> RouteMatch<H> {
    /// Returns a bound parameter value by name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }
}
