//! Request context, handler chain and error types for Waypoint.
//!
//! The router in `waypoint-router` picks a handler chain for a request.
//! This crate defines what a chain entry is and how the chain runs:
//!
//! - [`Handler`]: one entry of a chain, middleware or endpoint
//! - [`Context`]: per-request state, bound parameters and the written response
//! - [`Context::next`]: runs the rest of the chain and stops at the first error
//! - [`HandlerError`]: typed failure mapped to an HTTP status
//!
//! # Example
//!
//! ```
//! use http::StatusCode;
//! use waypoint_core::{handler_fn, BoxedHandler, Context, HandlerError};
//!
//! let auth = handler_fn(|ctx| {
//!     Box::pin(async move {
//!         if ctx.headers().contains_key("authorization") {
//!             ctx.next().await
//!         } else {
//!             Err(HandlerError::unauthorized("missing credentials"))
//!         }
//!     })
//! });
//! let endpoint = handler_fn(|ctx| {
//!     Box::pin(async move {
//!         ctx.text(StatusCode::OK, "secret");
//!         Ok(())
//!     })
//! });
//!
//! let request = http::Request::get("/secret").body(Default::default()).unwrap();
//! let chain: Vec<BoxedHandler> = vec![auth, endpoint];
//! let mut ctx = Context::not_found(request, chain);
//!
//! let err = tokio_test::block_on(ctx.next()).unwrap_err();
//! assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
//! assert!(!ctx.is_committed());
//! ```

#![warn(missing_docs)]

mod context;
mod error;
mod handler;
mod types;

pub use context::{Context, RequestId, REQUEST_ID_HEADER};
pub use error::{ErrorKind, HandlerError};
pub use handler::{
    handler_fn, named, BoxFuture, BoxedHandler, FnHandler, Handler, HandlerResult, NotFound,
};
pub use types::{Request, Response, ResponseExt};
