//! # Waypoint
//!
//! **Scored segment-tree HTTP router with middleware chains**
//!
//! - **Segment tree**: literal, `:param` and trailing `*` segments
//! - **Specificity scoring**: the most literal route always wins
//! - **Dispatch chains**: middlewares and endpoints share one
//!   [`Handler`](prelude::Handler) trait; an error stops the chain
//! - **Route groups**: shared prefixes and middlewares
//! - **Layered configuration** and structured `tracing` logs
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use waypoint::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigLoader::new()
//!         .with_defaults()
//!         .with_optional_file("waypoint.toml")?
//!         .with_env_prefix("WAYPOINT")
//!         .load()?;
//!     waypoint::init_logging(&config)?;
//!
//!     let app = App::from_config(&config);
//!     app.get("/users/:id", [handler_fn(|ctx| Box::pin(async move {
//!         let id = ctx.param("id").unwrap_or_default().to_string();
//!         ctx.text(StatusCode::OK, id);
//!         Ok(())
//!     }))])?;
//!
//!     waypoint::run(app, &config).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Request → Router (segment tree, best score) → Context → next() → ... → Handler
//!                 ↓ no match                                      ↓ error
//!           not-found chain                           JSON error envelope
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export the member crates
pub use waypoint_config as config;
pub use waypoint_core as core;
pub use waypoint_router as router;
pub use waypoint_server as server;
pub use waypoint_telemetry as telemetry;

use waypoint_config::WaypointConfig;
use waypoint_server::{App, Server, ServerError};
use waypoint_telemetry::{LogConfig, TelemetryError};

/// Installs the global `tracing` subscriber described by `config.logging`.
///
/// # Errors
///
/// Returns an error if the log filter is invalid or a subscriber is
/// already installed.
pub fn init_logging(config: &WaypointConfig) -> Result<(), TelemetryError> {
    waypoint_telemetry::init_logging(&LogConfig::from(&config.logging))
}

/// Serves `app` with the settings in `config` until SIGTERM or SIGINT.
///
/// # Errors
///
/// Returns an error if the configured address is invalid or cannot be bound.
pub async fn run(app: App, config: &WaypointConfig) -> Result<(), ServerError> {
    Server::from_config(app, config).run().await
}

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use waypoint::prelude::*;
///
/// let app = App::new();
/// app.get("/ping", [handler_fn(|ctx| Box::pin(async move {
///     ctx.text(StatusCode::OK, "pong");
///     Ok(())
/// }))])
/// .unwrap();
/// assert_eq!(app.route_count(), 1);
/// ```
pub mod prelude {
    pub use http::{Method, StatusCode};

    pub use waypoint_config::{ConfigLoader, WaypointConfig};
    pub use waypoint_core::{
        handler_fn, named, BoxFuture, BoxedHandler, Context, Handler, HandlerError,
        HandlerResult, RequestId, ResponseExt,
    };
    pub use waypoint_router::{MethodFilter, RouteError, Router};
    pub use waypoint_server::{App, Group, Routes, Server, ShutdownSignal};
}
