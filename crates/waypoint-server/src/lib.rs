//! HTTP adapter for Waypoint.
//!
//! This crate connects the router and the dispatch chain to the network:
//!
//! - [`App`]: registration facade and per-request dispatch
//! - [`Routes`]: `get`, `post`, ... shared by apps and groups
//! - [`Group`]: prefix and middleware shared by a set of routes
//! - [`Server`]: hyper HTTP/1.1 listener with request timeout and graceful
//!   shutdown
//!
//! # Example
//!
//! ```rust,ignore
//! use http::StatusCode;
//! use waypoint_config::ConfigLoader;
//! use waypoint_core::handler_fn;
//! use waypoint_server::{App, Routes, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigLoader::new().with_defaults().with_env_prefix("WAYPOINT").load()?;
//!     let app = App::from_config(&config);
//!
//!     app.get("/health", [handler_fn(|ctx| Box::pin(async move {
//!         ctx.text(StatusCode::OK, "ok");
//!         Ok(())
//!     }))])?;
//!
//!     Server::from_config(app, &config).run().await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

mod app;
mod error;
mod server;
mod shutdown;

pub use app::{App, Group, Routes};
pub use error::ServerError;
pub use server::Server;
pub use shutdown::{ConnectionToken, ConnectionTracker, ShutdownSignal};
