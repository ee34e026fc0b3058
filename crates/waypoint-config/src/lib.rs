//! Typed configuration for Waypoint.
//!
//! This crate provides a strongly-typed configuration system with support for:
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Overview
//!
//! [`WaypointConfig`] holds three sections:
//!
//! - [`ServerConfig`] - HTTP adapter settings (address, timeouts)
//! - [`LoggingConfig`] - log level and output format
//! - [`RouterConfig`] - strict parameter naming and route tree dumps
//!
//! # Example
//!
//! ```no_run
//! use waypoint_config::{ConfigLoader, WaypointConfig};
//!
//! # fn main() -> Result<(), waypoint_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_defaults()
//!     .with_file("waypoint.toml")?
//!     .with_env_prefix("WAYPOINT")
//!     .load()?;
//!
//! println!("Server will listen on: {}", config.server.http_addr);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [server]
//! http_addr = "0.0.0.0:8080"
//! shutdown_timeout_secs = 30
//! request_timeout_ms = 30000
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//!
//! [router]
//! strict_params = false
//! dump_routes = true
//! ```
//!
//! # Environment Variable Overrides
//!
//! Every value can be overridden with `PREFIX__SECTION__KEY`, e.g.
//! `WAYPOINT__SERVER__HTTP_ADDR=0.0.0.0:9000` or
//! `WAYPOINT__LOGGING__FORMAT=pretty`.

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::{WaypointConfig, WaypointConfigBuilder};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{LoggingConfig, RouterConfig, ServerConfig};
pub use waypoint_telemetry::LogFormat;
