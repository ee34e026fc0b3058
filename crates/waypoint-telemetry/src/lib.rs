//! Structured logging setup for Waypoint.
//!
//! Every Waypoint crate logs through `tracing`. This crate owns the one
//! place where a subscriber is installed:
//!
//! - **Logging**: JSON, pretty or compact `fmt` output behind an `EnvFilter`
//! - **Field names**: shared constants in [`logging::fields`]
//! - **Request macros**: [`log_request_start!`], [`log_request_complete!`]
//!   and [`log_request_error!`]
//!
//! # Example
//!
//! ```rust,ignore
//! use waypoint_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//! tracing::debug!("ready");
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig, LogFormat};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
