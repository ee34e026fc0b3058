//! Main configuration types.
//!
//! This module provides the top-level [`WaypointConfig`] struct and its builder.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, LoggingConfig, RouterConfig, ServerConfig};

/// Complete Waypoint configuration.
///
/// This is the root configuration type that contains all configuration sections.
/// Use [`ConfigLoader`](crate::ConfigLoader) to load configuration from files
/// and environment variables.
///
/// # Example
///
/// ```
/// use waypoint_config::WaypointConfig;
///
/// let config = WaypointConfig::default();
/// assert_eq!(config.server.http_addr, "0.0.0.0:8080");
/// assert!(!config.router.strict_params);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct WaypointConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Router configuration.
    #[serde(default)]
    pub router: RouterConfig,
}

impl WaypointConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> WaypointConfigBuilder {
        WaypointConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - Server address is not a socket address
    /// - Request timeout is zero
    /// - Log level is not a valid filter
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self
            .server
            .http_addr
            .parse::<std::net::SocketAddr>()
            .is_err()
        {
            return Err(ConfigError::invalid_value(
                "server.http_addr",
                format!("invalid socket address: {}", self.server.http_addr),
            ));
        }

        if self.server.request_timeout_ms == 0 {
            return Err(ConfigError::invalid_value(
                "server.request_timeout_ms",
                "must be greater than zero",
            ));
        }

        if let Err(e) = waypoint_telemetry::create_env_filter(&self.logging.level) {
            return Err(ConfigError::invalid_value("logging.level", e.to_string()));
        }

        Ok(())
    }

    /// Create a development configuration preset.
    ///
    /// - Pretty log formatting with ANSI colors
    /// - Debug log level
    /// - Route tree logged at startup
    ///
    /// # Example
    ///
    /// ```
    /// use waypoint_config::WaypointConfig;
    ///
    /// let config = WaypointConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// assert!(config.router.dump_routes);
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.logging.level = "debug".to_string();
        config.logging.format = crate::LogFormat::Pretty;
        config.logging.ansi_enabled = true;
        config.logging.include_location = true;

        config.router.dump_routes = true;

        config
    }

    /// Create a production configuration preset.
    ///
    /// - JSON log formatting
    /// - Info log level
    /// - Strict parameter naming
    ///
    /// # Example
    ///
    /// ```
    /// use waypoint_config::WaypointConfig;
    ///
    /// let config = WaypointConfig::production();
    /// assert_eq!(config.logging.format, waypoint_config::LogFormat::Json);
    /// ```
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();

        config.logging.level = "info".to_string();
        config.logging.format = crate::LogFormat::Json;
        config.logging.ansi_enabled = false;

        config.router.strict_params = true;

        config
    }
}

/// Builder for [`WaypointConfig`].
#[derive(Debug, Default)]
pub struct WaypointConfigBuilder {
    server: Option<ServerConfig>,
    logging: Option<LoggingConfig>,
    router: Option<RouterConfig>,
}

impl WaypointConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server configuration.
    #[must_use]
    pub fn server(mut self, server: ServerConfig) -> Self {
        self.server = Some(server);
        self
    }

    /// Set the logging configuration.
    #[must_use]
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Set the router configuration.
    #[must_use]
    pub fn router(mut self, router: RouterConfig) -> Self {
        self.router = Some(router);
        self
    }

    /// Build the configuration.
    ///
    /// Any unset sections will use their default values.
    #[must_use]
    pub fn build(self) -> WaypointConfig {
        WaypointConfig {
            server: self.server.unwrap_or_default(),
            logging: self.logging.unwrap_or_default(),
            router: self.router.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<WaypointConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WaypointConfig::default();
        assert_eq!(config.server.http_addr, "0.0.0.0:8080");
        assert_eq!(config.logging.level, "info");
        assert!(!config.router.strict_params);
        assert!(!config.router.dump_routes);
    }

    #[test]
    fn test_builder_sections() {
        let config = WaypointConfig::builder()
            .server(ServerConfig {
                http_addr: "127.0.0.1:3000".to_string(),
                ..Default::default()
            })
            .router(RouterConfig {
                strict_params: true,
                ..Default::default()
            })
            .build();

        assert_eq!(config.server.http_addr, "127.0.0.1:3000");
        assert!(config.router.strict_params);
        // Other sections use defaults
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(WaypointConfig::default().validate().is_ok());
        assert!(WaypointConfig::development().validate().is_ok());
        assert!(WaypointConfig::production().validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_server_addr() {
        let config = WaypointConfig::builder()
            .server(ServerConfig {
                http_addr: "not-an-address".to_string(),
                ..Default::default()
            })
            .build();

        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("http_addr"));
    }

    #[test]
    fn test_validate_zero_request_timeout() {
        let config = WaypointConfig::builder()
            .server(ServerConfig {
                request_timeout_ms: 0,
                ..Default::default()
            })
            .build();

        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("request_timeout_ms"));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let config = WaypointConfig::builder()
            .logging(LoggingConfig {
                level: "waypoint=loud".to_string(),
                ..Default::default()
            })
            .build();

        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("logging.level"));
    }

    #[test]
    fn test_development_preset() {
        let config = WaypointConfig::development();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, crate::LogFormat::Pretty);
        assert!(config.logging.ansi_enabled);
        assert!(config.router.dump_routes);
        assert!(!config.router.strict_params);
    }

    #[test]
    fn test_production_preset() {
        let config = WaypointConfig::production();
        assert_eq!(config.logging.format, crate::LogFormat::Json);
        assert!(!config.logging.ansi_enabled);
        assert!(config.router.strict_params);
    }

    #[test]
    fn test_build_validated_failure() {
        let result = WaypointConfig::builder()
            .server(ServerConfig {
                http_addr: "invalid".to_string(),
                ..Default::default()
            })
            .build_validated();

        assert!(result.is_err());
    }

    #[test]
    fn test_toml_serialization() {
        let config = WaypointConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[server]"));
        assert!(toml_str.contains("[logging]"));
        assert!(toml_str.contains("[router]"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let toml_str = r#"
            [router]
            strict_params = true
            case_sensitive = true
        "#;

        let result: Result<WaypointConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }
}
