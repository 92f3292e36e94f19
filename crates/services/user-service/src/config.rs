//! User service configuration.

use std::env;

use common::{ServiceConfig, DEFAULT_LOG_LEVEL, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT};

/// User service configuration.
#[derive(Debug, Clone)]
pub struct UserServiceConfig {
    /// HTTP server settings
    pub server: ServiceConfig,
}

impl UserServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self {
            server: ServiceConfig {
                service_name: "user-service".to_string(),
                host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
                port: env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(DEFAULT_SERVER_PORT),
                log_level: env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
            },
        }
    }

    /// Override host and port, e.g. from command-line flags.
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.server.host = host;
        }
        if let Some(port) = port {
            self.server.port = port;
        }
        self
    }
}

impl Default for UserServiceConfig {
    fn default() -> Self {
        Self {
            server: ServiceConfig {
                service_name: "user-service".to_string(),
                ..ServiceConfig::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_only_given_values() {
        let config = UserServiceConfig::default().with_overrides(None, Some(8080));
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.service_name, "user-service");
    }
}
