//! Shared configuration structures.

/// Default host address to bind.
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default HTTP port.
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Base service configuration shared by all services.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Service name for logging and tracing
    pub service_name: String,
    /// Host address to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Log level
    pub log_level: String,
}

impl ServiceConfig {
    /// Socket address in `host:port` form.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            service_name: "service".to_string(),
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_addr_binds_all_interfaces() {
        assert_eq!(ServiceConfig::default().addr(), "0.0.0.0:3000");
    }
}
