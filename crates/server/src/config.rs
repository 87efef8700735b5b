//! Server configuration

use anyhow::Result;
use serde::Deserialize;

/// Server configuration, loaded from `SIZER_*` environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Instance name used in structured log events
    #[serde(default = "default_instance_name")]
    pub instance_name: String,

    /// API server port
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Simulated backend round-trip latency in milliseconds
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,

    /// Upper bound on a single submit in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_instance_name() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "sizer".to_string())
}

fn default_api_port() -> u16 {
    8080
}

fn default_latency_ms() -> u64 {
    1500
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl ServerConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("SIZER"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_else(|_| ServerConfig {
            instance_name: default_instance_name(),
            api_port: default_api_port(),
            latency_ms: default_latency_ms(),
            timeout_ms: default_timeout_ms(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_environment() {
        let config = ServerConfig::load().unwrap();
        assert_eq!(config.api_port, 8080);
        assert_eq!(config.latency_ms, 1500);
        assert_eq!(config.timeout_ms, 10_000);
        assert!(!config.instance_name.is_empty());
    }
}
