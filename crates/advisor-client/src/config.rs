//! Configuration for the analysis-service client

use crate::error::{ClientError, Result};
use std::time::Duration;

/// Default endpoint of the analysis service.
const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/ask_agent";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`AgentClient`](crate::AgentClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Full URL of the query endpoint
    pub endpoint: String,

    /// Request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Build a config from the environment.
    ///
    /// Reads `ADVISOR_ENDPOINT` (falling back to the default local service
    /// address) and optionally `ADVISOR_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        let endpoint =
            std::env::var("ADVISOR_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());

        let mut config = Self::new(endpoint);
        if let Ok(raw) = std::env::var("ADVISOR_TIMEOUT_SECS") {
            let secs: u64 = raw.parse().map_err(|_| {
                ClientError::Config(format!("ADVISOR_TIMEOUT_SECS is not a number: {raw}"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// Set a custom endpoint URL
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the request timeout in seconds
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_local_service() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint, "http://127.0.0.1:5000/ask_agent");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn builder_overrides() {
        let config = ClientConfig::default()
            .with_endpoint("https://advisor.example.com/ask_agent")
            .with_timeout_secs(5);
        assert_eq!(config.endpoint, "https://advisor.example.com/ask_agent");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn from_env_reads_endpoint_and_timeout() {
        unsafe {
            std::env::set_var("ADVISOR_ENDPOINT", "http://10.0.0.2:5000/ask_agent");
            std::env::set_var("ADVISOR_TIMEOUT_SECS", "7");
        }

        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.endpoint, "http://10.0.0.2:5000/ask_agent");
        assert_eq!(config.timeout, Duration::from_secs(7));

        unsafe {
            std::env::remove_var("ADVISOR_ENDPOINT");
            std::env::remove_var("ADVISOR_TIMEOUT_SECS");
        }
    }

    #[test]
    fn from_env_rejects_bad_timeout() {
        unsafe {
            std::env::set_var("ADVISOR_TIMEOUT_SECS", "soon");
        }
        let result = ClientConfig::from_env();
        assert!(matches!(result, Err(ClientError::Config(_))));
        unsafe {
            std::env::remove_var("ADVISOR_TIMEOUT_SECS");
        }
    }
}
