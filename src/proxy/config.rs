use serde::{Deserialize, Serialize};

use super::upstream::tls::TransportTrustPolicy;
use crate::error::{AppError, AppResult};

/// Facade service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Allow LAN access
    /// - false: local only 127.0.0.1 (default)
    /// - true: listen on 0.0.0.0
    #[serde(default)]
    pub allow_lan_access: bool,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Base URL of the downstream articles collection
    #[serde(default = "default_articles_url")]
    pub articles_url: String,

    /// Downstream request timeout (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Append the caller's sort specification to downstream list queries
    #[serde(default)]
    pub forward_sort: bool,

    /// Outbound TLS trust policy
    #[serde(default)]
    pub transport: TransportTrustPolicy,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            allow_lan_access: false,
            port: default_port(),
            articles_url: default_articles_url(),
            request_timeout: default_request_timeout(),
            forward_sort: false,
            transport: TransportTrustPolicy::default(),
        }
    }
}

fn default_port() -> u16 {
    9081
}

fn default_articles_url() -> String {
    "https://localhost:9082/api/v1/articles".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl ProxyConfig {
    /// Get the actual listen address
    pub fn get_bind_address(&self) -> &str {
        if self.allow_lan_access {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        }
    }

    /// Reject settings that would leave the facade unable to serve
    pub fn validate(&self) -> AppResult<()> {
        if self.request_timeout == 0 {
            return Err(AppError::Config(
                "request_timeout must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config: ProxyConfig = serde_json::from_value(json!({
            "articles_url": "https://articles.internal/api/v1/articles"
        }))
        .unwrap();

        assert_eq!(config.port, 9081);
        assert_eq!(config.request_timeout, 30);
        assert!(!config.forward_sort);
        assert!(config.transport.is_strict());
        assert_eq!(config.get_bind_address(), "127.0.0.1");
    }

    #[test]
    fn test_unsecure_profile_is_explicit() {
        let config: ProxyConfig = serde_json::from_value(json!({
            "allow_lan_access": true,
            "transport": { "mode": "unsecure" }
        }))
        .unwrap();

        assert_eq!(config.transport, TransportTrustPolicy::TrustAll);
        assert_eq!(config.get_bind_address(), "0.0.0.0");
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let config = ProxyConfig {
            request_timeout: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
        assert!(ProxyConfig::default().validate().is_ok());
    }
}
