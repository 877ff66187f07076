//! Client configuration.

use serde::{Deserialize, Serialize};
use xgraph_http::TransportConfig;

/// Configuration for [`XGraphClient::from_config`](crate::XGraphClient::from_config).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL the persisted-query paths are appended to
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Authentication, timeout and retry settings
    #[serde(default)]
    pub transport: TransportConfig,
}

fn default_api_url() -> String {
    "https://twitter.com/i/api".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            transport: TransportConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_public_api() {
        let config: ClientConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(config.api_url, "https://twitter.com/i/api");
        assert!(config.transport.bearer_token.is_none());
    }

    #[test]
    fn nested_transport_settings_are_read() {
        let config: ClientConfig = serde_json::from_value(serde_json::json!({
            "api_url": "http://127.0.0.1:8080",
            "transport": { "bearer_token": "AAAA", "timeout": 10 }
        }))
        .unwrap();
        assert_eq!(config.api_url, "http://127.0.0.1:8080");
        assert_eq!(config.transport.bearer_token.as_deref(), Some("AAAA"));
        assert_eq!(config.transport.timeout.as_secs(), 10);
    }
}
