//! Transport configuration.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for [`HttpTransport`](crate::HttpTransport).
///
/// Authentication is carried entirely by headers: the bearer token plus any
/// session headers (`x-csrf-token`, `cookie`, ...) the caller obtained
/// elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Bearer token sent as `Authorization: Bearer <token>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearer_token: Option<String>,

    /// Extra headers applied to every request
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// User agent (default: `xgraph-http/<version>`)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout
    #[serde(default = "default_timeout", with = "duration_secs")]
    pub timeout: Duration,

    /// Retry configuration
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_user_agent() -> String {
    format!("xgraph-http/{}", env!("CARGO_PKG_VERSION"))
}

const fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

/// Retry configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum attempts, including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial delay between retries in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay between retries in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Upper bound of random jitter added to each delay, in milliseconds
    #[serde(default = "default_jitter_ms")]
    pub jitter_ms: u64,
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_initial_delay_ms() -> u64 {
    1000
}

const fn default_max_delay_ms() -> u64 {
    60_000
}

const fn default_jitter_ms() -> u64 {
    150
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            jitter_ms: default_jitter_ms(),
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            bearer_token: None,
            headers: BTreeMap::new(),
            user_agent: default_user_agent(),
            timeout: default_timeout(),
            retry: RetryConfig::default(),
        }
    }
}
