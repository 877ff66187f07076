//! The transport seam and its reqwest implementation.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};
use reqwest::{Client, Method};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::TransportConfig;
use crate::error::{TransportError, TransportResult};
use crate::retry::{RetryDecision, RetryPolicy};

/// Executes one authenticated request and hands back the raw body.
///
/// Implementations own authentication, timeouts and retries. Callers treat
/// every error as opaque.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform `method url?query` and return the response body.
    async fn perform_request(
        &self,
        method: Method,
        url: &str,
        query: &[(String, String)],
    ) -> TransportResult<Vec<u8>>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn perform_request(
        &self,
        method: Method,
        url: &str,
        query: &[(String, String)],
    ) -> TransportResult<Vec<u8>> {
        (**self).perform_request(method, url, query).await
    }
}

/// Transport metrics.
#[derive(Debug, Default)]
#[allow(clippy::struct_field_names)]
pub struct TransportMetrics {
    requests_total: AtomicU64,
    requests_success: AtomicU64,
    requests_error: AtomicU64,
    requests_retried: AtomicU64,
}

impl TransportMetrics {
    /// Snapshot current metrics.
    #[must_use]
    pub fn snapshot(&self) -> TransportMetricsSnapshot {
        TransportMetricsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            requests_success: self.requests_success.load(Ordering::Relaxed),
            requests_error: self.requests_error.load(Ordering::Relaxed),
            requests_retried: self.requests_retried.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_field_names)]
pub struct TransportMetricsSnapshot {
    /// Logical requests started.
    pub requests_total: u64,
    /// Requests that returned a success status.
    pub requests_success: u64,
    /// Requests that failed after all attempts.
    pub requests_error: u64,
    /// Retries performed.
    pub requests_retried: u64,
}

/// HTTP transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    retry: RetryPolicy,
    metrics: Arc<TransportMetrics>,
}

impl HttpTransport {
    /// Create a transport from configuration.
    pub fn new(config: &TransportConfig) -> TransportResult<Self> {
        let http = Client::builder()
            .default_headers(default_headers(config)?)
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            retry: RetryPolicy::from(&config.retry),
            metrics: Arc::new(TransportMetrics::default()),
        })
    }

    /// Replace the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Return a metrics snapshot.
    #[must_use]
    pub fn metrics(&self) -> TransportMetricsSnapshot {
        self.metrics.snapshot()
    }

    async fn send_once(&self, method: Method, url: Url) -> TransportResult<Vec<u8>> {
        let response = self.http.request(method, url).send().await?;

        let status = response.status();
        let retry_after = parse_retry_after(response.headers());
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(TransportError::HttpStatus {
                status,
                body: truncate_body(&bytes),
                retry_after,
            });
        }

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, query), fields(params = query.len()))]
    async fn perform_request(
        &self,
        method: Method,
        url: &str,
        query: &[(String, String)],
    ) -> TransportResult<Vec<u8>> {
        let mut target = Url::parse(url).map_err(|err| TransportError::InvalidUrl {
            url: url.to_string(),
            message: err.to_string(),
        })?;
        if !query.is_empty() {
            target.query_pairs_mut().extend_pairs(query);
        }

        self.metrics.requests_total.fetch_add(1, Ordering::Relaxed);
        let mut attempt = 1;
        loop {
            debug!(attempt, %method, path = target.path(), "sending request");
            match self.send_once(method.clone(), target.clone()).await {
                Ok(bytes) => {
                    self.metrics
                        .requests_success
                        .fetch_add(1, Ordering::Relaxed);
                    return Ok(bytes);
                }
                Err(err) => match self.retry.decide(&err, attempt) {
                    RetryDecision::RetryAfter(delay) => {
                        warn!(
                            attempt,
                            delay_ms = delay.as_millis(),
                            error = %err,
                            "retrying request"
                        );
                        self.metrics
                            .requests_retried
                            .fetch_add(1, Ordering::Relaxed);
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    RetryDecision::DoNotRetry => {
                        self.metrics.requests_error.fetch_add(1, Ordering::Relaxed);
                        return Err(err);
                    }
                },
            }
        }
    }
}

fn default_headers(config: &TransportConfig) -> TransportResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    if let Some(token) = &config.bearer_token {
        let value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|err| TransportError::Config(format!("invalid bearer token: {err}")))?;
        headers.insert(AUTHORIZATION, value);
    }
    for (name, value) in &config.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|err| TransportError::Config(format!("invalid header name {name}: {err}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|err| TransportError::Config(format!("invalid value for {name}: {err}")))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(RETRY_AFTER)?.to_str().ok()?;
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

fn truncate_body(bytes: &[u8]) -> String {
    const MAX_LEN: usize = 4096;
    let mut body = String::from_utf8_lossy(bytes).to_string();
    if body.len() > MAX_LEN {
        let mut cut = MAX_LEN;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push('…');
    }
    body
}
