//! xgraph HTTP - authenticated request execution for the xgraph client.
//!
//! This crate provides:
//! - The [`Transport`] seam the client core consumes.
//! - A `reqwest`-backed [`HttpTransport`] carrying auth headers and timeouts.
//! - Retry with exponential backoff and `Retry-After` support.
//! - Request metrics.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

mod config;
mod error;
mod retry;
mod transport;

pub use config::{RetryConfig, TransportConfig};
pub use error::{HttpErrorInfo, TransportError, TransportResult};
pub use reqwest::Method;
pub use retry::{RetryDecision, RetryPolicy};
pub use transport::{HttpTransport, Transport, TransportMetrics, TransportMetricsSnapshot};
