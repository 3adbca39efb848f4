//! HTTP transport module
//!
//! Provides the transport seam used by the pagination walker and its HTTP
//! implementation with retry, rate limiting, and backoff strategies.
//!
//! # Features
//!
//! - **Automatic Retries**: Configurable retry logic with backoff
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Backoff Strategies**: Constant, linear, and exponential backoff
//! - **Pluggable Transport**: The engine only sees the [`Transport`] trait

mod client;
mod rate_limit;
mod transport;

#[cfg(test)]
pub(crate) mod mock;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use transport::Transport;
