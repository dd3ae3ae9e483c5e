//! Configuration structures consumed by the connection manager.
//!
//! [`LogWriterBuilder`](super::LogWriterBuilder) validates these values before
//! passing them to [`LogWriter`](super::LogWriter) for runtime use.

use std::time::Duration;

use crate::rate_limited_warner::DEFAULT_WARN_INTERVAL;

use super::frame::handshake_payload;

/// Address cutelog listens on out of the box.
pub const DEFAULT_ADDR: &str = "localhost:19996";
/// Serialisation format announced when none is supplied.
pub const DEFAULT_FORMAT: &str = "json";
/// How long construction waits for the first connection attempt.
pub const DEFAULT_CONNECT_WAIT: Duration = Duration::from_millis(100);
/// Fixed delay between failed connection attempts.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(1);
/// Deadline applied to every framed write.
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(2);
/// Upper bound for a single TCP dial.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Largest payload the 4-byte length prefix can describe.
pub const DEFAULT_MAX_FRAME_SIZE: usize = u32::MAX as usize;

/// Address of a cutelog instance plus the format tag announced to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    addr: String,
    format: String,
}

impl Endpoint {
    pub fn new(addr: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            format: format.into(),
        }
    }

    /// Network address, e.g. `localhost:19996`.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Format tag, e.g. `json`, `msgpack` or `cbor`.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Payload of the first frame sent on every new connection.
    pub fn handshake(&self) -> Vec<u8> {
        handshake_payload(&self.format)
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new(DEFAULT_ADDR, DEFAULT_FORMAT)
    }
}

/// Configuration object describing how to construct a [`LogWriter`](super::LogWriter).
#[derive(Clone, Debug)]
pub struct LogWriterConfig {
    pub endpoint: Endpoint,
    pub connect_wait: Duration,
    pub connect_timeout: Duration,
    pub write_timeout: Duration,
    pub max_frame_size: usize,
    pub retry: RetryPolicy,
    pub warn_interval: Duration,
}

impl Default for LogWriterConfig {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::default(),
            connect_wait: DEFAULT_CONNECT_WAIT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            retry: RetryPolicy::default(),
            warn_interval: DEFAULT_WARN_INTERVAL,
        }
    }
}

impl LogWriterConfig {
    /// Override the endpoint.
    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = endpoint;
        self
    }
}

/// Reconnection schedule used by the connect loop.
///
/// Attempts repeat forever at a fixed interval. There is no exponential
/// growth, jitter or attempt cap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub interval: Duration,
}

impl RetryPolicy {
    pub fn fixed(interval: Duration) -> Self {
        Self { interval }
    }

    /// Delay before the next attempt.
    pub fn next_sleep(&self) -> Duration {
        self.interval
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(DEFAULT_RETRY_INTERVAL)
    }
}
