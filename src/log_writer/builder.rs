//! Builder for [`LogWriter`].
//!
//! Exposes the endpoint, timeout tuning and the retry interval. Values are
//! validated in [`LogWriterBuilder::build_config`] so a misconfigured writer is
//! rejected before any connection attempt starts.

use std::time::Duration;

use crate::error::BuildError;

use super::{
    config::{Endpoint, LogWriterConfig, RetryPolicy},
    writer::LogWriter,
};

macro_rules! ensure_positive {
    ($value:expr, $field:expr) => {{
        if $value == 0 {
            Err(BuildError::InvalidConfig(format!(
                "{} must be greater than zero",
                $field
            )))
        } else {
            Ok($value)
        }
    }};
}

macro_rules! option_setter {
    ($(#[$meta:meta])* $fn_name:ident, $field:ident, $ty:ty) => {
        $(#[$meta])*
        pub fn $fn_name(mut self, value: $ty) -> Self {
            self.$field = Some(value);
            self
        }
    };
}

/// Builder for constructing [`LogWriter`] instances.
#[derive(Clone, Debug, Default)]
pub struct LogWriterBuilder {
    addr: Option<String>,
    format: Option<String>,
    connect_wait_ms: Option<u64>,
    connect_timeout_ms: Option<u64>,
    write_timeout_ms: Option<u64>,
    retry_interval_ms: Option<u64>,
    max_frame_size: Option<usize>,
    warn_interval_ms: Option<u64>,
}

impl LogWriterBuilder {
    /// Create a builder targeting the default endpoint.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cutelog address, e.g. `localhost:19996`.
    pub fn with_addr(mut self, addr: impl Into<String>) -> Self {
        self.addr = Some(addr.into());
        self
    }

    /// Set the format tag announced in the handshake.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    option_setter!(
        /// How long construction waits for the first connection. Zero skips the wait.
        with_connect_wait_ms,
        connect_wait_ms,
        u64
    );
    option_setter!(
        /// Bound a single TCP dial.
        with_connect_timeout_ms,
        connect_timeout_ms,
        u64
    );
    option_setter!(
        /// Deadline applied to each framed write.
        with_write_timeout_ms,
        write_timeout_ms,
        u64
    );
    option_setter!(
        /// Fixed delay between failed connection attempts.
        with_retry_interval_ms,
        retry_interval_ms,
        u64
    );
    option_setter!(
        /// Largest payload accepted for a single frame.
        with_max_frame_size,
        max_frame_size,
        usize
    );
    option_setter!(
        /// Minimum interval between dropped-record warnings.
        with_warn_interval_ms,
        warn_interval_ms,
        u64
    );

    /// Validate the options and produce a configuration.
    pub fn build_config(&self) -> Result<LogWriterConfig, BuildError> {
        let mut config = LogWriterConfig::default();
        let defaults = Endpoint::default();
        let addr = self.addr.as_deref().unwrap_or(defaults.addr());
        let format = self.format.as_deref().unwrap_or(defaults.format());
        if addr.trim().is_empty() {
            return Err(BuildError::InvalidConfig("addr must not be empty".into()));
        }
        if format.is_empty() {
            return Err(BuildError::InvalidConfig("format must not be empty".into()));
        }
        config.endpoint = Endpoint::new(addr, format);

        if let Some(wait) = self.connect_wait_ms {
            config.connect_wait = Duration::from_millis(wait);
        }
        if let Some(timeout) = self.connect_timeout_ms {
            let timeout = ensure_positive!(timeout, "connect_timeout_ms")?;
            config.connect_timeout = Duration::from_millis(timeout);
        }
        if let Some(timeout) = self.write_timeout_ms {
            let timeout = ensure_positive!(timeout, "write_timeout_ms")?;
            config.write_timeout = Duration::from_millis(timeout);
        }
        if let Some(interval) = self.retry_interval_ms {
            let interval = ensure_positive!(interval, "retry_interval_ms")?;
            config.retry = RetryPolicy::fixed(Duration::from_millis(interval));
        }
        if let Some(size) = self.max_frame_size {
            let size = ensure_positive!(size, "max_frame_size")?;
            if u32::try_from(size).is_err() {
                return Err(BuildError::InvalidConfig(format!(
                    "max_frame_size must not exceed {}",
                    u32::MAX
                )));
            }
            config.max_frame_size = size;
        }
        if let Some(interval) = self.warn_interval_ms {
            let interval = ensure_positive!(interval, "warn_interval_ms")?;
            config.warn_interval = Duration::from_millis(interval);
        }
        Ok(config)
    }

    /// Build the writer, starting its first connection attempt.
    pub fn build(&self) -> Result<LogWriter, BuildError> {
        self.build_config().map(LogWriter::with_config)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::log_writer::config::{
        DEFAULT_ADDR, DEFAULT_CONNECT_WAIT, DEFAULT_FORMAT, DEFAULT_RETRY_INTERVAL,
        DEFAULT_WRITE_TIMEOUT,
    };

    #[rstest]
    fn defaults_target_local_cutelog() {
        let config = LogWriterBuilder::new().build_config().expect("defaults are valid");
        assert_eq!(config.endpoint.addr(), DEFAULT_ADDR);
        assert_eq!(config.endpoint.format(), DEFAULT_FORMAT);
        assert_eq!(config.connect_wait, DEFAULT_CONNECT_WAIT);
        assert_eq!(config.write_timeout, DEFAULT_WRITE_TIMEOUT);
        assert_eq!(config.retry.next_sleep(), DEFAULT_RETRY_INTERVAL);
    }

    #[rstest]
    fn overrides_are_applied() {
        let config = LogWriterBuilder::new()
            .with_addr("127.0.0.1:4000")
            .with_format("msgpack")
            .with_connect_wait_ms(0)
            .with_connect_timeout_ms(250)
            .with_write_timeout_ms(500)
            .with_retry_interval_ms(20)
            .with_max_frame_size(1024)
            .with_warn_interval_ms(10)
            .build_config()
            .expect("overrides are valid");
        assert_eq!(config.endpoint, Endpoint::new("127.0.0.1:4000", "msgpack"));
        assert_eq!(config.connect_wait, Duration::ZERO);
        assert_eq!(config.connect_timeout, Duration::from_millis(250));
        assert_eq!(config.write_timeout, Duration::from_millis(500));
        assert_eq!(config.retry, RetryPolicy::fixed(Duration::from_millis(20)));
        assert_eq!(config.max_frame_size, 1024);
        assert_eq!(config.warn_interval, Duration::from_millis(10));
    }

    #[rstest]
    #[case(LogWriterBuilder::new().with_addr(" "), "addr")]
    #[case(LogWriterBuilder::new().with_format(""), "format")]
    #[case(LogWriterBuilder::new().with_connect_timeout_ms(0), "connect_timeout_ms")]
    #[case(LogWriterBuilder::new().with_write_timeout_ms(0), "write_timeout_ms")]
    #[case(LogWriterBuilder::new().with_retry_interval_ms(0), "retry_interval_ms")]
    #[case(LogWriterBuilder::new().with_max_frame_size(0), "max_frame_size")]
    #[case(LogWriterBuilder::new().with_warn_interval_ms(0), "warn_interval_ms")]
    fn rejects_invalid_options(#[case] builder: LogWriterBuilder, #[case] field: &str) {
        let err = builder.build_config().expect_err("option must be rejected");
        assert!(matches!(err, BuildError::InvalidConfig(ref msg) if msg.contains(field)));
    }

    #[cfg(target_pointer_width = "64")]
    #[rstest]
    fn rejects_frame_size_beyond_prefix() {
        let err = LogWriterBuilder::new()
            .with_max_frame_size(u32::MAX as usize + 1)
            .build_config()
            .expect_err("frame size must fit the prefix");
        assert!(matches!(err, BuildError::InvalidConfig(msg) if msg.contains("max_frame_size")));
    }
}
