//! Send log records to a [cutelog](https://github.com/busimus/cutelog)
//! instance without managing the socket yourself.
//!
//! [`LogWriter`] implements [`std::io::Write`], so it can sit behind any
//! logger that serialises records to bytes. Payloads are opaque; the format
//! tag passed at construction (`json`, `msgpack`, `cbor`) tells cutelog how
//! to decode them.
//!
//! ```no_run
//! use cutelog_writer::LogWriter;
//!
//! let writer = LogWriter::new("localhost:19996", "json");
//! writer
//!     .write(br#"{"name": "app", "levelname": "INFO", "msg": "hello"}"#)
//!     .ok();
//! ```
//!
//! Like cutelog itself, this crate is meant for development. Records are
//! dropped rather than buffered while the connection is down.

pub mod error;
pub mod log_writer;
pub mod rate_limited_warner;
#[cfg(feature = "tracing-compat")]
pub mod tracing_compat;

pub use error::{BuildError, WriterError};
pub use log_writer::{
    ConnectionState, Endpoint, LogWriter, LogWriterBuilder, LogWriterConfig, RetryPolicy,
};
