//! Connection manager forwarding framed log records to cutelog.
//!
//! This module defines [`LogWriter`], a handle that owns a single outbound TCP
//! connection to a cutelog instance. Each payload is sent as one
//! length-prefixed frame. The first frame on every connection is a handshake
//! announcing the payload format. A background thread establishes the
//! connection and re-establishes it after a failed write, retrying at a fixed
//! interval. Records written while no connection is open are dropped so the
//! caller is never blocked.

mod builder;
mod config;
mod connector;
mod frame;
mod state;
mod transport;
mod writer;


pub use builder::LogWriterBuilder;
pub use config::{
    DEFAULT_ADDR, DEFAULT_CONNECT_TIMEOUT, DEFAULT_CONNECT_WAIT, DEFAULT_FORMAT,
    DEFAULT_MAX_FRAME_SIZE, DEFAULT_RETRY_INTERVAL, DEFAULT_WRITE_TIMEOUT, Endpoint,
    LogWriterConfig, RetryPolicy,
};
pub use frame::{PREFIX_LEN, frame_payload, handshake_payload};
pub use state::ConnectionState;
pub use writer::LogWriter;
