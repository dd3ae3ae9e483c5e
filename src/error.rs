//! Error types returned by the writer and its builder.

use std::io;

use thiserror::Error;

/// Errors reported by [`LogWriter`](crate::LogWriter) operations.
///
/// Write-path variants carry the number of bytes reported as accepted, which
/// is always the full payload length.
#[derive(Debug, Error)]
pub enum WriterError {
    /// The framed write failed or exceeded its deadline.
    #[error("failed to send frame: {source}")]
    Write {
        accepted: usize,
        #[source]
        source: io::Error,
    },
    /// The payload cannot be described by the frame length prefix.
    #[error("payload of {len} bytes exceeds the {max} byte frame limit")]
    FrameTooLarge { len: usize, max: usize },
    /// A fault inside the send path was contained.
    #[error("send path panicked: {message}")]
    Panicked { accepted: usize, message: String },
    /// Shutting the socket down failed.
    #[error("failed to close connection: {0}")]
    Close(#[source] io::Error),
}

impl WriterError {
    /// Bytes the failed call reported as accepted.
    pub fn accepted(&self) -> usize {
        match self {
            WriterError::Write { accepted, .. } | WriterError::Panicked { accepted, .. } => {
                *accepted
            }
            WriterError::FrameTooLarge { len, .. } => *len,
            WriterError::Close(_) => 0,
        }
    }
}

impl From<WriterError> for io::Error {
    fn from(err: WriterError) -> Self {
        match err {
            WriterError::Write { source, .. } | WriterError::Close(source) => source,
            WriterError::FrameTooLarge { .. } => io::Error::new(io::ErrorKind::InvalidInput, err),
            WriterError::Panicked { .. } => io::Error::other(err),
        }
    }
}

/// Errors that may occur while building a writer.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Invalid user supplied configuration.
    #[error("invalid writer configuration: {0}")]
    InvalidConfig(String),
}
