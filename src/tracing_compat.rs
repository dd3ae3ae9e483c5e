//! Bridge for `tracing-subscriber`'s formatting layer.
//!
//! With the `tracing-compat` feature enabled, a [`LogWriter`] can be handed to
//! `tracing_subscriber::fmt().with_writer(..)`. Each formatted event becomes
//! one frame; pair it with `.json()` and the `json` format tag.

use tracing_subscriber::fmt::MakeWriter;

use crate::log_writer::LogWriter;

impl<'a> MakeWriter<'a> for LogWriter {
    type Writer = &'a LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self
    }
}
