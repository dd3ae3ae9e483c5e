//! Public handle exported by the crate.

use std::{
    any::Any,
    fmt,
    io::{self, Write},
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

#[cfg(test)]
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::{Sender, bounded};
use log::{debug, warn};
use parking_lot::Mutex;

use crate::{error::WriterError, rate_limited_warner::RateLimitedWarner};

use super::{
    config::{Endpoint, LogWriterConfig},
    connector::spawn_connector,
    frame::frame_payload,
    state::{ConnectionSlot, ConnectionState},
    transport::{self, write_all_with_deadline},
};

/// State shared between writer handles and the connect loop.
pub(super) struct Shared {
    pub(super) config: LogWriterConfig,
    pub(super) slot: Mutex<ConnectionSlot>,
    warner: RateLimitedWarner,
    #[cfg(test)]
    pub(super) inject_panic: AtomicBool,
}

impl Shared {
    /// Launch a connect loop unless one is already running or connected.
    ///
    /// Returns `true` when a new loop was started.
    fn start_connect(self: &Arc<Self>, ready: Option<Sender<()>>) -> bool {
        if !self.slot.lock().begin_connect() {
            return false;
        }
        if let Err(err) = spawn_connector(self, ready) {
            warn!("cutelog writer could not start connect thread: {err}");
            self.slot.lock().abort_connect();
            return false;
        }
        true
    }

    /// Drop the current socket and schedule a reconnect.
    fn reset_connection(self: &Arc<Self>) {
        if let Some(stream) = self.slot.lock().take_stream() {
            let _ = transport::shutdown(&stream);
        }
        self.start_connect(None);
    }

    fn record_drop(&self) {
        self.warner.record_drop();
        self.warner.warn_if_due(|count| {
            warn!(
                "cutelog writer dropped {count} records while not connected to {}",
                self.config.endpoint.addr()
            );
        });
    }
}

/// Outcome of a send attempt made under the lock.
enum Delivery {
    Sent,
    Dropped,
}

/// Writer forwarding length-prefixed records to a cutelog instance.
///
/// Records written while no connection is open are discarded and reported as
/// accepted. A lost connection is re-established in the background with a
/// fresh handshake. Clones share the same connection.
#[derive(Clone)]
pub struct LogWriter {
    pub(super) shared: Arc<Shared>,
}

impl LogWriter {
    /// Connect to `addr` announcing `format`, using default timings.
    ///
    /// Waits up to 100 ms for the first connection so early records are not
    /// lost. Never fails; the handle may still be connecting on return.
    pub fn new(addr: impl Into<String>, format: impl Into<String>) -> Self {
        Self::with_config(LogWriterConfig::default().with_endpoint(Endpoint::new(addr, format)))
    }

    /// Construct the writer from a configuration object.
    pub fn with_config(config: LogWriterConfig) -> Self {
        let wait = config.connect_wait;
        let shared = Arc::new(Shared {
            warner: RateLimitedWarner::new(config.warn_interval),
            slot: Mutex::new(ConnectionSlot::default()),
            config,
            #[cfg(test)]
            inject_panic: AtomicBool::new(false),
        });
        let (ready_tx, ready_rx) = bounded(1);
        if shared.start_connect(Some(ready_tx)) {
            let _ = ready_rx.recv_timeout(wait);
        }
        Self { shared }
    }

    /// Endpoint this writer targets.
    pub fn endpoint(&self) -> &Endpoint {
        &self.shared.config.endpoint
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.shared.slot.lock().state()
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Send `payload` as one frame if connected, otherwise drop it.
    ///
    /// Returns the full payload length in every case; on failure it is carried
    /// by the error. A failed write closes the socket and starts a reconnect.
    pub fn write(&self, payload: &[u8]) -> Result<usize, WriterError> {
        let accepted = payload.len();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| -> Result<usize, WriterError> {
            if let Delivery::Dropped = self.send(payload)? {
                self.shared.record_drop();
                if self.shared.start_connect(None) {
                    debug!(
                        "reconnecting to cutelog at {}",
                        self.shared.config.endpoint.addr()
                    );
                }
            }
            Ok(accepted)
        }));
        match outcome {
            Ok(result) => result,
            Err(fault) => {
                self.shared.reset_connection();
                Err(WriterError::Panicked {
                    accepted,
                    message: panic_message(fault.as_ref()),
                })
            }
        }
    }

    fn send(&self, payload: &[u8]) -> Result<Delivery, WriterError> {
        let config = &self.shared.config;
        let mut slot = self.shared.slot.lock();
        let Some(stream) = slot.stream_mut() else {
            return Ok(Delivery::Dropped);
        };
        #[cfg(test)]
        if self.shared.inject_panic.swap(false, Ordering::SeqCst) {
            panic!("injected send fault");
        }
        let frame = frame_payload(payload, config.max_frame_size).ok_or_else(|| {
            WriterError::FrameTooLarge {
                len: payload.len(),
                max: config.max_frame_size,
            }
        })?;
        let Err(source) = write_all_with_deadline(stream, &frame, config.write_timeout) else {
            return Ok(Delivery::Sent);
        };
        warn!(
            "cutelog writer failed to send to {}: {source}",
            config.endpoint.addr()
        );
        if let Some(stream) = slot.take_stream() {
            let _ = transport::shutdown(&stream);
        }
        drop(slot);
        self.shared.start_connect(None);
        Err(WriterError::Write {
            accepted: payload.len(),
            source,
        })
    }

    /// No-op; there is no buffer to flush.
    ///
    /// Reports any records dropped since the last warning.
    pub fn sync(&self) -> Result<(), WriterError> {
        self.shared.warner.flush(|count| {
            warn!(
                "cutelog writer dropped {count} records while not connected to {}",
                self.shared.config.endpoint.addr()
            );
        });
        Ok(())
    }

    /// Close the open socket, if any.
    ///
    /// Safe to call repeatedly and in any state. A connect loop that is
    /// already running is not interrupted.
    pub fn close(&self) -> Result<(), WriterError> {
        let stream = self.shared.slot.lock().take_stream();
        match stream {
            Some(stream) => transport::shutdown(&stream).map_err(WriterError::Close),
            None => Ok(()),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_owned()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}

impl Write for &LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        LogWriter::write(*self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sync().map_err(io::Error::from)
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        <&LogWriter as Write>::write(&mut &*self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        <&LogWriter as Write>::flush(&mut &*self)
    }
}

impl fmt::Debug for LogWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogWriter")
            .field("endpoint", &self.shared.config.endpoint)
            .field("state", &self.state())
            .finish()
    }
}
