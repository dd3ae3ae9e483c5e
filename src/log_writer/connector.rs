//! Background thread establishing the connection.

use std::{
    io,
    net::TcpStream,
    sync::{Arc, Weak},
    thread,
};

use crossbeam_channel::Sender;
use log::debug;

use super::{
    config::LogWriterConfig,
    frame::frame_payload,
    transport::{connect_tcp, write_all_with_deadline},
    writer::Shared,
};

/// Start a connect loop for `shared`.
///
/// The caller must have claimed the slot via
/// [`ConnectionSlot::begin_connect`](super::state::ConnectionSlot::begin_connect).
/// `ready` is signalled once the handshake has been sent.
pub(super) fn spawn_connector(shared: &Arc<Shared>, ready: Option<Sender<()>>) -> io::Result<()> {
    let weak = Arc::downgrade(shared);
    thread::Builder::new()
        .name("cutelog-connect".into())
        .spawn(move || connect_loop(weak, ready))
        .map(|_| ())
}

/// Dial until a connection and its handshake succeed.
///
/// Only a weak reference is held between attempts so the loop ends once every
/// writer handle has been dropped.
fn connect_loop(shared: Weak<Shared>, ready: Option<Sender<()>>) {
    let mut attempts: u64 = 0;
    loop {
        let Some(shared) = shared.upgrade() else {
            debug!("cutelog writer dropped; abandoning connect loop after {attempts} attempts");
            return;
        };
        attempts += 1;
        match open_connection(&shared.config) {
            Ok(stream) => {
                shared.slot.lock().install(stream);
                debug!(
                    "connected to cutelog at {} after {attempts} attempts",
                    shared.config.endpoint.addr()
                );
                if let Some(tx) = ready {
                    let _ = tx.send(());
                }
                return;
            }
            Err(err) => {
                debug!(
                    "connection attempt {attempts} to cutelog at {} failed: {err}",
                    shared.config.endpoint.addr()
                );
            }
        }
        let delay = shared.config.retry.next_sleep();
        drop(shared);
        thread::sleep(delay);
    }
}

/// Dial the endpoint and send the handshake frame.
///
/// The socket is not yet visible to senders, so the handshake needs no lock.
/// On failure the socket is dropped, which closes it.
pub(super) fn open_connection(config: &LogWriterConfig) -> io::Result<TcpStream> {
    let mut stream = connect_tcp(config.endpoint.addr(), config.connect_timeout)?;
    let handshake = frame_payload(&config.endpoint.handshake(), usize::MAX).ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "format tag too long to frame")
    })?;
    write_all_with_deadline(&mut stream, &handshake, config.write_timeout)?;
    Ok(stream)
}
