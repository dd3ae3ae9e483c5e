//! TCP transport primitives for the connection manager.

use std::{
    io::{self, Write},
    net::{Shutdown, TcpStream, ToSocketAddrs},
    time::{Duration, Instant},
};

/// Dial `addr`, trying every resolved address in turn.
///
/// Each attempt is bounded by `timeout`. The error from the last attempt is
/// returned when none succeed.
pub fn connect_tcp(addr: &str, timeout: Duration) -> io::Result<TcpStream> {
    let mut last_err = None;
    for sock_addr in addr.to_socket_addrs()? {
        match TcpStream::connect_timeout(&sock_addr, timeout) {
            Ok(stream) => {
                stream.set_nodelay(true)?;
                return Ok(stream);
            }
            Err(err) => last_err = Some(err),
        }
    }
    Err(last_err.unwrap_or_else(|| {
        io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("{addr} did not resolve to any address"),
        )
    }))
}

/// Write the whole buffer, failing once `timeout` has elapsed in total.
///
/// The socket write timeout is narrowed before every chunk so a peer that
/// accepts bytes slowly cannot extend the deadline. The timeout is cleared
/// again once the buffer is written.
pub fn write_all_with_deadline(
    stream: &mut TcpStream,
    mut buf: &[u8],
    timeout: Duration,
) -> io::Result<()> {
    let deadline = Instant::now() + timeout;
    while !buf.is_empty() {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(deadline_exceeded());
        }
        stream.set_write_timeout(Some(remaining))?;
        match stream.write(buf) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "failed to write whole frame",
                ));
            }
            Ok(n) => buf = &buf[n..],
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
                ) =>
            {
                return Err(deadline_exceeded());
            }
            Err(err) => return Err(err),
        }
    }
    stream.set_write_timeout(None)
}

fn deadline_exceeded() -> io::Error {
    io::Error::new(io::ErrorKind::TimedOut, "write deadline exceeded")
}

/// Shut both directions of the socket down.
///
/// A peer that already went away is not an error.
pub fn shutdown(stream: &TcpStream) -> io::Result<()> {
    match stream.shutdown(Shutdown::Both) {
        Err(err) if err.kind() != io::ErrorKind::NotConnected => Err(err),
        _ => Ok(()),
    }
}
