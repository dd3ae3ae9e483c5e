//! Minimal stand-in for a cutelog listener.
//!
//! Accepts any number of connections and decodes length-prefixed frames,
//! tagging each with the index of the connection it arrived on.

use std::{
    io::{self, Read},
    net::{SocketAddr, TcpListener, TcpStream},
    sync::mpsc::{self, Receiver},
    thread,
    time::{Duration, Instant},
};

/// Frame received by a [`FrameServer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Received {
    pub connection: usize,
    pub payload: Vec<u8>,
}

pub struct FrameServer {
    addr: SocketAddr,
    rx: Receiver<Received>,
}

impl FrameServer {
    /// Listen on an ephemeral local port.
    pub fn start() -> Self {
        let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind ephemeral listener");
        Self::serve(listener)
    }

    /// Serve frames from an already bound listener.
    pub fn serve(listener: TcpListener) -> Self {
        let addr = listener.local_addr().expect("listener has address");
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            for (connection, stream) in listener.incoming().enumerate() {
                let Ok(mut stream) = stream else {
                    return;
                };
                let tx = tx.clone();
                thread::spawn(move || {
                    while let Ok(payload) = read_frame(&mut stream) {
                        if tx.send(Received { connection, payload }).is_err() {
                            return;
                        }
                    }
                });
            }
        });
        Self { addr, rx }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Next frame, failing the test after five seconds.
    pub fn next(&self) -> Received {
        self.rx
            .recv_timeout(Duration::from_secs(5))
            .expect("frame should arrive")
    }

    /// Assert that nothing further arrives within `window`.
    pub fn assert_quiet(&self, window: Duration) {
        if let Ok(frame) = self.rx.recv_timeout(window) {
            panic!("unexpected frame {frame:?}");
        }
    }
}

/// Read one length-prefixed frame.
pub fn read_frame(stream: &mut TcpStream) -> io::Result<Vec<u8>> {
    let mut len_buf = [0u8; 4];
    stream.read_exact(&mut len_buf)?;
    let mut payload = vec![0u8; u32::from_be_bytes(len_buf) as usize];
    stream.read_exact(&mut payload)?;
    Ok(payload)
}

/// Address with nothing listening on it.
pub fn dead_addr() -> SocketAddr {
    let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind ephemeral listener");
    listener.local_addr().expect("listener has address")
}

/// Poll `condition` for up to five seconds.
pub fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    condition()
}
