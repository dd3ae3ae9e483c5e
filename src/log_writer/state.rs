//! Connection state shared by the writer handle and the connect loop.
//!
//! The status flag and the socket live together behind one lock so that a
//! sender never writes to a socket the connect loop is replacing.

use std::{fmt, net::TcpStream};

/// Lifecycle of the single outbound connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    /// No socket and no attempt in flight.
    Disconnected,
    /// A connect loop is dialling or sleeping between attempts.
    Connecting,
    /// A socket is open and its handshake has been sent.
    Connected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
        })
    }
}

/// `{state, socket}` pair guarded by the writer's lock.
///
/// `stream` is `Some` exactly when `state` is [`ConnectionState::Connected`].
#[derive(Debug)]
pub struct ConnectionSlot {
    state: ConnectionState,
    stream: Option<TcpStream>,
}

impl Default for ConnectionSlot {
    fn default() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            stream: None,
        }
    }
}

impl ConnectionSlot {
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Claim the right to run a connect loop.
    ///
    /// Returns `true` only for the caller that moved the slot from
    /// `Disconnected` to `Connecting`.
    pub fn begin_connect(&mut self) -> bool {
        if self.state != ConnectionState::Disconnected {
            return false;
        }
        self.state = ConnectionState::Connecting;
        true
    }

    /// Undo [`begin_connect`](Self::begin_connect) when no loop could be started.
    pub fn abort_connect(&mut self) {
        if self.state == ConnectionState::Connecting {
            self.state = ConnectionState::Disconnected;
        }
    }

    /// Store a socket whose handshake has already been written.
    pub fn install(&mut self, stream: TcpStream) {
        self.stream = Some(stream);
        self.state = ConnectionState::Connected;
    }

    /// The open socket, if connected.
    pub fn stream_mut(&mut self) -> Option<&mut TcpStream> {
        self.stream.as_mut()
    }

    /// Remove the open socket, if any.
    ///
    /// A connected slot becomes `Disconnected`. A slot that is still
    /// `Connecting` keeps that state since its loop is still running.
    pub fn take_stream(&mut self) -> Option<TcpStream> {
        let stream = self.stream.take();
        if self.state == ConnectionState::Connected {
            self.state = ConnectionState::Disconnected;
        }
        stream
    }
}
