//! Error taxonomy shared by the codec, the transport, the board and the engine.
//!
//! Every variant is fatal to the match it happens in. None of them is retried:
//! a closed connection ends the session, and an occupied or exhausted board
//! means either the engine or the peer broke the protocol.

use std::fmt;
use std::io;

/// Errors produced while playing one match.
#[derive(Debug)]
pub enum HexError {
    /// The peer sent an unparseable frame, or a message kind that is not
    /// allowed in the current engine state.
    ProtocolViolation(String),
    /// The peer closed the connection before a full frame was transferred.
    ConnectionClosed,
    /// A move targeted a cell that already holds a stone.
    AlreadyOccupied {
        /// Column of the rejected move.
        x: u32,
        /// Row of the rejected move.
        y: u32,
    },
    /// A move targeted a cell outside the board.
    OutOfBounds {
        /// Column of the rejected move.
        x: u32,
        /// Row of the rejected move.
        y: u32,
    },
    /// The move pool is empty but a move was requested.
    Exhausted,
    /// Any other I/O failure on the connection.
    Io(io::Error),
}

impl HexError {
    pub(crate) fn violation(msg: impl Into<String>) -> HexError {
        HexError::ProtocolViolation(msg.into())
    }
}

impl fmt::Display for HexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HexError::ProtocolViolation(msg) => write!(f, "protocol violation: {msg}"),
            HexError::ConnectionClosed => write!(f, "connection closed by peer"),
            HexError::AlreadyOccupied { x, y } => write!(f, "cell ({x}, {y}) is already occupied"),
            HexError::OutOfBounds { x, y } => write!(f, "cell ({x}, {y}) is outside the board"),
            HexError::Exhausted => write!(f, "move pool is exhausted"),
            HexError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for HexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HexError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for HexError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::UnexpectedEof
            | io::ErrorKind::WriteZero
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::BrokenPipe => HexError::ConnectionClosed,
            _ => HexError::Io(e),
        }
    }
}
