//! Reliable transfer of whole frames over a byte stream.
//!
//! A stream may accept or deliver fewer bytes than asked for. Both directions loop until the
//! full frame went through, and a call that makes zero progress means the peer is gone.

use std::io::{self, Read, Write};

use tracing::{trace, warn};

use crate::error::HexError;
use crate::protocol::{Message, FRAME_SIZE};

/// Outcome of [`transfer_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transfer {
    Complete,
    Closed { transferred: usize },
}

/// Calls `step(already_transferred)` until `len` bytes went through.
///
/// `step` returns how many bytes it moved; `Ok(0)` stops the loop with [`Transfer::Closed`].
/// Interrupted calls are retried.
pub(crate) fn transfer_all<F>(len: usize, mut step: F) -> io::Result<Transfer>
where
    F: FnMut(usize) -> io::Result<usize>,
{
    let mut done = 0;
    while done < len {
        match step(done) {
            Ok(0) => return Ok(Transfer::Closed { transferred: done }),
            Ok(n) => done += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(Transfer::Complete)
}

/// Write all of `bytes` to `conn`.
///
/// # Errors
/// [`HexError::ConnectionClosed`] if a write makes no progress, [`HexError::Io`] on other
/// failures.
pub fn send_frame<W: Write>(conn: &mut W, bytes: &[u8]) -> Result<(), HexError> {
    match transfer_all(bytes.len(), |done| conn.write(&bytes[done..]))? {
        Transfer::Complete => {
            conn.flush()?;
            trace!(len = bytes.len(), "frame sent");
            Ok(())
        }
        Transfer::Closed { transferred } => {
            warn!("peer stopped accepting data after {transferred}/{} bytes", bytes.len());
            Err(HexError::ConnectionClosed)
        }
    }
}

/// Read exactly `size` bytes from `conn`.
///
/// A partial frame is never returned.
///
/// # Errors
/// [`HexError::ConnectionClosed`] if the peer closes before `size` bytes arrived,
/// [`HexError::Io`] on other failures.
pub fn recv_frame<R: Read>(conn: &mut R, size: usize) -> Result<Vec<u8>, HexError> {
    let mut buf = vec![0u8; size];
    match transfer_all(size, |done| conn.read(&mut buf[done..]))? {
        Transfer::Complete => {
            trace!(len = size, "frame received");
            Ok(buf)
        }
        Transfer::Closed { transferred } => {
            if transferred > 0 {
                warn!("peer closed mid-frame after {transferred}/{size} bytes");
            }
            Err(HexError::ConnectionClosed)
        }
    }
}

/// Encode `msg` and send it as one frame.
pub fn send_message<W: Write>(conn: &mut W, msg: &Message) -> Result<(), HexError> {
    trace!(%msg, "sending");
    send_frame(conn, &msg.encode())
}

/// Receive one frame and decode it.
pub fn recv_message<R: Read>(conn: &mut R) -> Result<Message, HexError> {
    let frame = recv_frame(conn, FRAME_SIZE)?;
    let msg = Message::decode(&frame)?;
    trace!(%msg, "received");
    Ok(msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::PlayerColor;

    /// Moves at most `chunk` bytes per call in both directions.
    struct Trickle {
        input: Vec<u8>,
        pos: usize,
        output: Vec<u8>,
        chunk: usize,
        write_budget: usize,
    }

    impl Trickle {
        fn new(input: Vec<u8>, chunk: usize) -> Self {
            Self {
                input,
                pos: 0,
                output: vec![],
                chunk,
                write_budget: usize::MAX,
            }
        }
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = buf.len().min(self.chunk).min(self.input.len() - self.pos);
            buf[..n].copy_from_slice(&self.input[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    impl Write for Trickle {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = buf.len().min(self.chunk).min(self.write_budget);
            self.write_budget -= n;
            self.output.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn short_reads_are_accumulated() {
        let msg = Message::Move { x: 4, y: 9 };
        let mut conn = Trickle::new(msg.encode().to_vec(), 3);
        assert_eq!(recv_message(&mut conn).unwrap(), msg);
    }

    #[test]
    fn short_writes_are_retried() {
        let msg = Message::End { winner: PlayerColor::White };
        let mut conn = Trickle::new(vec![], 5);
        send_message(&mut conn, &msg).unwrap();
        assert_eq!(conn.output, msg.encode().to_vec());
    }

    #[test]
    fn closed_mid_frame_is_connection_closed() {
        let frame = Message::Swap.encode();
        let mut conn = Trickle::new(frame[..20].to_vec(), 7);
        assert!(matches!(
            recv_frame(&mut conn, FRAME_SIZE),
            Err(HexError::ConnectionClosed)
        ));
    }

    #[test]
    fn closed_before_frame_is_connection_closed() {
        let mut conn: &[u8] = &[];
        assert!(matches!(
            recv_message(&mut conn),
            Err(HexError::ConnectionClosed)
        ));
    }

    #[test]
    fn stalled_write_is_connection_closed() {
        let mut conn = Trickle::new(vec![], 8);
        conn.write_budget = 10;
        assert!(matches!(
            send_frame(&mut conn, &Message::Swap.encode()),
            Err(HexError::ConnectionClosed)
        ));
        assert_eq!(conn.output.len(), 10);
    }

    #[test]
    fn interrupted_calls_are_retried() {
        let mut calls = 0;
        let res = transfer_all(4, |_| {
            calls += 1;
            if calls == 1 {
                Err(io::Error::from(io::ErrorKind::Interrupted))
            } else {
                Ok(2)
            }
        })
        .unwrap();
        assert_eq!(res, Transfer::Complete);
        assert_eq!(calls, 3);
    }
}
