//! Fixed-frame message codec for the Hex judge protocol.
//!
//! Every message travels as one [`FRAME_SIZE`]-byte frame of big-endian `u32` words:
//!
//! | kind  | word 0 | word 1 | word 2     | word 3       | word 4       | word 5           |
//! |-------|--------|--------|------------|--------------|--------------|------------------|
//! | START | 0      | player | board_size | game_seconds | thread_limit | memory_limit_mib |
//! | MOVE  | 1      | x      | y          |              |              |                  |
//! | SWAP  | 2      |        |            |              |              |                  |
//! | END   | 3      | winner |            |              |              |                  |
//!
//! Unused trailing bytes are written as zero and ignored when decoding.

use std::fmt;
use std::io::{Read, Write};

use crate::error::HexError;
use crate::transport::{recv_message, send_message};

/// Size in bytes of every frame on the wire.
pub const FRAME_SIZE: usize = 32;

/// One encoded message.
pub type Frame = [u8; FRAME_SIZE];

/// Side assigned to an agent by the judge. Black moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerColor {
    /// First mover.
    Black,
    /// Second mover, holds the pie-rule swap right.
    White,
}

impl PlayerColor {
    /// The other side.
    pub fn opponent(self) -> PlayerColor {
        match self {
            PlayerColor::Black => PlayerColor::White,
            PlayerColor::White => PlayerColor::Black,
        }
    }

    /// Wire code of this color.
    pub fn code(self) -> u32 {
        match self {
            PlayerColor::Black => 0,
            PlayerColor::White => 1,
        }
    }

    /// Parse a wire code.
    ///
    /// # Errors
    /// [`HexError::ProtocolViolation`] for any code other than 0 or 1.
    pub fn from_code(code: u32) -> Result<PlayerColor, HexError> {
        match code {
            0 => Ok(PlayerColor::Black),
            1 => Ok(PlayerColor::White),
            other => Err(HexError::violation(format!("unknown player code {other}"))),
        }
    }
}

impl fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerColor::Black => write!(f, "black"),
            PlayerColor::White => write!(f, "white"),
        }
    }
}

/// Discriminant of a [`Message`], as carried in the first word of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Judge to client: match parameters.
    Start,
    /// Either direction: a stone placement.
    Move,
    /// Either direction: the pie-rule swap.
    Swap,
    /// Judge to client: the match is over.
    End,
}

impl MessageKind {
    /// Wire code of this kind.
    pub fn code(self) -> u32 {
        match self {
            MessageKind::Start => 0,
            MessageKind::Move => 1,
            MessageKind::Swap => 2,
            MessageKind::End => 3,
        }
    }

    /// Parse a wire code.
    ///
    /// # Errors
    /// [`HexError::ProtocolViolation`] for codes outside `0..=3`.
    pub fn from_code(code: u32) -> Result<MessageKind, HexError> {
        match code {
            0 => Ok(MessageKind::Start),
            1 => Ok(MessageKind::Move),
            2 => Ok(MessageKind::Swap),
            3 => Ok(MessageKind::End),
            other => Err(HexError::violation(format!("unknown message kind {other}"))),
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MessageKind::Start => "START",
            MessageKind::Move => "MOVE",
            MessageKind::Swap => "SWAP",
            MessageKind::End => "END",
        };
        write!(f, "{name}")
    }
}

/// Payload of a START message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartInfo {
    /// Color assigned to the receiving agent.
    pub player: PlayerColor,
    /// Side length of the square board.
    pub board_size: u32,
    /// Per-agent game clock.
    pub game_seconds: u32,
    /// Per-agent thread hard limit.
    pub thread_limit: u32,
    /// Per-agent memory hard limit.
    pub memory_limit_mib: u32,
}

/// A protocol message. The payload shape is fixed by the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// Match parameters.
    Start(StartInfo),
    /// Stone placement at 0-based board coordinates.
    Move {
        /// Column.
        x: u32,
        /// Row.
        y: u32,
    },
    /// Pie-rule swap, no payload.
    Swap,
    /// Match result.
    End {
        /// Winning side.
        winner: PlayerColor,
    },
}

impl Message {
    /// Kind of this message.
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Start(_) => MessageKind::Start,
            Message::Move { .. } => MessageKind::Move,
            Message::Swap => MessageKind::Swap,
            Message::End { .. } => MessageKind::End,
        }
    }

    /// Encode into one zero-padded frame.
    pub fn encode(&self) -> Frame {
        let mut frame = [0u8; FRAME_SIZE];
        put_word(&mut frame, 0, self.kind().code());
        match self {
            Message::Start(info) => {
                put_word(&mut frame, 1, info.player.code());
                put_word(&mut frame, 2, info.board_size);
                put_word(&mut frame, 3, info.game_seconds);
                put_word(&mut frame, 4, info.thread_limit);
                put_word(&mut frame, 5, info.memory_limit_mib);
            }
            Message::Move { x, y } => {
                put_word(&mut frame, 1, *x);
                put_word(&mut frame, 2, *y);
            }
            Message::Swap => {}
            Message::End { winner } => {
                put_word(&mut frame, 1, winner.code());
            }
        }
        frame
    }

    /// Decode one frame.
    ///
    /// # Errors
    /// [`HexError::ProtocolViolation`] if `frame` is not exactly [`FRAME_SIZE`] bytes long,
    /// if the kind code is unknown, or if a color field holds an unknown code.
    pub fn decode(frame: &[u8]) -> Result<Message, HexError> {
        if frame.len() != FRAME_SIZE {
            return Err(HexError::violation(format!(
                "frame is {} bytes instead of {FRAME_SIZE}",
                frame.len()
            )));
        }

        let message = match MessageKind::from_code(get_word(frame, 0))? {
            MessageKind::Start => Message::Start(StartInfo {
                player: PlayerColor::from_code(get_word(frame, 1))?,
                board_size: get_word(frame, 2),
                game_seconds: get_word(frame, 3),
                thread_limit: get_word(frame, 4),
                memory_limit_mib: get_word(frame, 5),
            }),
            MessageKind::Move => Message::Move {
                x: get_word(frame, 1),
                y: get_word(frame, 2),
            },
            MessageKind::Swap => Message::Swap,
            MessageKind::End => Message::End {
                winner: PlayerColor::from_code(get_word(frame, 1))?,
            },
        };
        Ok(message)
    }

    /// Send this message as one frame over `conn`.
    ///
    /// # Errors
    /// See [`send_message`](crate::transport::send_message).
    pub fn write_to<W: Write>(&self, conn: &mut W) -> Result<(), HexError> {
        send_message(conn, self)
    }

    /// Receive one message from `conn`.
    ///
    /// # Errors
    /// See [`recv_message`](crate::transport::recv_message).
    pub fn read_from<R: Read>(conn: &mut R) -> Result<Message, HexError> {
        recv_message(conn)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Start(info) => write!(
                f,
                "START {} {}x{} {}s {} threads {} MiB",
                info.player,
                info.board_size,
                info.board_size,
                info.game_seconds,
                info.thread_limit,
                info.memory_limit_mib
            ),
            Message::Move { x, y } => write!(f, "MOVE ({x}, {y})"),
            Message::Swap => write!(f, "SWAP"),
            Message::End { winner } => write!(f, "END winner={winner}"),
        }
    }
}

fn put_word(frame: &mut Frame, index: usize, value: u32) {
    let offset = index * 4;
    frame[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}

fn get_word(frame: &[u8], index: usize) -> u32 {
    let o = index * 4;
    u32::from_be_bytes([frame[o], frame[o + 1], frame[o + 2], frame[o + 3]])
}
