//! # Hex Arena
//!
//! Client agent and tournament tooling for the Hex judge.
//!
//! It provides:
//! - The fixed 32-byte frame codec spoken by the judge ([`protocol`]) and whole-frame transfer
//!   over any byte stream ([`transport`])
//! - A local board model with the pie-rule swap ([`board`]) and pluggable move policies
//!   ([`strategy`])
//! - The client state machine playing one match ([`ClientEngine`](crate::engine::ClientEngine))
//! - A tournament orchestrator running a schedule of matches through the judge with bounded
//!   concurrency and isolated OS identities ([`tournament`])
//!
//! Two binaries ship with the crate: `hex-client`, the reference random agent, and
//! `hex-tournament`, the orchestrator.
//!
//! # Documentation Overview
//!
//! - For the wire format and message kinds, see [`Message`](crate::protocol::Message).
//! - For the match lifecycle and the swap rule, see the [`engine`] module.
//! - For client behaviors (verbosity, seed, swap probability), see
//!   [`Configuration`](crate::configuration::Configuration).
//! - For match limits, concurrency and identities, see
//!   [`TournamentSettingsBuilder`](crate::tournament::TournamentSettingsBuilder).
//!
//! # Usage Example
//!
//! A minimal agent connecting to a judge and playing one match with its own move policy:
//!
//! ```no_run
//! use std::net::TcpStream;
//!
//! use hex_arena::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let stream = TcpStream::connect(("127.0.0.1", 1234))?;
//!     let config = Configuration::from_env().with_seed(Some(7));
//!
//!     // Always take the first free cell in row-major order
//!     let first_free = |board: &mut Board| -> Result<Coord, HexError> {
//!         let size = board.size();
//!         (0..size * size)
//!             .map(|i| (i % size, i / size))
//!             .find(|&(x, y)| board.cell(x, y) == Some(Cell::Empty))
//!             .ok_or(HexError::Exhausted)
//!     };
//!
//!     let mut engine = ClientEngine::new(stream, first_free, config.make_rng(), config);
//!     let winner = engine.run()?;
//!     println!("{winner} won");
//!     Ok(())
//! }
//! ```
//!
//! Whatever the policy, the engine plays the chosen cell and drops it from the board's move pool.
#![warn(missing_docs)]

pub use anyhow;

pub mod board;
pub mod configuration;
pub mod engine;
pub mod error;
pub mod logger;
pub mod protocol;
pub mod strategy;
pub mod tournament;
pub mod transport;

/// Commonly used types and traits for quick access.
///
/// Import this prelude to get started easily:
/// ```rust
/// use hex_arena::prelude::*;
/// ```
///
/// Includes:
/// - [`ClientEngine`](crate::engine::ClientEngine) and [`Configuration`](crate::configuration::Configuration)
/// - the board and move policy types
/// - the protocol messages and [`HexError`](crate::error::HexError)
pub mod prelude {
    pub use crate::board::{Board, Cell, Coord};
    pub use crate::configuration::Configuration;
    pub use crate::engine::{ClientEngine, EngineState};
    pub use crate::error::HexError;
    pub use crate::protocol::{Message, MessageKind, PlayerColor, StartInfo};
    pub use crate::strategy::{MoveStrategy, RandomStrategy};
}
