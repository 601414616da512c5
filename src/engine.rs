//! Protocol state machine driving one match from the client side.
//!
//! ```text
//!            BLACK                 MOVE (no swap), SWAP
//!   START ──────────► SEND ◄──────────────────────── RECV ◄─┐
//!     │                 │            MOVE                ▲  │ MOVE + own swap
//!     │ WHITE           └────────────────────────────────┘  │ (first message only)
//!     └──────────────────────────────────────────────► RECV ┘
//!                                                        │ END
//!                                                        ▼
//!                                                       END
//! ```
//!
//! Every `(state, message kind)` pair not drawn above is a [`HexError::ProtocolViolation`].
//! The swap right is a one-shot: it is consumed by the first message the engine processes,
//! whatever that message is. Since black leaves START through SEND, only white can ever
//! exercise it.

use std::io::{Read, Write};

use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, error, info, instrument, trace};

use crate::board::Board;
use crate::configuration::Configuration;
use crate::error::HexError;
use crate::protocol::{Message, PlayerColor, StartInfo};
use crate::strategy::{MoveStrategy, RandomStrategy};
use crate::transport::{recv_message, send_message};

/// Largest board side accepted in START.
pub const MAX_BOARD_SIZE: u32 = 1024;

/// States of the client state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineState {
    /// Waiting for the judge's START.
    Start,
    /// Waiting for the opponent's action or the result.
    Recv,
    /// Our turn to move.
    Send,
    /// Match over, no further I/O.
    End,
}

/// Per-match facts learned from START, plus the swap right and the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchState {
    /// Parameters sent by the judge.
    pub start: StartInfo,
    /// Our color.
    pub local: PlayerColor,
    /// Their color.
    pub opponent: PlayerColor,
    /// True until the first message of the match has been processed.
    pub swap_available: bool,
    /// Set when END is received.
    pub winner: Option<PlayerColor>,
}

/// Drives one match over `conn`.
///
/// The engine is strictly sequential: exactly one frame is in flight at any time, and it owns
/// the board, the strategy and the random source for the whole match.
pub struct ClientEngine<C, S = RandomStrategy, R = StdRng> {
    conn: C,
    strategy: S,
    rng: R,
    config: Configuration,
    state: EngineState,
    match_state: Option<MatchState>,
    board: Option<Board>,
}

impl<C: Read + Write> ClientEngine<C> {
    /// Engine with the reference strategy and the random source described by `config`.
    pub fn from_config(conn: C, config: Configuration) -> Self {
        let rng = config.make_rng();
        ClientEngine::new(conn, RandomStrategy, rng, config)
    }
}

impl<C, S, R> ClientEngine<C, S, R>
where
    C: Read + Write,
    S: MoveStrategy,
    R: Rng,
{
    /// Engine in the START state. `rng` shuffles the move pool and draws the swap decision.
    pub fn new(conn: C, strategy: S, rng: R, config: Configuration) -> Self {
        Self {
            conn,
            strategy,
            rng,
            config,
            state: EngineState::Start,
            match_state: None,
            board: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Match facts, once START was received.
    pub fn match_state(&self) -> Option<&MatchState> {
        self.match_state.as_ref()
    }

    /// Local board, once START was received.
    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    /// Winner announced by the judge, once in the END state.
    pub fn winner(&self) -> Option<PlayerColor> {
        self.match_state.and_then(|m| m.winner)
    }

    /// Give back the connection.
    pub fn into_inner(self) -> C {
        self.conn
    }

    /// Run until END and return the winner.
    ///
    /// # Errors
    /// Any error from [`step`](Self::step); the match is abandoned.
    #[instrument(skip_all)]
    pub fn run(&mut self) -> Result<PlayerColor, HexError> {
        loop {
            if self.step()? == EngineState::End {
                break;
            }
        }
        self.winner()
            .ok_or_else(|| HexError::violation("match ended without a winner"))
    }

    /// Perform one transition and return the new state. Does nothing once in END.
    ///
    /// # Errors
    /// [`HexError::ProtocolViolation`] on an unexpected message, [`HexError::ConnectionClosed`]
    /// when the judge goes away, and board errors if a move cannot be applied.
    pub fn step(&mut self) -> Result<EngineState, HexError> {
        let from = self.state;
        let result = match from {
            EngineState::Start => self.on_start(),
            EngineState::Recv => self.on_recv(),
            EngineState::Send => self.on_send(),
            EngineState::End => return Ok(EngineState::End),
        };
        let next = match result {
            Ok(next) => next,
            Err(e) => {
                error!(state = ?from, "match aborted: {e}");
                return Err(e);
            }
        };
        debug!(?from, to = ?next, "transition");
        self.state = next;
        Ok(next)
    }

    fn on_start(&mut self) -> Result<EngineState, HexError> {
        let msg = recv_message(&mut self.conn)?;
        let Message::Start(start) = msg else {
            return Err(HexError::violation(format!(
                "expected START, got {}",
                msg.kind()
            )));
        };

        if !(1..=MAX_BOARD_SIZE).contains(&start.board_size) {
            return Err(HexError::violation(format!(
                "board size {} outside 1..={MAX_BOARD_SIZE}",
                start.board_size
            )));
        }

        let local = start.player;
        self.board = Some(Board::new(start.board_size, &mut self.rng));
        self.match_state = Some(MatchState {
            start,
            local,
            opponent: local.opponent(),
            swap_available: true,
            winner: None,
        });

        info!(%local, size = start.board_size, "match started");
        if self.config.verbose {
            println!("{}", start_status_line(&start));
        }

        Ok(match local {
            PlayerColor::Black => EngineState::Send,
            PlayerColor::White => EngineState::Recv,
        })
    }

    fn on_recv(&mut self) -> Result<EngineState, HexError> {
        let msg = recv_message(&mut self.conn)?;
        let (Some(game), Some(board)) = (self.match_state.as_mut(), self.board.as_mut()) else {
            return Err(HexError::violation("no START before play"));
        };

        let may_swap = game.swap_available;
        game.swap_available = false;

        match msg {
            Message::Move { x, y } => {
                board.play(game.opponent, x, y)?;
                if may_swap && self.rng.random_bool(self.config.swap_probability) {
                    board.swap(&mut self.rng);
                    send_message(&mut self.conn, &Message::Swap)?;
                    info!(local = %game.local, "exercised the swap on ({x}, {y})");
                    Ok(EngineState::Recv)
                } else {
                    Ok(EngineState::Send)
                }
            }
            Message::Swap => {
                board.swap(&mut self.rng);
                info!(local = %game.local, "opponent exercised the swap");
                Ok(EngineState::Send)
            }
            Message::End { winner } => {
                game.winner = Some(winner);
                info!(local = %game.local, %winner, "match over");
                if self.config.verbose {
                    println!("[{}] Player {winner} has won the game", game.local);
                }
                Ok(EngineState::End)
            }
            Message::Start(_) => Err(HexError::violation("START received mid-match")),
        }
    }

    fn on_send(&mut self) -> Result<EngineState, HexError> {
        let (Some(game), Some(board)) = (self.match_state.as_mut(), self.board.as_mut()) else {
            return Err(HexError::violation("no START before play"));
        };

        let (x, y) = self.strategy.choose(board)?;
        board.play(game.local, x, y)?;
        send_message(&mut self.conn, &Message::Move { x, y })?;
        game.swap_available = false;
        trace!(local = %game.local, "played ({x}, {y})\n{board}");
        Ok(EngineState::Recv)
    }
}

fn start_status_line(start: &StartInfo) -> String {
    format!(
        "[{0}] Started game: {1}x{1}, {2} secs, {3} threads, {4} MiB",
        start.player, start.board_size, start.game_seconds, start.thread_limit, start.memory_limit_mib
    )
}
