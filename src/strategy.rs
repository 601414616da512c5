//! Move selection policies plugged into the [`ClientEngine`](crate::engine::ClientEngine).

use crate::board::{Board, Coord};
use crate::error::HexError;

/// What a move policy should implement.
///
/// The returned coordinate must be a cell still present in the board's move pool. The engine
/// plays it under the local color right after the call, so a policy that consumes the pool
/// itself (as [`RandomStrategy`] does) stays consistent with the board.
pub trait MoveStrategy {
    /// Pick the next cell to play.
    ///
    /// # Errors
    /// [`HexError::Exhausted`] when nothing is left to play.
    fn choose(&mut self, board: &mut Board) -> Result<Coord, HexError>;
}

/// Reference policy: plays the pool in its shuffled order, which is a uniform random choice
/// without replacement. No search.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomStrategy;

impl MoveStrategy for RandomStrategy {
    fn choose(&mut self, board: &mut Board) -> Result<Coord, HexError> {
        board.next_pool_move()
    }
}

impl<F> MoveStrategy for F
where
    F: FnMut(&mut Board) -> Result<Coord, HexError>,
{
    fn choose(&mut self, board: &mut Board) -> Result<Coord, HexError> {
        self(board)
    }
}
