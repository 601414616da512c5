//! Local view of the Hex board: cell colors plus the pool of cells nobody played yet.
//!
//! The pool is consumed in an order fixed by a random permutation taken when the board is
//! created, and taken again after every swap. For every board:
//! - `occupied_count() + pool_size() == size²`
//! - every pool entry addresses an empty cell, and appears once.
//!
//! Win detection is the judge's job and is not done here.

use std::collections::VecDeque;
use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, error};

use crate::error::HexError;
use crate::protocol::PlayerColor;

/// 0-based `(x, y)` board coordinate.
pub type Coord = (u32, u32);

/// State of one board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Stone of the first mover.
    Black,
    /// Stone of the second mover.
    White,
    /// Nobody played here yet.
    Empty,
}

impl From<PlayerColor> for Cell {
    fn from(color: PlayerColor) -> Self {
        match color {
            PlayerColor::Black => Cell::Black,
            PlayerColor::White => Cell::White,
        }
    }
}

/// Square board of `size × size` cells, stored row-major (`y * size + x`).
#[derive(Debug, Clone)]
pub struct Board {
    size: u32,
    cells: Vec<Cell>,
    pool: VecDeque<Coord>,
}

impl Board {
    /// Empty board with every cell in the pool, in an order drawn from `rng`.
    pub fn new<R: Rng + ?Sized>(size: u32, rng: &mut R) -> Board {
        let area = size as usize * size as usize;
        let mut board = Board {
            size,
            cells: vec![Cell::Empty; area],
            pool: VecDeque::with_capacity(area),
        };
        board.refill_pool(rng);
        board
    }

    /// Side length.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Cell at `(x, y)`, `None` when outside the board.
    pub fn cell(&self, x: u32, y: u32) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Number of cells holding a stone.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| **c != Cell::Empty).count()
    }

    /// Number of cells left in the move pool.
    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }

    /// Remaining pool, in consumption order.
    pub fn pool(&self) -> impl Iterator<Item = &Coord> {
        self.pool.iter()
    }

    /// Place a stone of `color` at `(x, y)` and drop the cell from the pool.
    ///
    /// # Errors
    /// [`HexError::OutOfBounds`] or [`HexError::AlreadyOccupied`]; the board is left untouched.
    pub fn play(&mut self, color: PlayerColor, x: u32, y: u32) -> Result<(), HexError> {
        let Some(idx) = self.index(x, y) else {
            error!("{color} played ({x}, {y}) outside a {0}x{0} board", self.size);
            return Err(HexError::OutOfBounds { x, y });
        };
        if self.cells[idx] != Cell::Empty {
            error!("{color} played ({x}, {y}), already occupied by {:?}", self.cells[idx]);
            return Err(HexError::AlreadyOccupied { x, y });
        }

        self.cells[idx] = color.into();
        if let Some(pos) = self.pool.iter().position(|c| *c == (x, y)) {
            self.pool.remove(pos);
        }
        Ok(())
    }

    /// Pie-rule swap: every black stone turns white and vice versa, then the pool is rebuilt
    /// from the empty cells in a fresh random order.
    pub fn swap<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for cell in self.cells.iter_mut() {
            *cell = match *cell {
                Cell::Black => Cell::White,
                Cell::White => Cell::Black,
                Cell::Empty => Cell::Empty,
            };
        }
        self.refill_pool(rng);
        debug!(pool = self.pool.len(), "board swapped");
    }

    /// Take the next coordinate from the pool.
    ///
    /// # Errors
    /// [`HexError::Exhausted`] when no empty cell is left.
    pub fn next_pool_move(&mut self) -> Result<Coord, HexError> {
        self.pool.pop_front().ok_or(HexError::Exhausted)
    }

    fn refill_pool<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut empty: Vec<Coord> = (0..self.size)
            .flat_map(|y| (0..self.size).map(move |x| (x, y)))
            .filter(|(x, y)| self.cell(*x, *y) == Some(Cell::Empty))
            .collect();
        empty.shuffle(rng);
        self.pool = empty.into();
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.size && y < self.size {
            Some(y as usize * self.size as usize + x as usize)
        } else {
            None
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.size {
            write!(f, "{:indent$}", "", indent = 2 * y as usize)?;
            for x in 0..self.size {
                let c = match self.cell(x, y) {
                    Some(Cell::Black) => 'B',
                    Some(Cell::White) => 'W',
                    _ => '.',
                };
                write!(f, "{c} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
