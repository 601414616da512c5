#![allow(dead_code)]

use std::io::{self, Cursor, Read, Write};

use hex_arena::prelude::*;
use hex_arena::protocol::FRAME_SIZE;
use tracing::{Level, Metadata};
use tracing_subscriber::{
    fmt,
    layer::{Context, Filter, SubscriberExt},
    Layer, Registry,
};

struct CustomLevelFilter;
impl<S> Filter<S> for CustomLevelFilter {
    fn enabled(&self, meta: &Metadata<'_>, _cx: &Context<'_, S>) -> bool {
        meta.level() <= &Level::DEBUG
    }
}

pub fn init_debug_logger() {
    let format = fmt::format()
        .without_time()
        .with_ansi(true)
        .with_level(true)
        .with_thread_names(true)
        .with_target(false);

    let reg = Registry::default().with(
        fmt::layer()
            .with_test_writer()
            .event_format(format)
            .with_filter(CustomLevelFilter),
    );

    let _ = tracing::subscriber::set_global_default(reg);
}

/// Judge side of a connection: frames queued up front, everything the engine writes recorded.
pub struct Script {
    input: Cursor<Vec<u8>>,
    output: Vec<u8>,
}

impl Script {
    pub fn new(msgs: &[Message]) -> Self {
        Self {
            input: Cursor::new(msgs.iter().flat_map(|m| m.encode()).collect()),
            output: vec![],
        }
    }

    pub fn sent(&self) -> Vec<Message> {
        self.output
            .chunks(FRAME_SIZE)
            .map(|f| Message::decode(f).unwrap())
            .collect()
    }

    pub fn written_bytes(&self) -> usize {
        self.output.len()
    }
}

impl Read for Script {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.input.read(buf)
    }
}

impl Write for Script {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.output.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn start(player: PlayerColor, board_size: u32) -> Message {
    Message::Start(StartInfo {
        player,
        board_size,
        game_seconds: 30,
        thread_limit: 1,
        memory_limit_mib: 128,
    })
}

/// Deterministic policy: first empty cell in row-major order.
pub fn first_free(board: &mut Board) -> Result<Coord, HexError> {
    let size = board.size();
    (0..size * size)
        .map(|i| (i % size, i / size))
        .find(|&(x, y)| board.cell(x, y) == Some(Cell::Empty))
        .ok_or(HexError::Exhausted)
}

pub fn quiet(swap_probability: f64) -> Configuration {
    Configuration::new()
        .with_verbose(false)
        .with_seed(Some(42))
        .with_swap_probability(swap_probability)
}
