use common::{first_free, init_debug_logger, quiet, start, Script};
use hex_arena::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

mod common;

type Policy = fn(&mut Board) -> Result<Coord, HexError>;

fn engine(script: Script, swap: f64) -> ClientEngine<Script, Policy, StdRng> {
    init_debug_logger();
    ClientEngine::new(
        script,
        first_free as Policy,
        StdRng::seed_from_u64(3),
        quiet(swap),
    )
}

#[test]
fn black_plays_a_full_match_on_a_two_by_two_board() {
    let script = Script::new(&[
        start(PlayerColor::Black, 2),
        Message::Move { x: 1, y: 0 },
        Message::End {
            winner: PlayerColor::Black,
        },
    ]);
    let mut e = engine(script, 1.0);

    assert_eq!(e.run().unwrap(), PlayerColor::Black);
    assert_eq!(e.state(), EngineState::End);

    let board = e.board().unwrap();
    assert_eq!(board.cell(0, 0), Some(Cell::Black));
    assert_eq!(board.cell(1, 0), Some(Cell::White));
    assert_eq!(board.cell(0, 1), Some(Cell::Black));
    assert_eq!(board.cell(1, 1), Some(Cell::Empty));

    // END is terminal: no reads, no writes
    let written = {
        let script = e.into_inner();
        assert_eq!(
            script.sent(),
            vec![Message::Move { x: 0, y: 0 }, Message::Move { x: 0, y: 1 }]
        );
        script.written_bytes()
    };
    assert_eq!(written, 64);
}

#[test]
fn steps_after_end_do_nothing() {
    let script = Script::new(&[
        start(PlayerColor::White, 3),
        Message::End {
            winner: PlayerColor::Black,
        },
    ]);
    let mut e = engine(script, 0.0);
    assert_eq!(e.run().unwrap(), PlayerColor::Black);
    for _ in 0..3 {
        assert_eq!(e.step().unwrap(), EngineState::End);
    }
    assert!(e.into_inner().sent().is_empty());
}

#[test]
fn white_takes_the_first_stone_when_swapping() {
    let script = Script::new(&[
        start(PlayerColor::White, 3),
        Message::Move { x: 1, y: 1 },
        Message::Move { x: 0, y: 0 },
        Message::End {
            winner: PlayerColor::White,
        },
    ]);
    let mut e = engine(script, 1.0);

    assert_eq!(e.step().unwrap(), EngineState::Recv);
    // swap sent, still waiting for black
    assert_eq!(e.step().unwrap(), EngineState::Recv);
    assert_eq!(e.board().unwrap().cell(1, 1), Some(Cell::White));
    assert!(!e.match_state().unwrap().swap_available);

    // the second opponent move never triggers another swap
    assert_eq!(e.step().unwrap(), EngineState::Send);
    assert_eq!(e.step().unwrap(), EngineState::Recv);
    assert_eq!(e.step().unwrap(), EngineState::End);
    assert_eq!(e.winner(), Some(PlayerColor::White));

    let board = e.board().unwrap();
    assert_eq!(board.cell(0, 0), Some(Cell::Black));
    assert_eq!(board.cell(1, 0), Some(Cell::White));
    assert_eq!(board.occupied_count(), 3);
    assert_eq!(
        e.into_inner().sent(),
        vec![Message::Swap, Message::Move { x: 1, y: 0 }]
    );
}

#[test]
fn white_without_swap_answers_the_first_move() {
    let script = Script::new(&[
        start(PlayerColor::White, 3),
        Message::Move { x: 0, y: 0 },
        Message::End {
            winner: PlayerColor::Black,
        },
    ]);
    let mut e = engine(script, 0.0);
    assert_eq!(e.run().unwrap(), PlayerColor::Black);
    assert_eq!(e.board().unwrap().cell(0, 0), Some(Cell::Black));
    assert_eq!(e.into_inner().sent(), vec![Message::Move { x: 1, y: 0 }]);
}

#[test]
fn black_follows_an_opponent_swap() {
    let script = Script::new(&[
        start(PlayerColor::Black, 3),
        Message::Swap,
        Message::End {
            winner: PlayerColor::White,
        },
    ]);
    let mut e = engine(script, 1.0);
    assert_eq!(e.run().unwrap(), PlayerColor::White);

    let board = e.board().unwrap();
    assert_eq!(board.cell(0, 0), Some(Cell::White));
    assert_eq!(board.cell(1, 0), Some(Cell::Black));
    assert_eq!(board.pool_size(), 7);
    assert_eq!(
        e.into_inner().sent(),
        vec![Message::Move { x: 0, y: 0 }, Message::Move { x: 1, y: 0 }]
    );
}

#[test]
fn black_never_swaps() {
    let script = Script::new(&[
        start(PlayerColor::Black, 3),
        Message::Move { x: 2, y: 2 },
        Message::End {
            winner: PlayerColor::Black,
        },
    ]);
    let mut e = engine(script, 1.0);
    e.run().unwrap();
    assert!(!e.into_inner().sent().contains(&Message::Swap));
}

#[test]
fn judge_hanging_up_is_reported() {
    let mut e = engine(Script::new(&[start(PlayerColor::White, 3)]), 0.5);
    assert_eq!(e.step().unwrap(), EngineState::Recv);
    assert!(matches!(e.step(), Err(HexError::ConnectionClosed)));
    assert_eq!(e.state(), EngineState::Recv);
}

#[test]
fn unexpected_messages_are_violations() {
    let mut e = engine(Script::new(&[Message::Move { x: 0, y: 0 }]), 0.5);
    assert!(matches!(e.step(), Err(HexError::ProtocolViolation(_))));

    let mut e = engine(
        Script::new(&[start(PlayerColor::White, 3), start(PlayerColor::White, 3)]),
        0.5,
    );
    e.step().unwrap();
    assert!(matches!(e.step(), Err(HexError::ProtocolViolation(_))));
}

#[test]
fn opponent_move_on_taken_cell_is_rejected() {
    let script = Script::new(&[
        start(PlayerColor::Black, 3),
        Message::Move { x: 0, y: 0 },
    ]);
    let mut e = engine(script, 0.0);
    e.step().unwrap();
    e.step().unwrap();
    assert!(matches!(
        e.step(),
        Err(HexError::AlreadyOccupied { x: 0, y: 0 })
    ));
}

#[test]
fn opponent_move_off_the_board_is_rejected() {
    let script = Script::new(&[
        start(PlayerColor::White, 3),
        Message::Move { x: 3, y: 0 },
    ]);
    let mut e = engine(script, 0.0);
    e.step().unwrap();
    assert!(matches!(e.step(), Err(HexError::OutOfBounds { x: 3, y: 0 })));
}

#[test]
fn unplayable_board_size_is_a_violation() {
    let mut e = engine(Script::new(&[start(PlayerColor::White, u32::MAX)]), 0.0);
    assert!(matches!(e.step(), Err(HexError::ProtocolViolation(_))));
    assert!(e.board().is_none());

    let mut e = engine(Script::new(&[start(PlayerColor::Black, 0)]), 0.0);
    assert!(matches!(e.step(), Err(HexError::ProtocolViolation(_))));
}

#[test]
fn white_swap_right_is_spent_on_an_opening_swap() {
    let script = Script::new(&[
        start(PlayerColor::White, 3),
        Message::Swap,
        Message::Move { x: 2, y: 2 },
        Message::End {
            winner: PlayerColor::White,
        },
    ]);
    let mut e = engine(script, 1.0);
    assert_eq!(e.step().unwrap(), EngineState::Recv);
    assert_eq!(e.step().unwrap(), EngineState::Send);
    assert!(!e.match_state().unwrap().swap_available);

    // the next opponent move is answered, never swapped
    assert_eq!(e.step().unwrap(), EngineState::Recv);
    assert_eq!(e.step().unwrap(), EngineState::Send);
    assert_eq!(e.step().unwrap(), EngineState::Recv);
    assert_eq!(e.step().unwrap(), EngineState::End);
    let sent = e.into_inner().sent();
    assert_eq!(
        sent,
        vec![Message::Move { x: 0, y: 0 }, Message::Move { x: 1, y: 0 }]
    );
}
