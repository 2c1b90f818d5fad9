//! End-to-end behavior of the engine through `Simulation`.

use blockfall::{
    Command, EngineSettings, Position, RandomizerKind, Shape, Simulation, Stimulus, StepOutcome,
    Tetromino, TickOutcome,
};

fn only(piece: Tetromino) -> EngineSettings {
    EngineSettings {
        randomizer: RandomizerKind::SinglePiece { piece },
        ..EngineSettings::default()
    }
}

fn turned_cw(shape: Shape, times: usize) -> Shape {
    (0..times).fold(shape, |s, _| s.rotated(blockfall::Rotation::Clockwise))
}

#[test]
fn o_hard_drop_on_ten_by_six() {
    let mut sim = Simulation::new(&only(Tetromino::O), 10, 6);
    assert_eq!(sim.tick(), TickOutcome::Spawned(Tetromino::O));
    assert_eq!(
        sim.state().active().unwrap().position,
        Position::new(4, 0)
    );

    assert!(sim.command(Command::HardDrop));
    assert!(!sim.state().is_active());

    let board = sim.visible_board();
    for (y, row) in board.iter().enumerate() {
        for (x, &cell) in row.iter().enumerate() {
            let expected = if (y == 4 || y == 5) && (x == 4 || x == 5) { 4 } else { 0 };
            assert_eq!(cell, expected, "cell ({x}, {y})");
        }
    }
    assert_eq!(&board[5][4..6], &[4, 4]);
}

#[test]
fn hard_drop_rests_lowest_row_on_floor() {
    for kind in Tetromino::all() {
        let mut sim = Simulation::new(&only(kind), 10, 8);
        sim.tick();
        sim.command(Command::HardDrop);
        let board = sim.visible_board();
        assert!(board[7].iter().any(|&c| c == kind.cell_value()), "{kind:?}");
        let locked = board.iter().flatten().filter(|&&c| c != 0).count();
        assert_eq!(locked, 4, "{kind:?}");
    }
}

#[test]
fn t_rotates_back_after_four_turns() {
    let mut sim = Simulation::new(&only(Tetromino::T), 10, 6);
    sim.tick();
    assert_eq!(
        sim.state().active().unwrap().position,
        Position::new(3, 0)
    );

    assert!(sim.command(Command::RotateCw));
    let original = Tetromino::T.shape();
    assert_eq!(sim.state().active().unwrap().shape, turned_cw(original, 1));
    assert_ne!(sim.state().active().unwrap().shape, original);

    for _ in 0..3 {
        assert!(sim.command(Command::RotateCw));
    }
    assert_eq!(sim.state().active().unwrap().shape, original);
    assert_eq!(
        sim.state().active().unwrap().position,
        Position::new(3, 0)
    );
}

#[test]
fn gravity_stops_above_obstruction_then_locks() {
    let mut sim = Simulation::new(&only(Tetromino::O), 10, 10);
    // Single locked cell under the O's left column.
    sim.state_mut().board_mut().set(4, 6, 3);

    assert_eq!(sim.tick(), TickOutcome::Spawned(Tetromino::O));
    let mut falls = 0;
    loop {
        match sim.tick() {
            TickOutcome::Fell => falls += 1,
            TickOutcome::Locked(kind) => {
                assert_eq!(kind, Tetromino::O);
                break;
            }
            other => panic!("unexpected {other:?}"),
        }
    }
    // O bottom row stops at row 5, directly above the obstruction.
    assert_eq!(falls, 4);
    let board = sim.visible_board();
    assert_eq!(&board[4][4..6], &[4, 4]);
    assert_eq!(&board[5][4..6], &[4, 4]);
    assert_eq!(board[6][4], 3);
    assert!(!sim.state().is_active());
}

#[test]
fn blocked_spawn_waits_without_game_over() {
    let mut sim = Simulation::new(&only(Tetromino::O), 4, 2);
    sim.tick();
    sim.command(Command::HardDrop);
    for _ in 0..3 {
        assert_eq!(sim.tick(), TickOutcome::SpawnBlocked(Tetromino::O));
        assert!(sim.snapshot().spawn_blocked);
    }
    sim.resize(4, 4);
    assert_eq!(sim.tick(), TickOutcome::Spawned(Tetromino::O));
    assert!(!sim.snapshot().spawn_blocked);
}

#[test]
fn seven_bag_deals_each_kind_once() {
    let settings = EngineSettings {
        seed: Some(2024),
        ..EngineSettings::default()
    };
    let mut sim = Simulation::new(&settings, 30, 60);
    let mut first_bag = Vec::new();
    for _ in 0..7 {
        let TickOutcome::Spawned(kind) = sim.tick() else {
            panic!("spawn expected");
        };
        first_bag.push(kind);
        sim.command(Command::HardDrop);
    }
    assert!(sim.snapshot().pending.is_empty());
    first_bag.sort_by_key(|k| k.cell_value());
    assert_eq!(first_bag, Tetromino::all().to_vec());

    // The eighth spawn opens a new bag.
    assert!(matches!(sim.tick(), TickOutcome::Spawned(_)));
    assert_eq!(sim.snapshot().pending.len(), 6);
}

#[test]
fn buffer_rows_hide_spawned_piece_top() {
    let settings = EngineSettings {
        buffer_rows: 2,
        ..only(Tetromino::T)
    };
    let mut sim = Simulation::new(&settings, 10, 6);
    sim.tick();
    assert_eq!(
        sim.state().active().unwrap().position,
        Position::new(3, 1)
    );
    let view = sim.snapshot();
    assert_eq!(view.rows, 6);
    assert_eq!(view.active.len(), 3);
    assert!(view.active.iter().all(|p| p.y == 0));

    sim.command(Command::HardDrop);
    let board = sim.visible_board();
    assert_eq!(board.len(), 6);
    assert_eq!(&board[5][3..6], &[7, 7, 7]);
    assert_eq!(board[4][4], 7);
}

#[test]
fn dispatch_resize_resets() {
    let mut sim = Simulation::new(&only(Tetromino::I), 10, 6);
    sim.handle(Stimulus::Tick);
    sim.handle(Stimulus::Command(Command::HardDrop));
    assert!(!sim.state().board().is_clear());
    assert_eq!(
        sim.handle(Stimulus::Resize { cols: 7, rows: 9 }),
        StepOutcome::Reset
    );
    assert!(sim.state().board().is_clear());
    assert_eq!(sim.visible_board().len(), 9);
    assert_eq!(
        sim.handle(Stimulus::Tick),
        StepOutcome::Ticked(TickOutcome::Spawned(Tetromino::I))
    );
    assert_eq!(
        sim.state().active().unwrap().position,
        Position::new(1, -1)
    );
}

#[test]
fn composited_board_shows_falling_piece() {
    let mut sim = Simulation::new(&only(Tetromino::S), 6, 4);
    sim.tick();
    sim.tick();
    let grid = sim.composited_board();
    assert_eq!(grid[1], vec![0, 0, 5, 5, 0, 0]);
    assert_eq!(grid[2], vec![0, 5, 5, 0, 0, 0]);
    assert!(sim.visible_board().iter().flatten().all(|&c| c == 0));
}
