use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::board::{Board, Position};
use crate::log::log;
use crate::piece::{Rotation, Shape, Tetromino};
use crate::randomizer::Randomizer;

/// Player commands, already decoded from raw input by the host.
#[derive(Clone, Copy, Serialize, Deserialize, Tsify, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateCw,
    RotateCcw,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "moveleft" | "move-left" => Ok(Command::MoveLeft),
            "right" | "moveright" | "move-right" => Ok(Command::MoveRight),
            "down" | "softdrop" | "soft-drop" => Ok(Command::SoftDrop),
            "drop" | "space" | "harddrop" | "hard-drop" => Ok(Command::HardDrop),
            "cw" | "up" | "rotatecw" | "rotate-cw" => Ok(Command::RotateCw),
            "ccw" | "z" | "rotateccw" | "rotate-ccw" => Ok(Command::RotateCcw),
            other => Err(format!("unknown command: {other}")),
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Tsify, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TickOutcome {
    Spawned(Tetromino),
    SpawnBlocked(Tetromino),
    Fell,
    Locked(Tetromino),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActivePiece {
    pub kind: Tetromino,
    pub shape: Shape,
    pub position: Position,
}

/// Spawn anchor for `kind`. Without buffer rows the I piece starts one row
/// higher so its empty top matrix row hangs above the board.
pub fn spawn_position(kind: Tetromino, cols: usize, buffer_rows: usize) -> Position {
    let half = (cols / 2) as i32;
    let x = match kind {
        Tetromino::O => half - 1,
        _ => half - 2,
    };
    let y = match (buffer_rows, kind) {
        (0, Tetromino::I) => -1,
        (0, _) => 0,
        (buffer, _) => buffer as i32 - 1,
    };
    Position { x, y }
}

/// Board, sequencer and active piece, mutated one stimulus at a time.
pub struct GameState {
    board: Board,
    randomizer: Box<dyn Randomizer>,
    active: Option<ActivePiece>,
    /// Drawn but not yet placed because its spawn cells were occupied.
    pending_spawn: Option<Tetromino>,
    spawn_blocked: bool,
}

impl GameState {
    pub fn new(
        cols: usize,
        visible_rows: usize,
        buffer_rows: usize,
        randomizer: Box<dyn Randomizer>,
    ) -> Self {
        Self {
            board: Board::new(cols, visible_rows, buffer_rows),
            randomizer,
            active: None,
            pending_spawn: None,
            spawn_blocked: false,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct board access for hosts that seed obstacles or test fixtures.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn spawn_blocked(&self) -> bool {
        self.spawn_blocked
    }

    /// Upcoming identifiers: a deferred spawn first, then the bag.
    pub fn upcoming(&self) -> Vec<Tetromino> {
        self.pending_spawn
            .into_iter()
            .chain(self.randomizer.pending())
            .collect()
    }

    /// Discards every locked cell, the bag and the active piece.
    pub fn reset(&mut self, cols: usize, visible_rows: usize) {
        let buffer_rows = self.board.buffer_rows();
        self.board = Board::new(cols, visible_rows, buffer_rows);
        self.randomizer.reset();
        self.active = None;
        self.pending_spawn = None;
        self.spawn_blocked = false;
    }

    /// Places `kind` at its spawn anchor when those cells are free. A blocked
    /// spawn leaves no piece active and keeps `kind` for the next attempt.
    pub fn spawn(&mut self, kind: Tetromino) -> bool {
        if self.active.is_some() {
            return false;
        }
        let piece = ActivePiece {
            kind,
            shape: kind.shape(),
            position: spawn_position(kind, self.board.cols(), self.board.buffer_rows()),
        };
        if !self.board.can_place(&piece.shape, piece.position) {
            if !self.spawn_blocked {
                log(&format!("[engine] spawn blocked for {kind:?}"));
            }
            self.spawn_blocked = true;
            self.pending_spawn = Some(kind);
            return false;
        }
        self.active = Some(piece);
        self.pending_spawn = None;
        self.spawn_blocked = false;
        true
    }

    /// Spawns the deferred piece, or the next one from the sequencer.
    fn spawn_next(&mut self) -> TickOutcome {
        let kind = match self.pending_spawn.take() {
            Some(kind) => kind,
            None => self.randomizer.next(),
        };
        if self.spawn(kind) {
            TickOutcome::Spawned(kind)
        } else {
            TickOutcome::SpawnBlocked(kind)
        }
    }

    /// Applies a command to the active piece. Returns whether anything moved.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::MoveLeft => self.try_shift(-1, 0),
            Command::MoveRight => self.try_shift(1, 0),
            Command::SoftDrop => self.try_shift(0, 1),
            Command::HardDrop => self.hard_drop(),
            Command::RotateCw => self.try_rotate(Rotation::Clockwise),
            Command::RotateCcw => self.try_rotate(Rotation::CounterClockwise),
        }
    }

    fn try_shift(&mut self, dx: i32, dy: i32) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        let target = active.position.offset(dx, dy);
        if !self.board.can_place(&active.shape, target) {
            return false;
        }
        active.position = target;
        true
    }

    /// Rotation in place: the turned shape must fit at the current anchor.
    /// There is no kick search.
    fn try_rotate(&mut self, rotation: Rotation) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        let turned = active.shape.rotated(rotation);
        if !self.board.can_place(&turned, active.position) {
            return false;
        }
        active.shape = turned;
        true
    }

    fn hard_drop(&mut self) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        let distance = self.board.drop_distance(&active.shape, active.position);
        active.position = active.position.offset(0, distance);
        self.lock_active();
        true
    }

    fn lock_active(&mut self) {
        if let Some(piece) = self.active.take() {
            self.board.lock(&piece.shape, piece.position);
        }
    }

    /// One gravity step: spawn when idle, otherwise fall one row or lock.
    pub fn tick(&mut self) -> TickOutcome {
        let Some(active) = self.active else {
            return self.spawn_next();
        };
        if self.try_shift(0, 1) {
            return TickOutcome::Fell;
        }
        self.lock_active();
        TickOutcome::Locked(active.kind)
    }

    /// Visible board with the active piece drawn over it, clipped to the
    /// visible area.
    pub fn composited(&self) -> Vec<Vec<u8>> {
        let mut grid = self.board.visible_grid();
        if let Some(active) = &self.active {
            let buffer = self.board.buffer_rows() as i32;
            for (r, c, v) in active.shape.occupied() {
                let x = active.position.x + c as i32;
                let y = active.position.y + r as i32 - buffer;
                if x < 0 || y < 0 {
                    continue;
                }
                if let Some(cell) = grid
                    .get_mut(y as usize)
                    .and_then(|row| row.get_mut(x as usize))
                {
                    *cell = v;
                }
            }
        }
        grid
    }
}
