use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::clock::GravityClock;
use crate::game::{Command, GameState, TickOutcome};
use crate::log::log;
use crate::randomizer::randomizer_from_kind;
use crate::settings::EngineSettings;
use crate::view::FrameView;

/// One unit of external input. Each is handled to completion before the
/// next one is looked at.
#[derive(Clone, Copy, Serialize, Deserialize, Tsify, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Stimulus {
    Tick,
    Command(Command),
    Resize { cols: usize, rows: usize },
}

#[derive(Clone, Copy, Serialize, Tsify, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum StepOutcome {
    Ticked(TickOutcome),
    Commanded { command: Command, changed: bool },
    Reset,
}

/// Single owner of the game state and its gravity clock.
pub struct Simulation {
    state: GameState,
    clock: GravityClock,
}

impl Simulation {
    pub fn new(settings: &EngineSettings, cols: usize, rows: usize) -> Self {
        let randomizer = randomizer_from_kind(&settings.randomizer, settings.seed);
        Self {
            state: GameState::new(cols, rows, settings.buffer_rows, randomizer),
            clock: GravityClock::new(settings.gravity_ms),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn handle(&mut self, stimulus: Stimulus) -> StepOutcome {
        match stimulus {
            Stimulus::Tick => StepOutcome::Ticked(self.tick()),
            Stimulus::Command(command) => StepOutcome::Commanded {
                command,
                changed: self.command(command),
            },
            Stimulus::Resize { cols, rows } => {
                self.resize(cols, rows);
                StepOutcome::Reset
            }
        }
    }

    pub fn tick(&mut self) -> TickOutcome {
        self.state.tick()
    }

    pub fn command(&mut self, command: Command) -> bool {
        self.state.apply(command)
    }

    /// Rebuilds the board at the new size, drops the bag and the active
    /// piece, and restarts gravity timing.
    pub fn resize(&mut self, cols: usize, rows: usize) {
        log(&format!("[engine] resize to {cols}x{rows}"));
        self.state.reset(cols, rows);
        self.clock.reset();
    }

    /// Feeds elapsed host time to the gravity clock and runs the due ticks.
    pub fn advance(&mut self, dt_ms: f32) -> Vec<TickOutcome> {
        let due = self.clock.advance(dt_ms);
        (0..due).map(|_| self.state.tick()).collect()
    }

    pub fn visible_board(&self) -> Vec<Vec<u8>> {
        self.state.board().visible_grid()
    }

    pub fn composited_board(&self) -> Vec<Vec<u8>> {
        self.state.composited()
    }

    pub fn snapshot(&self) -> FrameView {
        FrameView::capture(&self.state)
    }
}
