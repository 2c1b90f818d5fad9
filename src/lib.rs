pub mod board;
pub mod clock;
pub mod game;
mod log;
pub mod piece;
pub mod randomizer;
pub mod settings;
pub mod simulation;
pub mod view;

use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

pub use board::{Board, Position};
pub use clock::GravityClock;
pub use game::{ActivePiece, Command, GameState, TickOutcome, spawn_position};
pub use piece::{Rotation, Shape, Tetromino};
pub use randomizer::{Randomizer, RandomizerKind, SevenBag};
pub use settings::EngineSettings;
pub use simulation::{Simulation, Stimulus, StepOutcome};
pub use view::FrameView;

use crate::log::log;

#[wasm_bindgen(start)]
pub fn bootstrap() {
    console_error_panic_hook::set_once();
}

/// Page-facing handle. The page owns the timers, the key decoding and the
/// viewport math; it forwards decoded commands and sizes here.
#[wasm_bindgen]
pub struct GameClient {
    sim: Simulation,
}

#[wasm_bindgen]
impl GameClient {
    #[wasm_bindgen(constructor)]
    pub fn new(settings: JsValue, cols: usize, rows: usize) -> GameClient {
        let settings: EngineSettings = if settings.is_undefined() || settings.is_null() {
            EngineSettings::default()
        } else {
            from_value(settings).unwrap_or_else(|e| {
                log(&format!("[engine] bad settings, using defaults: {e}"));
                EngineSettings::default()
            })
        };
        Self {
            sim: Simulation::new(&settings, cols, rows),
        }
    }

    #[wasm_bindgen(js_name = tick)]
    pub fn tick(&mut self) -> Result<JsValue, JsValue> {
        to_value(&self.sim.tick()).map_err(|e| e.into())
    }

    /// Runs the gravity ticks due after `dt_ms` of page time.
    #[wasm_bindgen(js_name = advance)]
    pub fn advance(&mut self, dt_ms: f32) -> Result<JsValue, JsValue> {
        to_value(&self.sim.advance(dt_ms)).map_err(|e| e.into())
    }

    #[wasm_bindgen(js_name = moveLeft)]
    pub fn move_left(&mut self) -> bool {
        self.sim.command(Command::MoveLeft)
    }

    #[wasm_bindgen(js_name = moveRight)]
    pub fn move_right(&mut self) -> bool {
        self.sim.command(Command::MoveRight)
    }

    #[wasm_bindgen(js_name = softDrop)]
    pub fn soft_drop(&mut self) -> bool {
        self.sim.command(Command::SoftDrop)
    }

    #[wasm_bindgen(js_name = hardDrop)]
    pub fn hard_drop(&mut self) -> bool {
        self.sim.command(Command::HardDrop)
    }

    #[wasm_bindgen(js_name = rotateCw)]
    pub fn rotate_cw(&mut self) -> bool {
        self.sim.command(Command::RotateCw)
    }

    #[wasm_bindgen(js_name = rotateCcw)]
    pub fn rotate_ccw(&mut self) -> bool {
        self.sim.command(Command::RotateCcw)
    }

    #[wasm_bindgen(js_name = resize)]
    pub fn resize(&mut self, cols: usize, rows: usize) {
        self.sim.resize(cols, rows);
    }

    /// Accepts any serialized `Stimulus`, e.g. `"tick"` or
    /// `{ command: "hardDrop" }`.
    #[wasm_bindgen(js_name = dispatch)]
    pub fn dispatch(&mut self, stimulus: JsValue) -> Result<JsValue, JsValue> {
        let parsed: Stimulus = from_value(stimulus)?;
        to_value(&self.sim.handle(parsed)).map_err(|e| e.into())
    }

    #[wasm_bindgen(js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.sim.state().is_active()
    }

    /// Locked cells without the hidden rows, row-major.
    #[wasm_bindgen(js_name = visibleBoard)]
    pub fn visible_board(&self) -> js_sys::Uint8Array {
        js_sys::Uint8Array::from(self.sim.state().board().visible_cells().as_slice())
    }

    /// Visible cells with the active piece drawn in, row-major.
    #[wasm_bindgen(js_name = renderGrid)]
    pub fn render_grid(&self) -> js_sys::Uint8Array {
        let flat: Vec<u8> = self.sim.composited_board().into_iter().flatten().collect();
        js_sys::Uint8Array::from(flat.as_slice())
    }

    #[wasm_bindgen(js_name = snapshot)]
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_value(&self.sim.snapshot()).map_err(|e| e.into())
    }

    #[wasm_bindgen(js_name = snapshotJson)]
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.sim.snapshot()).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
