use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::randomizer::RandomizerKind;

/// One row per second.
pub const DEFAULT_GRAVITY_MS: f32 = 1000.0;

#[derive(Clone, Serialize, Deserialize, Tsify, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineSettings {
    pub gravity_ms: f32,
    /// Hidden rows above the visible field; the page variants use 0 or 2.
    pub buffer_rows: usize,
    pub randomizer: RandomizerKind,
    pub seed: Option<u64>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            gravity_ms: DEFAULT_GRAVITY_MS,
            buffer_rows: 0,
            randomizer: RandomizerKind::SevenBag,
            seed: None,
        }
    }
}
