use serde::Serialize;
use tsify::Tsify;

use crate::board::Position;
use crate::game::GameState;
use crate::piece::Tetromino;

/// Everything the page needs to draw one frame. Coordinates are relative to
/// the visible field; buffer rows are already stripped.
#[derive(Serialize, Tsify, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FrameView {
    pub cols: usize,
    pub rows: usize,
    /// Locked cells, row-major.
    pub field: Vec<u8>,
    /// Visible cells of the active piece.
    pub active: Vec<Position>,
    pub active_color: Option<u8>,
    pub active_piece: Option<Tetromino>,
    pub active_shape: Option<Vec<Vec<u8>>>,
    /// Board-relative anchor, buffer rows included.
    pub active_position: Option<Position>,
    pub spawn_blocked: bool,
    pub pending: Vec<Tetromino>,
}

impl FrameView {
    pub fn capture(state: &GameState) -> Self {
        let board = state.board();
        let buffer = board.buffer_rows() as i32;
        let visible_rows = board.visible_rows() as i32;
        let active = state
            .active()
            .map(|piece| {
                piece
                    .shape
                    .occupied()
                    .filter_map(|(r, c, _)| {
                        let x = piece.position.x + c as i32;
                        let y = piece.position.y + r as i32 - buffer;
                        ((0..visible_rows).contains(&y) && (0..board.cols() as i32).contains(&x))
                            .then_some(Position { x, y })
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self {
            cols: board.cols(),
            rows: board.visible_rows(),
            field: board.visible_cells(),
            active,
            active_color: state.active().map(|p| p.kind.cell_value()),
            active_piece: state.active().map(|p| p.kind),
            active_shape: state.active().map(|p| p.shape.rows()),
            active_position: state.active().map(|p| p.position),
            spawn_blocked: state.spawn_blocked(),
            pending: state.upcoming(),
        }
    }
}
