use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::piece::Shape;

/// Board-relative anchor of a shape's top-left matrix cell. Row `y` grows
/// downward from the top buffer row.
#[derive(Clone, Copy, Serialize, Deserialize, Tsify, Debug, PartialEq, Eq, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Locked-cell grid. The first `buffer_rows` rows sit above the visible
/// field and are never rendered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cols: usize,
    rows: usize,
    buffer_rows: usize,
    cells: Vec<u8>,
}

impl Board {
    pub fn new(cols: usize, visible_rows: usize, buffer_rows: usize) -> Self {
        let rows = visible_rows + buffer_rows;
        Self {
            cols,
            rows,
            buffer_rows,
            cells: vec![0; cols * rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total rows, buffer included.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn buffer_rows(&self) -> usize {
        self.buffer_rows
    }

    pub fn visible_rows(&self) -> usize {
        self.rows - self.buffer_rows
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.cols || y as usize >= self.rows {
            return None;
        }
        Some(y as usize * self.cols + x as usize)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Writes a cell; returns false when out of bounds.
    pub fn set(&mut self, x: i32, y: i32, value: u8) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = value;
                true
            }
            None => false,
        }
    }

    pub fn is_empty_cell(&self, x: i32, y: i32) -> bool {
        self.get(x, y) == Some(0)
    }

    /// True when every occupied cell of `shape` anchored at `at` lands on an
    /// empty in-bounds cell. Empty shape cells are unconstrained.
    pub fn can_place(&self, shape: &Shape, at: Position) -> bool {
        shape
            .occupied()
            .all(|(r, c, _)| self.is_empty_cell(at.x + c as i32, at.y + r as i32))
    }

    /// Rows the shape can fall as a rigid body: the minimum, over occupied
    /// cells, of free rows directly beneath each cell. Rows above the board
    /// count as free.
    pub fn drop_distance(&self, shape: &Shape, at: Position) -> i32 {
        shape
            .occupied()
            .map(|(r, c, _)| {
                let x = at.x + c as i32;
                let mut y = at.y + r as i32;
                let mut free = 0;
                while y + 1 < self.rows as i32 && (y + 1 < 0 || self.is_empty_cell(x, y + 1)) {
                    free += 1;
                    y += 1;
                }
                free
            })
            .min()
            .unwrap_or(0)
    }

    /// Copies every occupied in-bounds cell of `shape` into the grid.
    pub fn lock(&mut self, shape: &Shape, at: Position) {
        for (r, c, v) in shape.occupied() {
            self.set(at.x + c as i32, at.y + r as i32, v);
        }
    }

    /// Rows below the hidden buffer, top to bottom.
    pub fn visible(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks(self.cols.max(1)).skip(self.buffer_rows)
    }

    pub fn visible_grid(&self) -> Vec<Vec<u8>> {
        self.visible().map(<[u8]>::to_vec).collect()
    }

    /// Visible cells flattened row-major.
    pub fn visible_cells(&self) -> Vec<u8> {
        self.cells[self.buffer_rows * self.cols..].to_vec()
    }

    pub fn is_clear(&self) -> bool {
        self.cells.iter().all(|&c| c == 0)
    }
}
