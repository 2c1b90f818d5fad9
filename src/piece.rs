use serde::{Deserialize, Serialize};
use tsify::Tsify;

/// Largest side of any catalog shape (the I piece).
pub const MAX_SHAPE_SIZE: usize = 4;

#[derive(Clone, Copy, Serialize, Deserialize, Tsify, Debug, PartialEq, Eq, Hash)]
pub enum Tetromino {
    I,
    J,
    L,
    O,
    S,
    Z,
    T,
}

impl Tetromino {
    pub fn all() -> [Tetromino; 7] {
        [
            Tetromino::I,
            Tetromino::J,
            Tetromino::L,
            Tetromino::O,
            Tetromino::S,
            Tetromino::Z,
            Tetromino::T,
        ]
    }

    /// Value written into occupied shape and board cells for this kind.
    pub fn cell_value(self) -> u8 {
        match self {
            Tetromino::I => 1,
            Tetromino::J => 2,
            Tetromino::L => 3,
            Tetromino::O => 4,
            Tetromino::S => 5,
            Tetromino::Z => 6,
            Tetromino::T => 7,
        }
    }

    pub fn shape(self) -> Shape {
        let v = self.cell_value();
        match self {
            Tetromino::I => Shape::from_rows(&[
                &[0, 0, 0, 0],
                &[v, v, v, v],
                &[0, 0, 0, 0],
                &[0, 0, 0, 0],
            ]),
            Tetromino::J => Shape::from_rows(&[&[v, 0, 0], &[v, v, v], &[0, 0, 0]]),
            Tetromino::L => Shape::from_rows(&[&[0, 0, v], &[v, v, v], &[0, 0, 0]]),
            Tetromino::O => Shape::from_rows(&[&[v, v], &[v, v]]),
            Tetromino::S => Shape::from_rows(&[&[0, v, v], &[v, v, 0], &[0, 0, 0]]),
            Tetromino::Z => Shape::from_rows(&[&[v, v, 0], &[0, v, v], &[0, 0, 0]]),
            Tetromino::T => Shape::from_rows(&[&[0, v, 0], &[v, v, v], &[0, 0, 0]]),
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

/// Square cell matrix of a piece. Only the top-left `size × size` block of
/// `cells` is meaningful; the rest stays zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Shape {
    size: usize,
    cells: [[u8; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

/// Occupied bounding box of a shape, in shape-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub min_row: usize,
    pub min_col: usize,
    pub width: usize,
    pub height: usize,
}

impl Shape {
    fn from_rows(rows: &[&[u8]]) -> Self {
        let size = rows.len();
        assert!(size <= MAX_SHAPE_SIZE, "shape larger than {MAX_SHAPE_SIZE}");
        let mut cells = [[0; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (r, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), size, "shape rows must form a square");
            cells[r][..size].copy_from_slice(row);
        }
        Self { size, cells }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> u8 {
        if row < self.size && col < self.size {
            self.cells[row][col]
        } else {
            0
        }
    }

    /// Occupied cells as `(row, col, value)`.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, u8)> + '_ {
        (0..self.size).flat_map(move |r| {
            (0..self.size).filter_map(move |c| {
                let v = self.cells[r][c];
                (v != 0).then_some((r, c, v))
            })
        })
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let mut min_row = usize::MAX;
        let mut min_col = usize::MAX;
        let mut max_row = 0;
        let mut max_col = 0;
        for (r, c, _) in self.occupied() {
            min_row = min_row.min(r);
            min_col = min_col.min(c);
            max_row = max_row.max(r);
            max_col = max_col.max(c);
        }
        if min_row == usize::MAX {
            return None;
        }
        Some(Bounds {
            min_row,
            min_col,
            width: max_col - min_col + 1,
            height: max_row - min_row + 1,
        })
    }

    /// Quarter turn: transpose, then reverse each row (clockwise) or the row
    /// order (counter-clockwise).
    pub fn rotated(&self, rotation: Rotation) -> Shape {
        let n = self.size;
        let mut transposed = [[0; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for r in 0..n {
            for c in 0..n {
                transposed[c][r] = self.cells[r][c];
            }
        }
        match rotation {
            Rotation::Clockwise => {
                for row in transposed.iter_mut().take(n) {
                    row[..n].reverse();
                }
            }
            Rotation::CounterClockwise => transposed[..n].reverse(),
        }
        Shape {
            size: n,
            cells: transposed,
        }
    }

    pub fn rows(&self) -> Vec<Vec<u8>> {
        (0..self.size)
            .map(|r| self.cells[r][..self.size].to_vec())
            .collect()
    }
}
