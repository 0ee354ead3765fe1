use std::fmt;

use crate::piece::{NubState, PuzzlePiece};

pub const DEFAULT_SHAPE_SEED: u32 = 0x5EED_9A75;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    InvalidGridSize { rows: u32, cols: u32 },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::InvalidGridSize { rows, cols } => {
                write!(f, "grid must have at least one row and column, got {rows}x{cols}")
            }
        }
    }
}

impl std::error::Error for GridError {}

pub fn splitmix32(mut value: u32) -> u32 {
    value = value.wrapping_add(0x9E37_79B9);
    let mut z = value;
    z = (z ^ (z >> 16)).wrapping_mul(0x85EB_CA6B);
    z = (z ^ (z >> 13)).wrapping_mul(0xC2B2_AE35);
    z ^ (z >> 16)
}

pub fn rand_unit(seed: u32, salt: u32) -> f32 {
    let mixed = splitmix32(seed ^ salt);
    let top = mixed >> 8;
    top as f32 / ((1u32 << 24) as f32)
}

fn nub_choice(seed: u32, salt: u32) -> NubState {
    if rand_unit(seed, salt) < 0.5 {
        NubState::TabOut
    } else {
        NubState::SocketIn
    }
}

/// A rows x cols field of interlocking pieces, stored row-major.
///
/// Built in a single row-major pass: the top and left edges of each piece are
/// the complements of the already-built neighbors above and to the left, so
/// every interior edge is decided exactly once and neighbors agree by
/// construction.
#[derive(Clone, Debug)]
pub struct PuzzleGrid {
    rows: u32,
    cols: u32,
    pieces: Vec<PuzzlePiece>,
}

impl PuzzleGrid {
    pub fn new(rows: u32, cols: u32, seed: u32) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::InvalidGridSize { rows, cols });
        }
        let mut pieces: Vec<PuzzlePiece> = Vec::with_capacity((rows * cols) as usize);
        for row in 0..rows {
            for col in 0..cols {
                let id = row * cols + col;
                let top = if row == 0 {
                    NubState::Straight
                } else {
                    pieces[(id - cols) as usize].bottom.complement()
                };
                let left = if col == 0 {
                    NubState::Straight
                } else {
                    pieces[(id - 1) as usize].right.complement()
                };
                let right = if col + 1 == cols {
                    NubState::Straight
                } else {
                    nub_choice(seed, id << 1)
                };
                let bottom = if row + 1 == rows {
                    NubState::Straight
                } else {
                    nub_choice(seed, (id << 1) | 1)
                };
                pieces.push(PuzzlePiece {
                    row,
                    col,
                    top,
                    right,
                    bottom,
                    left,
                });
            }
        }
        Ok(Self { rows, cols, pieces })
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn piece(&self, row: u32, col: u32) -> Option<&PuzzlePiece> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.pieces.get((row * self.cols + col) as usize)
    }

    /// All pieces in row-major order.
    pub fn pieces(&self) -> &[PuzzlePiece] {
        &self.pieces
    }
}
