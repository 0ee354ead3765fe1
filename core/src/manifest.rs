use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::grid::PuzzleGrid;
use crate::piece::{NubState, PuzzlePiece};

/// Name shared by a piece's manifest key and its PNG file: `row{R}-col{C}`.
pub fn piece_name(row: u32, col: u32) -> String {
    format!("row{row}-col{col}")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieceManifest {
    pub row: u32,
    pub col: u32,
    pub top_nub: NubState,
    pub right_nub: NubState,
    pub bottom_nub: NubState,
    pub left_nub: NubState,
}

impl From<&PuzzlePiece> for PieceManifest {
    fn from(piece: &PuzzlePiece) -> Self {
        Self {
            row: piece.row,
            col: piece.col,
            top_nub: piece.top,
            right_nub: piece.right,
            bottom_nub: piece.bottom,
            left_nub: piece.left,
        }
    }
}

/// Serializable description of a generated puzzle: the grid shape, every
/// piece's edge states, and the cropped source's true pixel dimensions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleManifest {
    pub rows: u32,
    pub cols: u32,
    pub pieces: BTreeMap<String, PieceManifest>,
    pub pixels_wide: u32,
    pub pixels_tall: u32,
}

impl PuzzleManifest {
    pub fn new(grid: &PuzzleGrid, pixels_wide: u32, pixels_tall: u32) -> Self {
        let pieces = grid
            .pieces()
            .iter()
            .map(|piece| (piece_name(piece.row, piece.col), PieceManifest::from(piece)))
            .collect();
        Self {
            rows: grid.rows(),
            cols: grid.cols(),
            pieces,
            pixels_wide,
            pixels_tall,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::DEFAULT_SHAPE_SEED;

    #[test]
    fn names_follow_row_col_scheme() {
        assert_eq!(piece_name(0, 0), "row0-col0");
        assert_eq!(piece_name(3, 12), "row3-col12");
    }

    #[test]
    fn manifest_covers_every_piece() {
        let grid = PuzzleGrid::new(3, 4, DEFAULT_SHAPE_SEED).unwrap();
        let manifest = PuzzleManifest::new(&grid, 800, 600);
        assert_eq!(manifest.rows, 3);
        assert_eq!(manifest.cols, 4);
        assert_eq!(manifest.pieces.len(), 12);
        assert_eq!(manifest.pixels_wide, 800);
        assert_eq!(manifest.pixels_tall, 600);

        let first = &manifest.pieces["row0-col0"];
        assert_eq!(first.top_nub, NubState::Straight);
        assert_eq!(first.left_nub, NubState::Straight);
    }
}
