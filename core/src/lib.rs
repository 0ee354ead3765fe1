pub mod geometry;
pub mod grid;
pub mod manifest;
pub mod outline;
pub mod piece;

pub use grid::{GridError, PuzzleGrid, DEFAULT_SHAPE_SEED};
pub use manifest::{piece_name, PieceManifest, PuzzleManifest};
pub use outline::{build_path, path_origin, piece_size, OutlinePath, PathSegment};
pub use piece::{NubState, PuzzlePiece};
