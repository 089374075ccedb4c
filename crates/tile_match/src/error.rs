use thiserror::Error;

use crate::grid::Cell;
use crate::tile::TileId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("match threshold {threshold} is below the minimum of {minimum}")]
    ThresholdTooSmall { threshold: usize, minimum: usize },

    #[error("a {columns}x{rows} grid cannot hold a run of {threshold}")]
    GridTooSmall {
        columns: usize,
        rows: usize,
        threshold: usize,
    },

    #[error("palette of {requested} tile kinds requested, {available} available")]
    Palette { requested: u8, available: usize },

    #[error("tile size must be a positive number of pixels, got {0}")]
    TileSize(f32),

    #[error("diagonal threshold must be non-negative, got {0}")]
    DiagonalThreshold(f32),

    #[error("a round needs at least one turn")]
    NoTurns,

    #[error("high score board needs at least one slot")]
    NoHighScoreSlots,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("cell {cell} lies outside the {columns}x{rows} grid")]
    OutOfBounds {
        cell: Cell,
        columns: usize,
        rows: usize,
    },

    #[error("board layout holds {actual} kinds, expected {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("board is {}x{}, expected {}x{}", actual.0, actual.1, expected.0, expected.1)]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("no tile with id {0}")]
    UnknownTile(TileId),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CascadeError {
    #[error("board still had matches after {passes} passes")]
    Unsettled { passes: u32 },
}
