use core::time::Duration;

use strum::EnumCount;

use crate::error::ConfigError;
use crate::tile::TileKind;

/// Smallest run length that makes sense for a match rule.
pub const MIN_MATCH_THRESHOLD: usize = 2;

/// Tunables for a match-3 session.
///
/// Pixel values are in board-local units: origin at the top-left corner of the
/// board, `x` growing to the right and `y` growing downwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Match3Config {
    /// Number of columns in the grid
    pub columns: usize,
    /// Number of rows in the grid
    pub rows: usize,
    /// Minimum run length that clears
    pub match_threshold: usize,
    /// Turns granted at the start of every round
    pub max_turns: u32,
    /// How many tile kinds are in play, taken from the start of the palette
    pub tile_kinds: u8,
    /// Pause between a clear and the next detection pass
    pub settle_delay: Duration,
    /// Drags whose axis deltas differ by less than this are treated as diagonal
    pub diagonal_threshold: f32,
    /// Results kept on the high score board
    pub max_high_scores: usize,
    /// Side length of one tile
    pub tile_size: f32,
    /// Paint tile ids on top of tiles
    pub show_ids: bool,
    /// Outline every cell
    pub show_grid: bool,
}

impl Default for Match3Config {
    fn default() -> Self {
        Self {
            columns: 12,
            rows: 8,
            match_threshold: 3,
            max_turns: 3,
            tile_kinds: 6,
            settle_delay: Duration::from_millis(250),
            diagonal_threshold: 10.0,
            max_high_scores: 3,
            tile_size: 48.0,
            show_ids: false,
            show_grid: false,
        }
    }
}

impl Match3Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.match_threshold < MIN_MATCH_THRESHOLD {
            return Err(ConfigError::ThresholdTooSmall {
                threshold: self.match_threshold,
                minimum: MIN_MATCH_THRESHOLD,
            });
        }
        if self.columns < self.match_threshold || self.rows < self.match_threshold {
            return Err(ConfigError::GridTooSmall {
                columns: self.columns,
                rows: self.rows,
                threshold: self.match_threshold,
            });
        }
        if self.tile_kinds == 0 || usize::from(self.tile_kinds) > TileKind::COUNT {
            return Err(ConfigError::Palette {
                requested: self.tile_kinds,
                available: TileKind::COUNT,
            });
        }
        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            return Err(ConfigError::TileSize(self.tile_size));
        }
        if self.diagonal_threshold.is_nan() || self.diagonal_threshold < 0.0 {
            return Err(ConfigError::DiagonalThreshold(self.diagonal_threshold));
        }
        if self.max_turns == 0 {
            return Err(ConfigError::NoTurns);
        }
        if self.max_high_scores == 0 {
            return Err(ConfigError::NoHighScoreSlots);
        }
        Ok(())
    }

    pub const fn cell_count(&self) -> usize {
        self.columns * self.rows
    }

    /// Board width in pixels.
    pub fn board_width(&self) -> f32 {
        self.columns as f32 * self.tile_size
    }

    /// Board height in pixels.
    pub fn board_height(&self) -> f32 {
        self.rows as f32 * self.tile_size
    }

    #[must_use]
    pub const fn with_dimensions(mut self, columns: usize, rows: usize) -> Self {
        self.columns = columns;
        self.rows = rows;
        self
    }

    #[must_use]
    pub const fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    #[must_use]
    pub const fn with_tile_kinds(mut self, tile_kinds: u8) -> Self {
        self.tile_kinds = tile_kinds;
        self
    }
}
