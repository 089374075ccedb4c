//! Match-3 rules without an engine attached.
//!
//! A [`Session`](session::Session) owns the board and drives everything else:
//! pointer gestures become swaps, swaps start timed cascades, cascades score
//! and retype matched tiles, and finished rounds land on the high score board.
//! Drawing goes through the [`Renderer`](render::Renderer) trait so any front
//! end can paint the result.

pub mod cascade;
pub mod config;
pub mod error;
pub mod gesture;
pub mod grid;
pub mod history;
pub mod matching;
pub mod render;
pub mod session;
pub mod tile;

pub mod prelude {
    pub use crate::cascade::{CascadeProgress, CascadeResolver, CascadeSummary, ClearedPass};
    pub use crate::config::Match3Config;
    pub use crate::error::{CascadeError, ConfigError, GridError};
    pub use crate::gesture::{DropOutcome, RejectedMove};
    pub use crate::grid::{Cell, Direction, Grid};
    pub use crate::history::{HighScores, ScoreEntry};
    pub use crate::matching::{Axis, MatchRun, Matches, find_matches};
    pub use crate::render::{DrawCommand, FrameRecorder, Region, Renderer};
    pub use crate::session::{PointerEvent, PointerPhase, RoundStatus, Session, SessionEvent};
    pub use crate::tile::{Point, RandomTiles, ScriptedTiles, Tile, TileId, TileKind, TileSource};
}
