use core::time::Duration;

use tracing::{debug, warn};

use crate::error::CascadeError;
use crate::grid::Grid;
use crate::matching::{MatchRun, find_matches};
use crate::render::Region;
use crate::tile::{TileId, TileSource};

/// The outcome of one detection pass that found matches.
#[derive(Debug, Clone, PartialEq)]
pub struct ClearedPass {
    /// One-based pass number within the cascade
    pub pass: u32,
    pub runs: Vec<MatchRun>,
    /// Tile occurrences across all runs
    pub points: u32,
    /// Tiles that received a new kind, each listed once
    pub retyped: Vec<TileId>,
    /// Screen area of every run, to be blanked until the board settles
    pub regions: Vec<Region>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeSummary {
    /// Passes that cleared something
    pub passes: u32,
    pub points: u32,
}

/// Detects runs once and, if any were found, retypes every matched tile in
/// place. Tiles neither fall nor shift. Returns `None` on a stable board.
pub fn resolve_pass(
    grid: &mut Grid,
    threshold: usize,
    source: &mut impl TileSource,
    pass: u32,
) -> Option<ClearedPass> {
    let matches = find_matches(grid, threshold);
    if matches.is_empty() {
        return None;
    }

    let points = matches.points();
    let retyped = matches.unique_tiles();
    for id in &retyped {
        if let Err(err) = grid.retype(*id, source.next_kind()) {
            debug_assert!(false, "matched tile vanished: {err}");
            warn!(%err, "could not retype matched tile");
        }
    }

    let tile_size = grid.tile_size();
    let runs = matches.into_runs();
    let regions = runs.iter().map(|run| run.bounds(tile_size)).collect();
    debug!(pass, runs = runs.len(), points, "cleared matches");

    Some(ClearedPass {
        pass,
        runs,
        points,
        retyped,
        regions,
    })
}

/// Runs passes back to back until the board is stable.
pub fn resolve(
    grid: &mut Grid,
    threshold: usize,
    source: &mut impl TileSource,
    max_passes: u32,
) -> Result<CascadeSummary, CascadeError> {
    let mut summary = CascadeSummary::default();
    while let Some(cleared) = resolve_pass(grid, threshold, source, summary.passes + 1) {
        summary.passes += 1;
        summary.points += cleared.points;
        if summary.passes >= max_passes {
            if find_matches(grid, threshold).is_empty() {
                break;
            }
            return Err(CascadeError::Unsettled {
                passes: summary.passes,
            });
        }
    }
    Ok(summary)
}

#[derive(Debug, Clone, PartialEq)]
pub enum CascadeProgress {
    /// The settle delay has not elapsed yet
    Waiting,
    Cleared(ClearedPass),
    /// A pass found nothing; the cascade is over
    Settled(CascadeSummary),
}

/// Drives a cascade one timed pass at a time.
///
/// Every pass waits out the settle delay first, then detects and clears. The
/// caller feeds elapsed time in, so any clock (a frame timer, a test) works.
/// At most one pass runs per call to [`CascadeResolver::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeResolver {
    delay: Duration,
    remaining: Duration,
    summary: CascadeSummary,
}

impl CascadeResolver {
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            remaining: delay,
            summary: CascadeSummary {
                passes: 0,
                points: 0,
            },
        }
    }

    pub const fn summary(&self) -> CascadeSummary {
        self.summary
    }

    /// Time left before the next pass runs.
    pub const fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn advance(
        &mut self,
        elapsed: Duration,
        grid: &mut Grid,
        threshold: usize,
        source: &mut impl TileSource,
    ) -> CascadeProgress {
        self.remaining = self.remaining.saturating_sub(elapsed);
        if !self.remaining.is_zero() {
            return CascadeProgress::Waiting;
        }

        match resolve_pass(grid, threshold, source, self.summary.passes + 1) {
            Some(cleared) => {
                self.summary.passes += 1;
                self.summary.points += cleared.points;
                self.remaining = self.delay;
                CascadeProgress::Cleared(cleared)
            }
            None => CascadeProgress::Settled(self.summary),
        }
    }
}
