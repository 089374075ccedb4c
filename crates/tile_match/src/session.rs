use core::time::Duration;

use queues::{IsQueue, Queue};
use tracing::{debug, info, warn};

use crate::cascade::{CascadeProgress, CascadeResolver, CascadeSummary, ClearedPass};
use crate::config::Match3Config;
use crate::error::{ConfigError, GridError};
use crate::gesture::{DropOutcome, RejectedMove, validate_drop};
use crate::grid::{Cell, Grid};
use crate::history::{HighScores, ScoreEntry};
use crate::render::{Region, Renderer};
use crate::tile::{Point, RandomTiles, TileId, TileSource};

/// What the pointer is currently doing.
///
/// Drops and leaves are handled the moment they arrive and always return the
/// pointer to `Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PointerPhase {
    #[default]
    Idle,
    Clicked,
    Dragging,
}

/// Pointer input in board-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up(Point),
    /// The pointer left the play area
    Leave,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RoundStatus {
    /// No round has been started yet
    #[default]
    Pending,
    Playing,
    Over,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    RoundStarted { round: u32 },
    TileGrabbed { tile: TileId, cell: Cell },
    TileDragged { tile: TileId, position: Point },
    DragCancelled { tile: TileId },
    Swapped { from: Cell, to: Cell },
    MoveRejected(RejectedMove),
    TurnsChanged { remaining: u32 },
    ProcessingChanged { processing: bool },
    Cleared { cleared: ClearedPass, score: u32 },
    Settled(CascadeSummary),
    GameOver { entry: ScoreEntry, kept: bool },
}

/// FIFO of session events, drained by the front end.
#[derive(Debug)]
pub struct SessionEvents(Queue<SessionEvent>);

impl Default for SessionEvents {
    fn default() -> Self {
        Self(Queue::new())
    }
}

impl SessionEvents {
    fn push(&mut self, event: SessionEvent) {
        if let Err(err) = self.0.add(event) {
            warn!(error = err, "dropped session event");
        }
    }

    pub fn pop(&mut self) -> Option<SessionEvent> {
        self.0.remove().ok()
    }

    pub fn len(&self) -> usize {
        self.0.size()
    }

    pub fn is_empty(&self) -> bool {
        self.0.size() == 0
    }

    pub fn drain(&mut self) -> Vec<SessionEvent> {
        core::iter::from_fn(|| self.pop()).collect()
    }
}

/// The tile held by the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Grab {
    tile: TileId,
    origin: Cell,
    anchor: Point,
    /// Pointer position relative to the tile's top-left corner
    offset: Point,
}

/// One player's game: the current round plus results that outlive it.
///
/// Score, turns and the board reset with every round; the round counter and
/// the high score board last as long as the session.
#[derive(Debug)]
pub struct Session<S = RandomTiles> {
    config: Match3Config,
    source: S,
    grid: Grid,
    status: RoundStatus,
    round: u32,
    score: u32,
    remaining_turns: u32,
    high_scores: HighScores,
    cascade: Option<CascadeResolver>,
    /// Areas cleared by the latest pass, blank until the next one runs
    cleared: Vec<Region>,
    phase: PointerPhase,
    grab: Option<Grab>,
    events: SessionEvents,
}

impl Session<RandomTiles> {
    pub fn new(config: Match3Config) -> Result<Self, ConfigError> {
        let source = RandomTiles::new(config.tile_kinds);
        Self::with_source(config, source)
    }
}

impl<S: TileSource> Session<S> {
    pub fn with_source(config: Match3Config, mut source: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = Grid::generate(config.columns, config.rows, config.tile_size, &mut source);
        Ok(Self {
            high_scores: HighScores::new(config.max_high_scores),
            remaining_turns: config.max_turns,
            config,
            source,
            grid,
            status: RoundStatus::Pending,
            round: 0,
            score: 0,
            cascade: None,
            cleared: Vec::new(),
            phase: PointerPhase::Idle,
            grab: None,
            events: SessionEvents::default(),
        })
    }

    /// Deals a fresh board and begins the next round.
    pub fn start_round(&mut self) {
        let grid = Grid::generate(
            self.config.columns,
            self.config.rows,
            self.config.tile_size,
            &mut self.source,
        );
        self.begin(grid);
    }

    /// Begins the next round on a prepared board.
    pub fn start_round_with_grid(&mut self, grid: Grid) -> Result<(), GridError> {
        if grid.columns() != self.config.columns || grid.rows() != self.config.rows {
            return Err(GridError::DimensionMismatch {
                expected: (self.config.columns, self.config.rows),
                actual: (grid.columns(), grid.rows()),
            });
        }
        self.begin(grid);
        Ok(())
    }

    fn begin(&mut self, grid: Grid) {
        self.grid = grid;
        self.round += 1;
        self.score = 0;
        self.remaining_turns = self.config.max_turns;
        self.status = RoundStatus::Playing;
        self.phase = PointerPhase::Idle;
        self.grab = None;
        self.cleared.clear();
        info!(round = self.round, "round started");
        self.events
            .push(SessionEvent::RoundStarted { round: self.round });
        self.events.push(SessionEvent::TurnsChanged {
            remaining: self.remaining_turns,
        });
        // a freshly dealt board may already hold runs
        self.start_cascade();
    }

    pub const fn config(&self) -> &Match3Config {
        &self.config
    }

    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    pub const fn status(&self) -> RoundStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status == RoundStatus::Over
    }

    pub const fn is_processing(&self) -> bool {
        self.cascade.is_some()
    }

    /// Pointer input only counts during a round, between cascades.
    pub fn accepts_input(&self) -> bool {
        self.status == RoundStatus::Playing && !self.is_processing()
    }

    /// The board is shown dimmed while it ignores input.
    pub fn is_dimmed(&self) -> bool {
        self.is_processing() || self.is_over()
    }

    pub const fn round(&self) -> u32 {
        self.round
    }

    pub const fn score(&self) -> u32 {
        self.score
    }

    pub const fn remaining_turns(&self) -> u32 {
        self.remaining_turns
    }

    pub const fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub const fn phase(&self) -> PointerPhase {
        self.phase
    }

    pub fn cleared_regions(&self) -> &[Region] {
        &self.cleared
    }

    pub fn grabbed(&self) -> Option<TileId> {
        self.grab.map(|grab| grab.tile)
    }

    pub const fn events(&mut self) -> &mut SessionEvents {
        &mut self.events
    }

    pub fn pointer(&mut self, event: PointerEvent) {
        if !self.accepts_input() {
            return;
        }
        match event {
            PointerEvent::Down(point) => self.press(point),
            PointerEvent::Move(point) => self.drag(point),
            PointerEvent::Up(point) => self.release(point),
            PointerEvent::Leave => self.leave(),
        }
    }

    fn press(&mut self, point: Point) {
        self.phase = PointerPhase::Clicked;
        let Some(tile) = self.grid.tile_at_point(point) else {
            return;
        };
        let Some(origin) = self.grid.cell_of(tile.id) else {
            debug_assert!(false, "tile {} is not resting in any cell", tile.id);
            warn!(tile = %tile.id, "grabbed tile has no cell");
            return;
        };
        let grab = Grab {
            tile: tile.id,
            origin,
            anchor: point,
            offset: point - tile.position,
        };
        self.grab = Some(grab);
        self.events.push(SessionEvent::TileGrabbed {
            tile: grab.tile,
            cell: origin,
        });
    }

    fn drag(&mut self, point: Point) {
        if self.phase == PointerPhase::Idle {
            return;
        }
        self.phase = PointerPhase::Dragging;
        let Some(grab) = self.grab else {
            return;
        };
        let position = point - grab.offset;
        if let Err(err) = self.grid.move_tile(grab.tile, position) {
            debug_assert!(false, "dragged tile vanished: {err}");
            warn!(%err, "could not move dragged tile");
            return;
        }
        self.events.push(SessionEvent::TileDragged {
            tile: grab.tile,
            position,
        });
    }

    fn release(&mut self, point: Point) {
        self.phase = PointerPhase::Idle;
        let Some(grab) = self.grab.take() else {
            return;
        };
        self.snap_back(grab.tile);

        let outcome = validate_drop(
            &self.grid,
            grab.origin,
            grab.anchor,
            point,
            self.config.diagonal_threshold,
        );
        match outcome {
            DropOutcome::Cancelled => {
                self.events
                    .push(SessionEvent::DragCancelled { tile: grab.tile });
            }
            DropOutcome::Swap { from, to, .. } => {
                if let Err(err) = self.grid.swap(from, to) {
                    debug_assert!(false, "validated swap failed: {err}");
                    warn!(%err, "swap failed");
                    return;
                }
                debug!(%from, %to, "swapped tiles");
                self.events.push(SessionEvent::Swapped { from, to });
                self.spend_turn();
                self.start_cascade();
            }
            DropOutcome::Rejected(reason) => {
                debug!(?reason, "move rejected");
                self.events.push(SessionEvent::MoveRejected(reason));
                self.spend_turn();
                if self.remaining_turns == 0 {
                    self.finish_round();
                }
            }
        }
    }

    fn leave(&mut self) {
        if self.phase != PointerPhase::Dragging {
            return;
        }
        self.phase = PointerPhase::Idle;
        if let Some(grab) = self.grab.take() {
            self.snap_back(grab.tile);
            self.events
                .push(SessionEvent::DragCancelled { tile: grab.tile });
        }
    }

    fn snap_back(&mut self, tile: TileId) {
        if let Err(err) = self.grid.settle(tile) {
            debug_assert!(false, "released tile vanished: {err}");
            warn!(%err, "could not settle released tile");
        }
    }

    fn spend_turn(&mut self) {
        self.remaining_turns = self.remaining_turns.saturating_sub(1);
        self.events.push(SessionEvent::TurnsChanged {
            remaining: self.remaining_turns,
        });
    }

    fn start_cascade(&mut self) {
        self.cascade = Some(CascadeResolver::new(self.config.settle_delay));
        self.events
            .push(SessionEvent::ProcessingChanged { processing: true });
    }

    /// Moves the clock forward, running at most one cascade pass.
    pub fn advance(&mut self, elapsed: Duration) {
        let Some(cascade) = self.cascade.as_mut() else {
            return;
        };
        let progress = cascade.advance(
            elapsed,
            &mut self.grid,
            self.config.match_threshold,
            &mut self.source,
        );

        match progress {
            CascadeProgress::Waiting => {}
            CascadeProgress::Cleared(cleared) => {
                self.score += cleared.points;
                self.cleared.clone_from(&cleared.regions);
                self.events.push(SessionEvent::Cleared {
                    cleared,
                    score: self.score,
                });
            }
            CascadeProgress::Settled(summary) => {
                self.cascade = None;
                self.cleared.clear();
                self.events
                    .push(SessionEvent::ProcessingChanged { processing: false });
                self.events.push(SessionEvent::Settled(summary));
                if self.status == RoundStatus::Playing && self.remaining_turns == 0 {
                    self.finish_round();
                }
            }
        }
    }

    /// Steps the cascade in settle-delay increments until it ends. Returns
    /// false if it was still running after `max_passes` passes.
    pub fn run_until_settled(&mut self, max_passes: u32) -> bool {
        let mut steps = 0;
        while self.is_processing() {
            if steps > max_passes {
                return false;
            }
            self.advance(self.config.settle_delay);
            steps += 1;
        }
        true
    }

    fn finish_round(&mut self) {
        self.status = RoundStatus::Over;
        self.phase = PointerPhase::Idle;
        self.grab = None;
        let entry = ScoreEntry {
            score: self.score,
            round: self.round,
        };
        let kept = self.high_scores.record(entry);
        info!(score = entry.score, round = entry.round, kept, "round over");
        self.events.push(SessionEvent::GameOver { entry, kept });
    }

    /// Paints the readouts and every tile, the grabbed one last, then blanks
    /// whatever the latest cascade pass cleared.
    pub fn draw(&self, renderer: &mut impl Renderer) {
        renderer.update_readouts(self.score, self.remaining_turns);

        let grabbed = self.grabbed();
        let show_ids = self.config.show_ids;
        for tile in self.grid.tiles() {
            if Some(tile.id) != grabbed {
                renderer.draw_tile(tile, show_ids);
            }
        }
        if let Some(tile) = grabbed.and_then(|id| self.grid.tile(id)) {
            renderer.draw_tile(tile, show_ids);
        }
        for region in &self.cleared {
            renderer.clear_region(*region);
        }
    }
}
