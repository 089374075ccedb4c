use std::collections::BTreeSet;

use crate::grid::{Cell, Grid};
use crate::render::Region;
use crate::tile::{TileId, TileKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// A contiguous line of same-kind tiles at least as long as the threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRun {
    pub axis: Axis,
    pub kind: TileKind,
    pub start: Cell,
    pub tiles: Vec<TileId>,
}

impl MatchRun {
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Cells covered by the run, from `start` along its axis.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let start = self.start;
        (0..self.len()).map(move |offset| match self.axis {
            Axis::Horizontal => Cell::new(start.col + offset, start.row),
            Axis::Vertical => Cell::new(start.col, start.row + offset),
        })
    }

    /// Pixel bounding box of the run.
    pub fn bounds(&self, tile_size: f32) -> Region {
        let (columns, rows) = match self.axis {
            Axis::Horizontal => (self.len(), 1),
            Axis::Vertical => (1, self.len()),
        };
        Region {
            x: self.start.col as f32 * tile_size,
            y: self.start.row as f32 * tile_size,
            width: columns as f32 * tile_size,
            height: rows as f32 * tile_size,
        }
    }
}

/// Every run found in one detection pass: horizontal runs first, then vertical.
///
/// Runs from the two axes are kept side by side even when they share tiles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matches(Vec<MatchRun>);

impl Matches {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn runs(&self) -> &[MatchRun] {
        &self.0
    }

    pub fn into_runs(self) -> Vec<MatchRun> {
        self.0
    }

    pub fn iter(&self) -> core::slice::Iter<'_, MatchRun> {
        self.0.iter()
    }

    pub fn along(&self, axis: Axis) -> impl Iterator<Item = &MatchRun> {
        self.0.iter().filter(move |run| run.axis == axis)
    }

    /// One point per tile per run; a tile on a crossing counts twice.
    pub fn points(&self) -> u32 {
        self.0.iter().map(|run| run.len() as u32).sum()
    }

    /// Matched tiles with crossings counted once, in id order.
    pub fn unique_tiles(&self) -> Vec<TileId> {
        self.0
            .iter()
            .flat_map(|run| run.tiles.iter().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl<'a> IntoIterator for &'a Matches {
    type Item = &'a MatchRun;
    type IntoIter = core::slice::Iter<'a, MatchRun>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The run being accumulated while walking one line.
struct PendingRun {
    kind: TileKind,
    start: Cell,
    tiles: Vec<TileId>,
}

struct LineScanner {
    axis: Axis,
    threshold: usize,
    pending: Option<PendingRun>,
    found: Vec<MatchRun>,
}

impl LineScanner {
    const fn new(axis: Axis, threshold: usize) -> Self {
        Self {
            axis,
            threshold,
            pending: None,
            found: Vec::new(),
        }
    }

    fn push(&mut self, cell: Cell, id: TileId, kind: TileKind) {
        if let Some(run) = self.pending.as_mut() {
            if run.kind == kind {
                run.tiles.push(id);
                return;
            }
        }
        self.commit();
        self.pending = Some(PendingRun {
            kind,
            start: cell,
            tiles: vec![id],
        });
    }

    /// Closes the pending run, keeping it when it reaches the threshold.
    fn commit(&mut self) {
        if let Some(run) = self.pending.take() {
            if run.tiles.len() >= self.threshold {
                self.found.push(MatchRun {
                    axis: self.axis,
                    kind: run.kind,
                    start: run.start,
                    tiles: run.tiles,
                });
            }
        }
    }

    fn scan(&mut self, grid: &Grid, line: impl Iterator<Item = Cell>) {
        for cell in line {
            let Some(tile) = grid.get(cell) else {
                debug_assert!(false, "cell {cell} has no tile");
                tracing::warn!(%cell, "match scan found an empty cell");
                self.commit();
                continue;
            };
            self.push(cell, tile.id, tile.kind);
        }
        // runs never continue into the next line
        self.commit();
    }
}

/// Scans rows then columns for runs of at least `threshold` same-kind tiles.
pub fn find_matches(grid: &Grid, threshold: usize) -> Matches {
    let mut horizontal = LineScanner::new(Axis::Horizontal, threshold);
    for row in 0..grid.rows() {
        horizontal.scan(grid, grid.row_cells(row));
    }

    let mut vertical = LineScanner::new(Axis::Vertical, threshold);
    for col in 0..grid.columns() {
        vertical.scan(grid, grid.column_cells(col));
    }

    let mut runs = horizontal.found;
    runs.append(&mut vertical.found);
    Matches(runs)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use strum::{EnumCount, IntoEnumIterator};

    use super::*;
    use crate::tile::TileKind::{Blue, Cyan, Green, Purple, Red, Yellow};

    fn grid(columns: usize, rows: usize, kinds: &[TileKind]) -> Grid {
        Grid::from_kinds(columns, rows, 48.0, kinds).expect("layout matches dimensions")
    }

    /// A 12x8 board where no three neighbours share a kind on either axis.
    fn quiet_board() -> Grid {
        let palette: Vec<TileKind> = TileKind::iter().collect();
        let kinds: Vec<TileKind> = (0..8)
            .flat_map(|row| (0..12).map(move |col| (col + 2 * row) % 4))
            .map(|index| palette[index])
            .collect();
        grid(12, 8, &kinds)
    }

    #[test]
    fn quiet_board_has_no_runs() {
        let board = quiet_board();
        assert!(find_matches(&board, 3).is_empty());
    }

    #[test]
    fn three_in_a_row_is_a_single_horizontal_run() {
        let mut board = quiet_board();
        for col in 0..3 {
            board
                .set(Cell::new(col, 0), Green)
                .expect("cell is on the board");
        }
        let matches = find_matches(&board, 3);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches.along(Axis::Vertical).count(), 0);
        let run = matches.runs().first().expect("one run");
        assert_eq!(run.axis, Axis::Horizontal);
        assert_eq!(run.kind, Green);
        assert_eq!(run.start, Cell::new(0, 0));
        let expected: Vec<TileId> = (0..3)
            .filter_map(|col| board.id_at(Cell::new(col, 0)))
            .collect();
        assert_eq!(run.tiles, expected);
    }

    #[test]
    fn longer_runs_are_not_split() {
        #[rustfmt::skip]
        let board = grid(5, 3, &[
            Red,  Red,  Red,  Red,  Red,
            Blue, Cyan, Blue, Cyan, Blue,
            Cyan, Blue, Cyan, Blue, Cyan,
        ]);
        let matches = find_matches(&board, 3);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches.runs().first().map(MatchRun::len), Some(5));
        assert_eq!(matches.points(), 5);
    }

    #[test]
    fn runs_end_at_the_row_boundary() {
        // two tiles at the end of row 0 and one at the start of row 1
        #[rustfmt::skip]
        let board = grid(4, 3, &[
            Blue,   Cyan,   Red,  Red,
            Red,    Yellow, Cyan, Blue,
            Yellow, Blue,   Blue, Cyan,
        ]);
        assert!(find_matches(&board, 3).is_empty());
    }

    #[test]
    fn runs_end_at_the_column_boundary() {
        // column 0 ends with two reds and column 1 starts with one
        #[rustfmt::skip]
        let board = grid(3, 4, &[
            Blue,   Red,    Cyan,
            Yellow, Cyan,   Blue,
            Red,    Yellow, Cyan,
            Red,    Blue,   Yellow,
        ]);
        assert!(find_matches(&board, 3).is_empty());
    }

    #[test]
    fn a_run_is_committed_when_the_kind_changes_mid_line() {
        #[rustfmt::skip]
        let board = grid(6, 3, &[
            Cyan, Purple, Purple, Purple, Cyan, Blue,
            Blue, Cyan,   Blue,   Cyan,   Blue, Cyan,
            Cyan, Blue,   Cyan,   Blue,   Cyan, Blue,
        ]);
        let matches = find_matches(&board, 3);
        assert_eq!(matches.len(), 1);
        let run = matches.runs().first().expect("one run");
        assert_eq!(run.start, Cell::new(1, 0));
        assert_eq!(run.kind, Purple);
        assert_eq!(
            run.cells().collect::<Vec<_>>(),
            vec![Cell::new(1, 0), Cell::new(2, 0), Cell::new(3, 0)]
        );
    }

    #[test]
    fn crossing_runs_are_both_reported_and_the_shared_tile_scores_twice() {
        #[rustfmt::skip]
        let board = grid(3, 3, &[
            Blue, Red,  Cyan,
            Red,  Red,  Red,
            Cyan, Red,  Blue,
        ]);
        let matches = find_matches(&board, 3);

        assert_eq!(matches.along(Axis::Horizontal).count(), 1);
        assert_eq!(matches.along(Axis::Vertical).count(), 1);
        assert_eq!(matches.points(), 6);
        assert_eq!(matches.unique_tiles().len(), 5);
        // horizontal runs come first
        assert_eq!(
            matches.runs().first().map(|run| run.axis),
            Some(Axis::Horizontal)
        );
    }

    #[test]
    fn bounds_cover_the_run() {
        #[rustfmt::skip]
        let board = grid(3, 3, &[
            Blue, Red,  Cyan,
            Cyan, Red,  Blue,
            Blue, Red,  Cyan,
        ]);
        let matches = find_matches(&board, 3);
        let run = matches.runs().first().expect("vertical run");
        assert_eq!(
            run.bounds(48.0),
            Region {
                x: 48.0,
                y: 0.0,
                width: 48.0,
                height: 144.0
            }
        );
    }

    #[test]
    fn threshold_is_respected() {
        #[rustfmt::skip]
        let board = grid(4, 3, &[
            Red,  Red,  Blue, Cyan,
            Cyan, Blue, Cyan, Blue,
            Blue, Cyan, Blue, Cyan,
        ]);
        assert!(find_matches(&board, 3).is_empty());
        assert_eq!(find_matches(&board, 2).len(), 1);
    }

    fn arbitrary_board() -> impl Strategy<Value = (usize, usize, Vec<TileKind>)> {
        (3usize..10, 3usize..10).prop_flat_map(|(columns, rows)| {
            let kinds = prop::collection::vec(0u8..TileKind::COUNT as u8, columns * rows)
                .prop_map(|indices| {
                    indices
                        .into_iter()
                        .filter_map(TileKind::from_index)
                        .collect::<Vec<_>>()
                });
            (Just(columns), Just(rows), kinds)
        })
    }

    proptest! {
        #[test]
        fn every_run_is_long_homogeneous_and_contiguous((columns, rows, kinds) in arbitrary_board()) {
            let board = grid(columns, rows, &kinds);
            let matches = find_matches(&board, 3);

            for run in &matches {
                prop_assert!(run.len() >= 3);
                let cells: Vec<Cell> = run.cells().collect();
                for (cell, id) in cells.iter().zip(&run.tiles) {
                    prop_assert!(board.contains(*cell));
                    prop_assert_eq!(board.id_at(*cell), Some(*id));
                    prop_assert_eq!(board.kind_at(*cell), Some(run.kind));
                }
                // maximal: the cells just before and after hold another kind
                let (before, after) = match run.axis {
                    Axis::Horizontal => (
                        run.start.col.checked_sub(1).map(|col| Cell::new(col, run.start.row)),
                        Some(Cell::new(run.start.col + run.len(), run.start.row)),
                    ),
                    Axis::Vertical => (
                        run.start.row.checked_sub(1).map(|row| Cell::new(run.start.col, row)),
                        Some(Cell::new(run.start.col, run.start.row + run.len())),
                    ),
                };
                for edge in [before, after].into_iter().flatten() {
                    prop_assert_ne!(board.kind_at(edge), Some(run.kind));
                }
            }
        }

        #[test]
        fn points_equal_the_sum_of_run_lengths((columns, rows, kinds) in arbitrary_board()) {
            let board = grid(columns, rows, &kinds);
            let matches = find_matches(&board, 3);
            let total: usize = matches.iter().map(MatchRun::len).sum();
            prop_assert_eq!(matches.points() as usize, total);
            prop_assert!(matches.unique_tiles().len() <= total);
        }
    }
}
