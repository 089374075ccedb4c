use core::fmt::{self, Display, Formatter};

use strum::EnumIter;

use crate::error::GridError;
use crate::tile::{Point, Tile, TileId, TileKind, TileSource};

/// A grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
    pub col: usize,
    pub row: usize,
}

impl Cell {
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Column and row step. Rows grow downwards.
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::Up => (0, -1),
            Self::Down => (0, 1),
        }
    }
}

/// Fixed-size board of tiles.
///
/// Tiles live in an arena indexed by id; `cells` maps every cell (row-major)
/// to the id of its occupant. Each id appears in exactly one cell and the
/// tile's rest position is always the origin of that cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    columns: usize,
    rows: usize,
    tile_size: f32,
    cells: Vec<TileId>,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Fills a fresh board, numbering tiles from 1 in row-major order.
    pub fn generate(
        columns: usize,
        rows: usize,
        tile_size: f32,
        source: &mut impl TileSource,
    ) -> Self {
        let kinds: Vec<TileKind> = (0..columns * rows).map(|_| source.next_kind()).collect();
        Self::build(columns, rows, tile_size, kinds)
    }

    /// Builds a board from explicit kinds listed in row-major order.
    pub fn from_kinds(
        columns: usize,
        rows: usize,
        tile_size: f32,
        kinds: &[TileKind],
    ) -> Result<Self, GridError> {
        if kinds.len() != columns * rows {
            return Err(GridError::ShapeMismatch {
                expected: columns * rows,
                actual: kinds.len(),
            });
        }
        Ok(Self::build(columns, rows, tile_size, kinds.to_vec()))
    }

    fn build(columns: usize, rows: usize, tile_size: f32, kinds: Vec<TileKind>) -> Self {
        let mut cells = Vec::with_capacity(kinds.len());
        let mut tiles = Vec::with_capacity(kinds.len());
        let coordinates = (0..rows).flat_map(|row| (0..columns).map(move |col| Cell::new(col, row)));

        for (count, (cell, kind)) in coordinates.zip(kinds).enumerate() {
            let id = TileId::new(count as u32 + 1);
            let rest = Self::origin_for(cell, tile_size);
            cells.push(id);
            tiles.push(Tile {
                id,
                kind,
                position: rest,
                rest,
            });
        }

        Self {
            columns,
            rows,
            tile_size,
            cells,
            tiles,
        }
    }

    pub const fn columns(&self) -> usize {
        self.columns
    }

    pub const fn rows(&self) -> usize {
        self.rows
    }

    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub const fn contains(&self, cell: Cell) -> bool {
        cell.col < self.columns && cell.row < self.rows
    }

    const fn index(&self, cell: Cell) -> Option<usize> {
        if self.contains(cell) {
            Some(cell.row * self.columns + cell.col)
        } else {
            None
        }
    }

    fn slot(id: TileId) -> Option<usize> {
        (id.get() as usize).checked_sub(1)
    }

    fn origin_for(cell: Cell, tile_size: f32) -> Point {
        Point::new(cell.col as f32 * tile_size, cell.row as f32 * tile_size)
    }

    /// Top-left corner of `cell` in board pixels.
    pub fn origin(&self, cell: Cell) -> Point {
        Self::origin_for(cell, self.tile_size)
    }

    fn out_of_bounds(&self, cell: Cell) -> GridError {
        GridError::OutOfBounds {
            cell,
            columns: self.columns,
            rows: self.rows,
        }
    }

    pub fn id_at(&self, cell: Cell) -> Option<TileId> {
        self.index(cell)
            .and_then(|index| self.cells.get(index))
            .copied()
    }

    pub fn get(&self, cell: Cell) -> Option<&Tile> {
        self.id_at(cell).and_then(|id| self.tile(id))
    }

    pub fn kind_at(&self, cell: Cell) -> Option<TileKind> {
        self.get(cell).map(|tile| tile.kind)
    }

    /// Replaces the kind of the tile occupying `cell`, keeping its identity.
    pub fn set(&mut self, cell: Cell, kind: TileKind) -> Result<TileId, GridError> {
        let id = self.id_at(cell).ok_or_else(|| self.out_of_bounds(cell))?;
        self.retype(id, kind)?;
        Ok(id)
    }

    /// Gives tile `id` a new kind without moving it.
    pub fn retype(&mut self, id: TileId, kind: TileKind) -> Result<(), GridError> {
        let tile = self.tile_mut(id).ok_or(GridError::UnknownTile(id))?;
        tile.kind = kind;
        Ok(())
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        Self::slot(id).and_then(|slot| self.tiles.get(slot))
    }

    fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        Self::slot(id).and_then(|slot| self.tiles.get_mut(slot))
    }

    /// The cell a tile is resting in.
    pub fn cell_of(&self, id: TileId) -> Option<Cell> {
        let tile = self.tile(id)?;
        let cell = Cell::new(
            (tile.rest.x / self.tile_size).round() as usize,
            (tile.rest.y / self.tile_size).round() as usize,
        );
        (self.id_at(cell) == Some(id)).then_some(cell)
    }

    /// Exchanges the occupants of two cells, moving both their rest and
    /// display positions. Identities travel with the tiles.
    pub fn swap(&mut self, a: Cell, b: Cell) -> Result<(), GridError> {
        let index_a = self.index(a).ok_or_else(|| self.out_of_bounds(a))?;
        let index_b = self.index(b).ok_or_else(|| self.out_of_bounds(b))?;
        let id_a = self.id_at(a).ok_or_else(|| self.out_of_bounds(a))?;
        let id_b = self.id_at(b).ok_or_else(|| self.out_of_bounds(b))?;

        self.cells.swap(index_a, index_b);

        let origin_a = self.origin(a);
        let origin_b = self.origin(b);
        let tile_a = self.tile_mut(id_a).ok_or(GridError::UnknownTile(id_a))?;
        tile_a.rest = origin_b;
        tile_a.position = origin_b;
        let tile_b = self.tile_mut(id_b).ok_or(GridError::UnknownTile(id_b))?;
        tile_b.rest = origin_a;
        tile_b.position = origin_a;
        Ok(())
    }

    /// Moves a tile's display position without changing where it rests.
    pub fn move_tile(&mut self, id: TileId, position: Point) -> Result<(), GridError> {
        let tile = self.tile_mut(id).ok_or(GridError::UnknownTile(id))?;
        tile.position = position;
        Ok(())
    }

    /// Snaps a tile back onto its rest position.
    pub fn settle(&mut self, id: TileId) -> Result<(), GridError> {
        let tile = self.tile_mut(id).ok_or(GridError::UnknownTile(id))?;
        tile.position = tile.rest;
        Ok(())
    }

    pub fn neighbour(&self, cell: Cell, direction: Direction) -> Option<Cell> {
        let (dc, dr) = direction.delta();
        let neighbour = Cell::new(
            cell.col.checked_add_signed(dc)?,
            cell.row.checked_add_signed(dr)?,
        );
        self.contains(neighbour).then_some(neighbour)
    }

    /// Every cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + use<> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |row| (0..columns).map(move |col| Cell::new(col, row)))
    }

    pub fn row_cells(&self, row: usize) -> impl Iterator<Item = Cell> + use<> {
        (0..self.columns).map(move |col| Cell::new(col, row))
    }

    pub fn column_cells(&self, col: usize) -> impl Iterator<Item = Cell> + use<> {
        (0..self.rows).map(move |row| Cell::new(col, row))
    }

    /// Tiles in row-major cell order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.cells.iter().filter_map(|id| self.tile(*id))
    }

    /// The tile whose drawn square strictly contains `point`.
    pub fn tile_at_point(&self, point: Point) -> Option<&Tile> {
        let size = self.tile_size;
        self.tiles.iter().find(|tile| {
            tile.position.x < point.x
                && tile.position.x + size > point.x
                && tile.position.y < point.y
                && tile.position.y + size > point.y
        })
    }

    /// Whether `point` lies within `cell`'s square, edges included.
    pub fn cell_contains(&self, cell: Cell, point: Point) -> bool {
        let origin = self.origin(cell);
        point.x >= origin.x
            && point.x <= origin.x + self.tile_size
            && point.y >= origin.y
            && point.y <= origin.y + self.tile_size
    }

    /// Confirms every id sits in exactly one cell and rests on that cell.
    pub fn is_consistent(&self) -> bool {
        self.cells().all(|cell| {
            self.get(cell)
                .is_some_and(|tile| tile.rest == self.origin(cell) && self.cell_of(tile.id) == Some(cell))
        }) && self.tiles.len() == self.cells.len()
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            let line: Vec<String> = self
                .row_cells(row)
                .map(|cell| {
                    self.kind_at(cell)
                        .map_or_else(|| ".".to_owned(), |kind| kind.id().to_string())
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::ScriptedTiles;

    fn striped(columns: usize, rows: usize) -> Grid {
        let mut source = ScriptedTiles::new([TileKind::Red, TileKind::Green, TileKind::Blue]);
        Grid::generate(columns, rows, 48.0, &mut source)
    }

    #[test]
    fn generation_numbers_tiles_row_major() {
        let grid = striped(4, 3);
        assert_eq!(grid.len(), 12);
        assert_eq!(grid.id_at(Cell::new(0, 0)), Some(TileId::new(1)));
        assert_eq!(grid.id_at(Cell::new(3, 0)), Some(TileId::new(4)));
        assert_eq!(grid.id_at(Cell::new(0, 1)), Some(TileId::new(5)));
        assert_eq!(grid.id_at(Cell::new(3, 2)), Some(TileId::new(12)));
        assert!(grid.is_consistent());
    }

    #[test]
    fn rest_positions_are_cell_origins() {
        let grid = striped(4, 3);
        let tile = grid.get(Cell::new(2, 1)).expect("cell is on the board");
        assert_eq!(tile.rest, Point::new(96.0, 48.0));
        assert!(tile.is_at_rest());
    }

    #[test]
    fn cells_enumerate_row_major() {
        let grid = striped(3, 2);
        let cells: Vec<_> = grid.cells().collect();
        assert_eq!(
            cells,
            vec![
                Cell::new(0, 0),
                Cell::new(1, 0),
                Cell::new(2, 0),
                Cell::new(0, 1),
                Cell::new(1, 1),
                Cell::new(2, 1),
            ]
        );
    }

    #[test]
    fn swapping_exchanges_rest_positions_and_keeps_ids() {
        let mut grid = striped(12, 8);
        let left = grid.get(Cell::new(0, 0)).cloned().expect("origin tile");
        let right = grid.get(Cell::new(1, 0)).cloned().expect("right neighbour");

        grid.swap(Cell::new(0, 0), Cell::new(1, 0))
            .expect("both cells are in bounds");

        let moved_left = grid.tile(left.id).expect("tile keeps its id");
        let moved_right = grid.tile(right.id).expect("tile keeps its id");
        assert_eq!(moved_left.rest, right.rest);
        assert_eq!(moved_left.position, right.rest);
        assert_eq!(moved_right.rest, left.rest);
        assert_eq!(moved_right.position, left.rest);
        assert_eq!(moved_left.kind, left.kind);
        assert_eq!(grid.id_at(Cell::new(0, 0)), Some(right.id));
        assert_eq!(grid.id_at(Cell::new(1, 0)), Some(left.id));
        assert_eq!(grid.cell_of(left.id), Some(Cell::new(1, 0)));
        assert!(grid.is_consistent());
    }

    #[test]
    fn swap_outside_the_board_is_rejected_untouched() {
        let mut grid = striped(4, 3);
        let before = grid.clone();
        let err = grid.swap(Cell::new(3, 0), Cell::new(4, 0));
        assert!(matches!(err, Err(GridError::OutOfBounds { .. })));
        assert_eq!(grid, before);
    }

    #[test]
    fn set_retypes_in_place() {
        let mut grid = striped(4, 3);
        let id = grid
            .set(Cell::new(1, 1), TileKind::Purple)
            .expect("cell is on the board");
        assert_eq!(id, TileId::new(6));
        assert_eq!(grid.kind_at(Cell::new(1, 1)), Some(TileKind::Purple));
        assert!(grid.set(Cell::new(9, 9), TileKind::Red).is_err());
    }

    #[test]
    fn from_kinds_checks_the_shape() {
        let err = Grid::from_kinds(3, 3, 48.0, &[TileKind::Red; 8]);
        assert_eq!(
            err,
            Err(GridError::ShapeMismatch {
                expected: 9,
                actual: 8
            })
        );
    }

    #[test]
    fn neighbours_stop_at_the_edges() {
        let grid = striped(4, 3);
        let corner = Cell::new(0, 0);
        assert_eq!(grid.neighbour(corner, Direction::Left), None);
        assert_eq!(grid.neighbour(corner, Direction::Up), None);
        assert_eq!(grid.neighbour(corner, Direction::Right), Some(Cell::new(1, 0)));
        assert_eq!(grid.neighbour(corner, Direction::Down), Some(Cell::new(0, 1)));
        assert_eq!(grid.neighbour(Cell::new(3, 2), Direction::Right), None);
        assert_eq!(grid.neighbour(Cell::new(3, 2), Direction::Down), None);
    }

    #[test]
    fn hit_testing_excludes_tile_borders() {
        let grid = striped(4, 3);
        let hit = grid.tile_at_point(Point::new(50.0, 10.0));
        assert_eq!(hit.map(|tile| tile.id), Some(TileId::new(2)));
        assert!(grid.tile_at_point(Point::new(48.0, 10.0)).is_none());
        assert!(grid.tile_at_point(Point::new(-1.0, 10.0)).is_none());
        assert!(grid.cell_contains(Cell::new(1, 0), Point::new(48.0, 48.0)));
    }

    #[test]
    fn dragging_moves_only_the_display_position() {
        let mut grid = striped(4, 3);
        let id = TileId::new(1);
        grid.move_tile(id, Point::new(20.0, 5.0)).expect("tile exists");
        let tile = grid.tile(id).expect("tile exists");
        assert_eq!(tile.rest, Point::ZERO);
        assert!(!tile.is_at_rest());
        assert_eq!(grid.cell_of(id), Some(Cell::new(0, 0)));

        grid.settle(id).expect("tile exists");
        assert!(grid.tile(id).is_some_and(Tile::is_at_rest));
        assert!(grid.move_tile(TileId::new(99), Point::ZERO).is_err());
    }

    #[test]
    fn display_prints_type_ids() {
        let grid = striped(3, 2);
        assert_eq!(grid.to_string(), "1 2 3\n1 2 3\n");
    }
}
