use crate::grid::{Cell, Direction, Grid};
use crate::tile::Point;

/// Why a drop did not turn into a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectedMove {
    /// The drag was too close to diagonal (or did not move) to pick an axis
    Ambiguous,
    /// The neighbour in the dragged direction is off the board
    OffGrid(Direction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Released back over the grabbed tile's own cell
    Cancelled,
    Rejected(RejectedMove),
    Swap {
        from: Cell,
        to: Cell,
        direction: Direction,
    },
}

/// Classifies a drag from `anchor` to `release`.
///
/// Drags whose horizontal and vertical extents differ by less than
/// `diagonal_threshold` are ambiguous. Otherwise the longer axis wins and its
/// sign picks the direction; `y` grows downwards.
pub fn swipe_direction(anchor: Point, release: Point, diagonal_threshold: f32) -> Option<Direction> {
    let dx = release.x - anchor.x;
    let dy = release.y - anchor.y;
    let (distance_x, distance_y) = (dx.abs(), dy.abs());

    if (distance_x - distance_y).abs() < diagonal_threshold {
        return None;
    }

    if distance_x > distance_y {
        if dx > 0.0 {
            Some(Direction::Right)
        } else {
            Some(Direction::Left)
        }
    } else if dy > 0.0 {
        Some(Direction::Down)
    } else if dy < 0.0 {
        Some(Direction::Up)
    } else {
        None
    }
}

/// Decides what releasing a tile grabbed in `origin` should do.
pub fn validate_drop(
    grid: &Grid,
    origin: Cell,
    anchor: Point,
    release: Point,
    diagonal_threshold: f32,
) -> DropOutcome {
    if grid.cell_contains(origin, release) {
        return DropOutcome::Cancelled;
    }

    let Some(direction) = swipe_direction(anchor, release, diagonal_threshold) else {
        return DropOutcome::Rejected(RejectedMove::Ambiguous);
    };

    match grid.neighbour(origin, direction) {
        Some(to) => DropOutcome::Swap {
            from: origin,
            to,
            direction,
        },
        None => DropOutcome::Rejected(RejectedMove::OffGrid(direction)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{ScriptedTiles, TileKind};

    const THRESHOLD: f32 = 10.0;

    fn board() -> Grid {
        let mut source = ScriptedTiles::new([TileKind::Red, TileKind::Blue]);
        Grid::generate(12, 8, 48.0, &mut source)
    }

    #[test]
    fn horizontal_drags() {
        let origin = Point::ZERO;
        assert_eq!(
            swipe_direction(origin, Point::new(20.0, 0.0), THRESHOLD),
            Some(Direction::Right)
        );
        assert_eq!(
            swipe_direction(origin, Point::new(-20.0, 3.0), THRESHOLD),
            Some(Direction::Left)
        );
    }

    #[test]
    fn vertical_drags_follow_screen_coordinates() {
        let origin = Point::ZERO;
        assert_eq!(
            swipe_direction(origin, Point::new(0.0, 20.0), THRESHOLD),
            Some(Direction::Down)
        );
        assert_eq!(
            swipe_direction(origin, Point::new(4.0, -30.0), THRESHOLD),
            Some(Direction::Up)
        );
    }

    #[test]
    fn near_diagonal_drags_are_ambiguous() {
        let origin = Point::ZERO;
        assert_eq!(swipe_direction(origin, Point::new(9.0, 9.0), THRESHOLD), None);
        assert_eq!(swipe_direction(origin, Point::new(25.0, 16.0), THRESHOLD), None);
        assert_eq!(
            swipe_direction(origin, Point::new(26.0, 16.0), THRESHOLD),
            Some(Direction::Right)
        );
    }

    #[test]
    fn a_motionless_drag_has_no_direction_even_without_threshold() {
        assert_eq!(swipe_direction(Point::ZERO, Point::ZERO, 0.0), None);
    }

    #[test]
    fn dropping_on_the_origin_cell_cancels() {
        let grid = board();
        let origin = Cell::new(2, 2);
        // grabbed near the left edge, released 40px right but still inside the cell
        let anchor = Point::new(100.0, 110.0);
        let release = Point::new(140.0, 110.0);
        assert_eq!(
            validate_drop(&grid, origin, anchor, release, THRESHOLD),
            DropOutcome::Cancelled
        );
    }

    #[test]
    fn a_clear_drag_swaps_with_the_neighbour() {
        let grid = board();
        let outcome = validate_drop(
            &grid,
            Cell::new(0, 0),
            Point::new(24.0, 24.0),
            Point::new(70.0, 26.0),
            THRESHOLD,
        );
        assert_eq!(
            outcome,
            DropOutcome::Swap {
                from: Cell::new(0, 0),
                to: Cell::new(1, 0),
                direction: Direction::Right
            }
        );
    }

    #[test]
    fn dragging_off_the_board_is_rejected() {
        let grid = board();
        let outcome = validate_drop(
            &grid,
            Cell::new(0, 3),
            Point::new(24.0, 168.0),
            Point::new(-30.0, 170.0),
            THRESHOLD,
        );
        assert_eq!(
            outcome,
            DropOutcome::Rejected(RejectedMove::OffGrid(Direction::Left))
        );
    }

    #[test]
    fn diagonal_drops_outside_the_origin_are_rejected() {
        let grid = board();
        let outcome = validate_drop(
            &grid,
            Cell::new(1, 1),
            Point::new(72.0, 72.0),
            Point::new(122.0, 122.0),
            THRESHOLD,
        );
        assert_eq!(outcome, DropOutcome::Rejected(RejectedMove::Ambiguous));
    }
}
