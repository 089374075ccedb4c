use core::fmt::{self, Display, Formatter};
use core::ops::{Add, Sub};

use strum::{EnumCount, EnumIter, FromRepr};

/// Stable identity of a tile, assigned once when the grid is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileId(u32);

impl TileId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Display for TileId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The fixed tile palette. Sessions play with a prefix of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumCount, EnumIter, FromRepr)]
#[repr(u8)]
pub enum TileKind {
    Red,
    Green,
    Blue,
    Yellow,
    Cyan,
    Purple,
}

impl TileKind {
    /// Palette entry at `index`, counting from zero.
    pub fn from_index(index: u8) -> Option<Self> {
        Self::from_repr(index)
    }

    /// One-based type id, as shown when ids are painted on tiles.
    pub const fn id(self) -> u8 {
        self as u8 + 1
    }

    pub const fn rgb(self) -> [u8; 3] {
        match self {
            Self::Red => [0xdc, 0x26, 0x26],
            Self::Green => [0x16, 0xa3, 0x4a],
            Self::Blue => [0x25, 0x63, 0xeb],
            Self::Yellow => [0xfa, 0xcc, 0x15],
            Self::Cyan => [0x67, 0xe8, 0xf9],
            Self::Purple => [0xc0, 0x84, 0xfc],
        }
    }
}

/// A position in board-local pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A tile as stored in the grid arena.
///
/// `position` is where the tile is drawn, `rest` is the top-left corner of the
/// cell it logically occupies. The two only differ while the tile is dragged.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub id: TileId,
    pub kind: TileKind,
    pub position: Point,
    pub rest: Point,
}

impl Tile {
    pub fn is_at_rest(&self) -> bool {
        self.position == self.rest
    }
}

/// Supplies kinds for freshly generated and retyped tiles.
pub trait TileSource {
    fn next_kind(&mut self) -> TileKind;
}

/// Uniformly random kinds from the first `palette` entries.
#[derive(Debug, Clone)]
pub struct RandomTiles {
    rng: fastrand::Rng,
    palette: u8,
}

impl RandomTiles {
    pub fn new(palette: u8) -> Self {
        Self::from_rng(fastrand::Rng::new(), palette)
    }

    pub fn with_seed(palette: u8, seed: u64) -> Self {
        Self::from_rng(fastrand::Rng::with_seed(seed), palette)
    }

    fn from_rng(rng: fastrand::Rng, palette: u8) -> Self {
        let palette = palette.clamp(1, TileKind::COUNT as u8);
        Self { rng, palette }
    }
}

impl TileSource for RandomTiles {
    fn next_kind(&mut self) -> TileKind {
        TileKind::from_index(self.rng.u8(..self.palette)).unwrap_or(TileKind::Red)
    }
}

/// Hands out a fixed sequence of kinds, starting over when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedTiles {
    kinds: Vec<TileKind>,
    cursor: usize,
}

impl ScriptedTiles {
    /// An empty script yields `TileKind::Red` forever.
    pub fn new(kinds: impl IntoIterator<Item = TileKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
            cursor: 0,
        }
    }
}

impl TileSource for ScriptedTiles {
    fn next_kind(&mut self) -> TileKind {
        let kind = self
            .kinds
            .get(self.cursor % self.kinds.len().max(1))
            .copied()
            .unwrap_or(TileKind::Red);
        self.cursor = self.cursor.wrapping_add(1);
        kind
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn type_ids_are_one_based_and_follow_palette_order() {
        let ids: Vec<u8> = TileKind::iter().map(TileKind::id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(TileKind::from_index(5), Some(TileKind::Purple));
        assert_eq!(TileKind::from_index(6), None);
    }

    #[test]
    fn random_tiles_stay_inside_the_palette() {
        let mut tiles = RandomTiles::with_seed(3, 7);
        for _ in 0..500 {
            assert!(tiles.next_kind().id() <= 3);
        }
    }

    #[test]
    fn seeded_random_tiles_are_reproducible() {
        let mut a = RandomTiles::with_seed(6, 42);
        let mut b = RandomTiles::with_seed(6, 42);
        let a: Vec<_> = (0..32).map(|_| a.next_kind()).collect();
        let b: Vec<_> = (0..32).map(|_| b.next_kind()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn scripted_tiles_cycle() {
        let mut tiles = ScriptedTiles::new([TileKind::Blue, TileKind::Cyan]);
        let drawn: Vec<_> = (0..5).map(|_| tiles.next_kind()).collect();
        assert_eq!(
            drawn,
            vec![
                TileKind::Blue,
                TileKind::Cyan,
                TileKind::Blue,
                TileKind::Cyan,
                TileKind::Blue
            ]
        );

        let mut empty = ScriptedTiles::new([]);
        assert_eq!(empty.next_kind(), TileKind::Red);
    }

    #[test]
    fn points_subtract_componentwise() {
        let offset = Point::new(30.0, 12.0) - Point::new(24.0, 0.0);
        assert_eq!(offset, Point::new(6.0, 12.0));
        assert_eq!(offset + Point::new(24.0, 0.0), Point::new(30.0, 12.0));
    }
}
