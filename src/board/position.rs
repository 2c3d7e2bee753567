//! Board geometry: positions, sides, half-edges, rotations.
//!
//! ## Coordinates
//!
//! `x` grows east, `y` grows south. The start tile sits at `Position::ORIGIN`.
//!
//! ## Edges
//!
//! Roads and cities connect across whole [`Side`]s. Farms connect across
//! [`HalfEdge`]s, because a road running through a side splits the field on
//! that side in two. Half-edges are numbered clockwise starting from the
//! western half of the north side.

use serde::{Deserialize, Serialize};

/// A cell on the (unbounded) board grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Where the start tile is placed.
    pub const ORIGIN: Position = Position { x: 0, y: 0 };

    /// Create a new position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The orthogonal neighbour across `side`.
    #[must_use]
    pub const fn neighbor(self, side: Side) -> Self {
        match side {
            Side::North => Self::new(self.x, self.y - 1),
            Side::East => Self::new(self.x + 1, self.y),
            Side::South => Self::new(self.x, self.y + 1),
            Side::West => Self::new(self.x - 1, self.y),
        }
    }

    /// The four orthogonal neighbours, in `Side::ALL` order.
    #[must_use]
    pub fn adjacent(self) -> [Position; 4] {
        Side::ALL.map(|side| self.neighbor(side))
    }

    /// The eight surrounding positions (orthogonal and diagonal).
    #[must_use]
    pub fn surrounding(self) -> [Position; 8] {
        [
            Self::new(self.x - 1, self.y - 1),
            Self::new(self.x, self.y - 1),
            Self::new(self.x + 1, self.y - 1),
            Self::new(self.x + 1, self.y),
            Self::new(self.x + 1, self.y + 1),
            Self::new(self.x, self.y + 1),
            Self::new(self.x - 1, self.y + 1),
            Self::new(self.x - 1, self.y),
        ]
    }

    /// Which quadrant `self` lies in, seen from `origin`.
    ///
    /// Positions sharing a row or column with `origin` lie in no quadrant.
    #[must_use]
    pub fn quadrant_from(self, origin: Position) -> Option<Quadrant> {
        let east = self.x > origin.x;
        let west = self.x < origin.x;
        let north = self.y < origin.y;
        let south = self.y > origin.y;

        match (north, east, south, west) {
            (true, true, _, _) => Some(Quadrant::NorthEast),
            (_, true, true, _) => Some(Quadrant::SouthEast),
            (_, _, true, true) => Some(Quadrant::SouthWest),
            (true, _, _, true) => Some(Quadrant::NorthWest),
            _ => None,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four sides of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    North,
    East,
    South,
    West,
}

impl Side {
    /// All sides, clockwise from north.
    pub const ALL: [Side; 4] = [Side::North, Side::East, Side::South, Side::West];

    /// Clockwise index (north = 0).
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    const fn from_index(index: u8) -> Self {
        match index % 4 {
            0 => Side::North,
            1 => Side::East,
            2 => Side::South,
            _ => Side::West,
        }
    }

    /// The side facing this one on the neighbouring tile.
    #[must_use]
    pub const fn opposite(self) -> Self {
        Self::from_index(self.index() + 2)
    }

    /// Turn this side clockwise by `rotation`.
    #[must_use]
    pub const fn rotate(self, rotation: Rotation) -> Self {
        Self::from_index(self.index() + rotation.quarters())
    }

    /// Undo a clockwise `rotation`.
    #[must_use]
    pub const fn unrotate(self, rotation: Rotation) -> Self {
        Self::from_index(self.index() + 4 - rotation.quarters())
    }

    /// The two half-edges of this side, in clockwise order.
    #[must_use]
    pub const fn halves(self) -> [HalfEdge; 2] {
        [
            HalfEdge::from_index(self.index() * 2),
            HalfEdge::from_index(self.index() * 2 + 1),
        ]
    }
}

/// Half of a tile side, used for farm connectivity.
///
/// Named `<side><end>`: `NorthWest` is the western half of the north side,
/// `EastNorth` the northern half of the east side, and so on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HalfEdge {
    NorthWest,
    NorthEast,
    EastNorth,
    EastSouth,
    SouthEast,
    SouthWest,
    WestSouth,
    WestNorth,
}

impl HalfEdge {
    /// All half-edges, clockwise from the western half of north.
    pub const ALL: [HalfEdge; 8] = [
        HalfEdge::NorthWest,
        HalfEdge::NorthEast,
        HalfEdge::EastNorth,
        HalfEdge::EastSouth,
        HalfEdge::SouthEast,
        HalfEdge::SouthWest,
        HalfEdge::WestSouth,
        HalfEdge::WestNorth,
    ];

    /// Clockwise index (`NorthWest` = 0).
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    const fn from_index(index: u8) -> Self {
        match index % 8 {
            0 => HalfEdge::NorthWest,
            1 => HalfEdge::NorthEast,
            2 => HalfEdge::EastNorth,
            3 => HalfEdge::EastSouth,
            4 => HalfEdge::SouthEast,
            5 => HalfEdge::SouthWest,
            6 => HalfEdge::WestSouth,
            _ => HalfEdge::WestNorth,
        }
    }

    /// The side this half-edge belongs to.
    #[must_use]
    pub const fn side(self) -> Side {
        Side::from_index(self.index() / 2)
    }

    /// The half-edge touching this one on the neighbouring tile.
    ///
    /// Crossing a side mirrors the clockwise order, so the first half of a
    /// side meets the second half of the opposite side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        let side = self.side().opposite().index();
        let half = 1 - self.index() % 2;
        Self::from_index(side * 2 + half)
    }

    /// Turn this half-edge clockwise by `rotation`.
    #[must_use]
    pub const fn rotate(self, rotation: Rotation) -> Self {
        Self::from_index(self.index() + rotation.quarters() * 2)
    }
}

/// Clockwise tile rotation in quarter turns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    /// All rotations.
    pub const ALL: [Rotation; 4] = [Rotation::R0, Rotation::R90, Rotation::R180, Rotation::R270];

    /// Number of clockwise quarter turns.
    #[must_use]
    pub const fn quarters(self) -> u8 {
        self as u8
    }

    /// The rotation that undoes this one.
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Rotation::R0 => Rotation::R0,
            Rotation::R90 => Rotation::R270,
            Rotation::R180 => Rotation::R180,
            Rotation::R270 => Rotation::R90,
        }
    }
}

/// A quarter of the plane around a reference position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Quadrant {
    NorthEast,
    SouthEast,
    SouthWest,
    NorthWest,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors() {
        let p = Position::new(2, 3);
        assert_eq!(p.neighbor(Side::North), Position::new(2, 2));
        assert_eq!(p.neighbor(Side::East), Position::new(3, 3));
        assert_eq!(p.neighbor(Side::South), Position::new(2, 4));
        assert_eq!(p.neighbor(Side::West), Position::new(1, 3));
        assert_eq!(p.surrounding().len(), 8);
        assert!(!p.surrounding().contains(&p));
    }

    #[test]
    fn test_side_rotation() {
        assert_eq!(Side::North.rotate(Rotation::R90), Side::East);
        assert_eq!(Side::West.rotate(Rotation::R90), Side::North);
        assert_eq!(Side::East.rotate(Rotation::R270), Side::North);
        for side in Side::ALL {
            for rotation in Rotation::ALL {
                assert_eq!(side.rotate(rotation).unrotate(rotation), side);
            }
            assert_eq!(side.opposite().opposite(), side);
        }
    }

    #[test]
    fn test_half_edge_opposite() {
        assert_eq!(HalfEdge::NorthWest.opposite(), HalfEdge::SouthWest);
        assert_eq!(HalfEdge::NorthEast.opposite(), HalfEdge::SouthEast);
        assert_eq!(HalfEdge::EastNorth.opposite(), HalfEdge::WestNorth);
        assert_eq!(HalfEdge::EastSouth.opposite(), HalfEdge::WestSouth);
        for half in HalfEdge::ALL {
            assert_eq!(half.opposite().opposite(), half);
            assert_eq!(half.opposite().side(), half.side().opposite());
        }
    }

    #[test]
    fn test_half_edge_rotation() {
        assert_eq!(HalfEdge::NorthWest.rotate(Rotation::R90), HalfEdge::EastNorth);
        assert_eq!(HalfEdge::WestNorth.rotate(Rotation::R90), HalfEdge::NorthEast);
        assert_eq!(HalfEdge::SouthWest.rotate(Rotation::R180), HalfEdge::NorthEast);
        assert_eq!(Side::East.halves(), [HalfEdge::EastNorth, HalfEdge::EastSouth]);
    }

    #[test]
    fn test_quadrant() {
        let origin = Position::new(0, 0);
        assert_eq!(Position::new(2, -1).quadrant_from(origin), Some(Quadrant::NorthEast));
        assert_eq!(Position::new(1, 1).quadrant_from(origin), Some(Quadrant::SouthEast));
        assert_eq!(Position::new(-3, 2).quadrant_from(origin), Some(Quadrant::SouthWest));
        assert_eq!(Position::new(-1, -1).quadrant_from(origin), Some(Quadrant::NorthWest));
        assert_eq!(Position::new(0, 5).quadrant_from(origin), None);
        assert_eq!(Position::new(4, 0).quadrant_from(origin), None);
    }
}
