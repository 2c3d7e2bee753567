//! Tile catalog.
//!
//! Every tile printed in the base set and in the supported expansions is a
//! [`TileKind`]. Its [`TileDef`] lists the feature segments drawn on it, in
//! the tile's unrotated orientation. Segment indices are stable and are what
//! followers are deployed on.
//!
//! ## Segment conventions
//!
//! - Roads and cities list the [`Side`]s they reach.
//! - Farms list the [`HalfEdge`]s they reach, plus the indices of the city
//!   segments on the same tile they border (used for farm scoring).
//! - A side is a road side if a road segment reaches it, a city side if a city
//!   segment does, and a field side otherwise. Both halves of every field and
//!   road side belong to some farm segment.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::feature::FeatureKind;
use super::position::{HalfEdge, Position, Quadrant, Rotation, Side};

use HalfEdge::*;
use Side::{East as E, North as N, South as S, West as W};

/// What runs along a tile side. Neighbouring sides must match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Field,
    Road,
    City,
}

/// Trade goods symbol printed in a city.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Goods {
    Wine,
    Grain,
    Cloth,
}

impl Goods {
    pub const ALL: [Goods; 3] = [Goods::Wine, Goods::Grain, Goods::Cloth];
}

/// Wind rose symbol printed on a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rose {
    /// The large rose; quadrants are measured from this tile.
    Origin,
    /// A small rose pointing into one quadrant.
    Pointer(Quadrant),
}

/// One feature fragment printed on a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentDef {
    pub kind: FeatureKind,
    pub sides: &'static [Side],
    pub halves: &'static [HalfEdge],
    pub adjoining_cities: &'static [u8],
    pub pennant: bool,
    pub inn: bool,
    pub cathedral: bool,
    pub goods: Option<Goods>,
}

impl SegmentDef {
    const fn new(kind: FeatureKind) -> Self {
        Self {
            kind,
            sides: &[],
            halves: &[],
            adjoining_cities: &[],
            pennant: false,
            inn: false,
            cathedral: false,
            goods: None,
        }
    }

    const fn road(sides: &'static [Side]) -> Self {
        Self { sides, ..Self::new(FeatureKind::Road) }
    }

    const fn city(sides: &'static [Side]) -> Self {
        Self { sides, ..Self::new(FeatureKind::City) }
    }

    const fn farm(halves: &'static [HalfEdge], adjoining_cities: &'static [u8]) -> Self {
        Self { halves, adjoining_cities, ..Self::new(FeatureKind::Farm) }
    }

    const fn cloister() -> Self {
        Self::new(FeatureKind::Cloister)
    }

    const fn pennant(self) -> Self {
        Self { pennant: true, ..self }
    }

    const fn inn(self) -> Self {
        Self { inn: true, ..self }
    }

    const fn cathedral(self) -> Self {
        Self { cathedral: true, ..self }
    }

    const fn goods(self, goods: Goods) -> Self {
        Self { goods: Some(goods), ..self }
    }

    /// Does this segment reach `side` (unrotated)?
    #[must_use]
    pub fn reaches_side(&self, side: Side) -> bool {
        self.sides.contains(&side)
    }

    /// Does this segment reach `half` (unrotated)?
    #[must_use]
    pub fn reaches_half(&self, half: HalfEdge) -> bool {
        self.halves.contains(&half)
    }
}

/// Static description of a tile.
#[derive(Debug, PartialEq, Eq)]
pub struct TileDef {
    pub kind: TileKind,
    pub segments: &'static [SegmentDef],
    pub rose: Option<Rose>,
}

impl TileDef {
    /// Terrain along `side` in the unrotated orientation.
    #[must_use]
    pub fn terrain(&self, side: Side) -> Terrain {
        for segment in self.segments {
            if segment.reaches_side(side) {
                match segment.kind {
                    FeatureKind::City => return Terrain::City,
                    FeatureKind::Road => return Terrain::Road,
                    FeatureKind::Farm | FeatureKind::Cloister => {}
                }
            }
        }
        Terrain::Field
    }

    /// Does any segment carry a cathedral?
    #[must_use]
    pub fn has_cathedral(&self) -> bool {
        self.segments.iter().any(|s| s.cathedral)
    }
}

const FARM_ALL: &[HalfEdge] = &HalfEdge::ALL;

/// Every tile kind known to the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TileKind {
    // Base set
    Cloister,
    CloisterRoad,
    CityFull,
    CityCap,
    CityCapStraightRoad,
    CityCorner,
    CityCornerPennant,
    CityTube,
    CityTubePennant,
    CityCapsOpposite,
    CityCapsAdjacent,
    CityThreeSides,
    CityThreeSidesPennant,
    CityThreeSidesRoad,
    CityCornerRoad,
    CityCapCurveWest,
    CityCapCurveEast,
    CityCapCrossroad,
    StraightRoad,
    CurveRoad,
    Crossroad3,
    Crossroad4,
    // Inns & cathedrals
    CityCathedral,
    StraightRoadInn,
    CurveRoadInn,
    // Trade goods
    CityCapWine,
    CityTubeGrain,
    CityCornerCloth,
    CityThreeSidesWine,
    // Wind roses
    CrossroadRoseOrigin,
    CityCapRoseNorthEast,
    CurveRoadRoseSouthEast,
    StraightRoadRoseSouthWest,
    CityCornerRoseNorthWest,
}

macro_rules! tile {
    ($kind:ident, [$($segment:expr),* $(,)?]) => {
        tile!($kind, [$($segment),*], None)
    };
    ($kind:ident, [$($segment:expr),* $(,)?], $rose:expr) => {
        TileDef {
            kind: TileKind::$kind,
            segments: &[$($segment),*],
            rose: $rose,
        }
    };
}

static CLOISTER: TileDef = tile!(Cloister, [SegmentDef::cloister(), SegmentDef::farm(FARM_ALL, &[])]);
static CLOISTER_ROAD: TileDef = tile!(
    CloisterRoad,
    [SegmentDef::cloister(), SegmentDef::road(&[S]), SegmentDef::farm(FARM_ALL, &[])]
);
static CITY_FULL: TileDef = tile!(CityFull, [SegmentDef::city(&[N, E, S, W]).pennant()]);
static CITY_CAP: TileDef = tile!(
    CityCap,
    [
        SegmentDef::city(&[N]),
        SegmentDef::farm(&[EastNorth, EastSouth, SouthEast, SouthWest, WestSouth, WestNorth], &[0]),
    ]
);
static CITY_CAP_STRAIGHT_ROAD: TileDef = tile!(
    CityCapStraightRoad,
    [
        SegmentDef::city(&[N]),
        SegmentDef::road(&[E, W]),
        SegmentDef::farm(&[EastNorth, WestNorth], &[0]),
        SegmentDef::farm(&[EastSouth, SouthEast, SouthWest, WestSouth], &[]),
    ]
);
static CITY_CORNER: TileDef = tile!(
    CityCorner,
    [
        SegmentDef::city(&[N, W]),
        SegmentDef::farm(&[EastNorth, EastSouth, SouthEast, SouthWest], &[0]),
    ]
);
static CITY_CORNER_PENNANT: TileDef = tile!(
    CityCornerPennant,
    [
        SegmentDef::city(&[N, W]).pennant(),
        SegmentDef::farm(&[EastNorth, EastSouth, SouthEast, SouthWest], &[0]),
    ]
);
static CITY_TUBE: TileDef = tile!(
    CityTube,
    [
        SegmentDef::city(&[E, W]),
        SegmentDef::farm(&[NorthWest, NorthEast], &[0]),
        SegmentDef::farm(&[SouthEast, SouthWest], &[0]),
    ]
);
static CITY_TUBE_PENNANT: TileDef = tile!(
    CityTubePennant,
    [
        SegmentDef::city(&[E, W]).pennant(),
        SegmentDef::farm(&[NorthWest, NorthEast], &[0]),
        SegmentDef::farm(&[SouthEast, SouthWest], &[0]),
    ]
);
static CITY_CAPS_OPPOSITE: TileDef = tile!(
    CityCapsOpposite,
    [
        SegmentDef::city(&[N]),
        SegmentDef::city(&[S]),
        SegmentDef::farm(&[EastNorth, EastSouth, WestSouth, WestNorth], &[0, 1]),
    ]
);
static CITY_CAPS_ADJACENT: TileDef = tile!(
    CityCapsAdjacent,
    [
        SegmentDef::city(&[N]),
        SegmentDef::city(&[W]),
        SegmentDef::farm(&[EastNorth, EastSouth, SouthEast, SouthWest], &[0, 1]),
    ]
);
static CITY_THREE_SIDES: TileDef = tile!(
    CityThreeSides,
    [SegmentDef::city(&[N, E, W]), SegmentDef::farm(&[SouthEast, SouthWest], &[0])]
);
static CITY_THREE_SIDES_PENNANT: TileDef = tile!(
    CityThreeSidesPennant,
    [SegmentDef::city(&[N, E, W]).pennant(), SegmentDef::farm(&[SouthEast, SouthWest], &[0])]
);
static CITY_THREE_SIDES_ROAD: TileDef = tile!(
    CityThreeSidesRoad,
    [
        SegmentDef::city(&[N, E, W]),
        SegmentDef::road(&[S]),
        SegmentDef::farm(&[SouthEast], &[0]),
        SegmentDef::farm(&[SouthWest], &[0]),
    ]
);
static CITY_CORNER_ROAD: TileDef = tile!(
    CityCornerRoad,
    [
        SegmentDef::city(&[N, W]),
        SegmentDef::road(&[E, S]),
        SegmentDef::farm(&[EastSouth, SouthEast], &[]),
        SegmentDef::farm(&[EastNorth, SouthWest], &[0]),
    ]
);
static CITY_CAP_CURVE_WEST: TileDef = tile!(
    CityCapCurveWest,
    [
        SegmentDef::city(&[N]),
        SegmentDef::road(&[S, W]),
        SegmentDef::farm(&[SouthWest, WestSouth], &[]),
        SegmentDef::farm(&[EastNorth, EastSouth, SouthEast, WestNorth], &[0]),
    ]
);
static CITY_CAP_CURVE_EAST: TileDef = tile!(
    CityCapCurveEast,
    [
        SegmentDef::city(&[N]),
        SegmentDef::road(&[E, S]),
        SegmentDef::farm(&[EastSouth, SouthEast], &[]),
        SegmentDef::farm(&[EastNorth, SouthWest, WestSouth, WestNorth], &[0]),
    ]
);
static CITY_CAP_CROSSROAD: TileDef = tile!(
    CityCapCrossroad,
    [
        SegmentDef::city(&[N]),
        SegmentDef::road(&[E]),
        SegmentDef::road(&[S]),
        SegmentDef::road(&[W]),
        SegmentDef::farm(&[EastNorth, WestNorth], &[0]),
        SegmentDef::farm(&[EastSouth, SouthEast], &[]),
        SegmentDef::farm(&[SouthWest, WestSouth], &[]),
    ]
);
static STRAIGHT_ROAD: TileDef = tile!(
    StraightRoad,
    [
        SegmentDef::road(&[N, S]),
        SegmentDef::farm(&[SouthWest, WestSouth, WestNorth, NorthWest], &[]),
        SegmentDef::farm(&[NorthEast, EastNorth, EastSouth, SouthEast], &[]),
    ]
);
static CURVE_ROAD: TileDef = tile!(
    CurveRoad,
    [
        SegmentDef::road(&[S, W]),
        SegmentDef::farm(&[SouthWest, WestSouth], &[]),
        SegmentDef::farm(&[WestNorth, NorthWest, NorthEast, EastNorth, EastSouth, SouthEast], &[]),
    ]
);
static CROSSROAD_3: TileDef = tile!(
    Crossroad3,
    [
        SegmentDef::road(&[E]),
        SegmentDef::road(&[S]),
        SegmentDef::road(&[W]),
        SegmentDef::farm(&[WestNorth, NorthWest, NorthEast, EastNorth], &[]),
        SegmentDef::farm(&[EastSouth, SouthEast], &[]),
        SegmentDef::farm(&[SouthWest, WestSouth], &[]),
    ]
);
static CROSSROAD_4: TileDef = tile!(
    Crossroad4,
    [
        SegmentDef::road(&[N]),
        SegmentDef::road(&[E]),
        SegmentDef::road(&[S]),
        SegmentDef::road(&[W]),
        SegmentDef::farm(&[NorthEast, EastNorth], &[]),
        SegmentDef::farm(&[EastSouth, SouthEast], &[]),
        SegmentDef::farm(&[SouthWest, WestSouth], &[]),
        SegmentDef::farm(&[WestNorth, NorthWest], &[]),
    ]
);
static CITY_CATHEDRAL: TileDef = tile!(CityCathedral, [SegmentDef::city(&[N, E, S, W]).cathedral()]);
static STRAIGHT_ROAD_INN: TileDef = tile!(
    StraightRoadInn,
    [
        SegmentDef::road(&[N, S]).inn(),
        SegmentDef::farm(&[SouthWest, WestSouth, WestNorth, NorthWest], &[]),
        SegmentDef::farm(&[NorthEast, EastNorth, EastSouth, SouthEast], &[]),
    ]
);
static CURVE_ROAD_INN: TileDef = tile!(
    CurveRoadInn,
    [
        SegmentDef::road(&[S, W]).inn(),
        SegmentDef::farm(&[SouthWest, WestSouth], &[]),
        SegmentDef::farm(&[WestNorth, NorthWest, NorthEast, EastNorth, EastSouth, SouthEast], &[]),
    ]
);
static CITY_CAP_WINE: TileDef = tile!(
    CityCapWine,
    [
        SegmentDef::city(&[N]).goods(Goods::Wine),
        SegmentDef::farm(&[EastNorth, EastSouth, SouthEast, SouthWest, WestSouth, WestNorth], &[0]),
    ]
);
static CITY_TUBE_GRAIN: TileDef = tile!(
    CityTubeGrain,
    [
        SegmentDef::city(&[E, W]).goods(Goods::Grain),
        SegmentDef::farm(&[NorthWest, NorthEast], &[0]),
        SegmentDef::farm(&[SouthEast, SouthWest], &[0]),
    ]
);
static CITY_CORNER_CLOTH: TileDef = tile!(
    CityCornerCloth,
    [
        SegmentDef::city(&[N, W]).goods(Goods::Cloth),
        SegmentDef::farm(&[EastNorth, EastSouth, SouthEast, SouthWest], &[0]),
    ]
);
static CITY_THREE_SIDES_WINE: TileDef = tile!(
    CityThreeSidesWine,
    [SegmentDef::city(&[N, E, W]).goods(Goods::Wine), SegmentDef::farm(&[SouthEast, SouthWest], &[0])]
);
static CROSSROAD_ROSE_ORIGIN: TileDef = tile!(
    CrossroadRoseOrigin,
    [
        SegmentDef::road(&[N]),
        SegmentDef::road(&[E]),
        SegmentDef::road(&[S]),
        SegmentDef::road(&[W]),
        SegmentDef::farm(&[NorthEast, EastNorth], &[]),
        SegmentDef::farm(&[EastSouth, SouthEast], &[]),
        SegmentDef::farm(&[SouthWest, WestSouth], &[]),
        SegmentDef::farm(&[WestNorth, NorthWest], &[]),
    ],
    Some(Rose::Origin)
);
static CITY_CAP_ROSE_NORTH_EAST: TileDef = tile!(
    CityCapRoseNorthEast,
    [
        SegmentDef::city(&[N]),
        SegmentDef::farm(&[EastNorth, EastSouth, SouthEast, SouthWest, WestSouth, WestNorth], &[0]),
    ],
    Some(Rose::Pointer(Quadrant::NorthEast))
);
static CURVE_ROAD_ROSE_SOUTH_EAST: TileDef = tile!(
    CurveRoadRoseSouthEast,
    [
        SegmentDef::road(&[S, W]),
        SegmentDef::farm(&[SouthWest, WestSouth], &[]),
        SegmentDef::farm(&[WestNorth, NorthWest, NorthEast, EastNorth, EastSouth, SouthEast], &[]),
    ],
    Some(Rose::Pointer(Quadrant::SouthEast))
);
static STRAIGHT_ROAD_ROSE_SOUTH_WEST: TileDef = tile!(
    StraightRoadRoseSouthWest,
    [
        SegmentDef::road(&[N, S]),
        SegmentDef::farm(&[SouthWest, WestSouth, WestNorth, NorthWest], &[]),
        SegmentDef::farm(&[NorthEast, EastNorth, EastSouth, SouthEast], &[]),
    ],
    Some(Rose::Pointer(Quadrant::SouthWest))
);
static CITY_CORNER_ROSE_NORTH_WEST: TileDef = tile!(
    CityCornerRoseNorthWest,
    [
        SegmentDef::city(&[N, W]),
        SegmentDef::farm(&[EastNorth, EastSouth, SouthEast, SouthWest], &[0]),
    ],
    Some(Rose::Pointer(Quadrant::NorthWest))
);

impl TileKind {
    /// The printed layout of this tile.
    #[must_use]
    pub fn definition(self) -> &'static TileDef {
        match self {
            TileKind::Cloister => &CLOISTER,
            TileKind::CloisterRoad => &CLOISTER_ROAD,
            TileKind::CityFull => &CITY_FULL,
            TileKind::CityCap => &CITY_CAP,
            TileKind::CityCapStraightRoad => &CITY_CAP_STRAIGHT_ROAD,
            TileKind::CityCorner => &CITY_CORNER,
            TileKind::CityCornerPennant => &CITY_CORNER_PENNANT,
            TileKind::CityTube => &CITY_TUBE,
            TileKind::CityTubePennant => &CITY_TUBE_PENNANT,
            TileKind::CityCapsOpposite => &CITY_CAPS_OPPOSITE,
            TileKind::CityCapsAdjacent => &CITY_CAPS_ADJACENT,
            TileKind::CityThreeSides => &CITY_THREE_SIDES,
            TileKind::CityThreeSidesPennant => &CITY_THREE_SIDES_PENNANT,
            TileKind::CityThreeSidesRoad => &CITY_THREE_SIDES_ROAD,
            TileKind::CityCornerRoad => &CITY_CORNER_ROAD,
            TileKind::CityCapCurveWest => &CITY_CAP_CURVE_WEST,
            TileKind::CityCapCurveEast => &CITY_CAP_CURVE_EAST,
            TileKind::CityCapCrossroad => &CITY_CAP_CROSSROAD,
            TileKind::StraightRoad => &STRAIGHT_ROAD,
            TileKind::CurveRoad => &CURVE_ROAD,
            TileKind::Crossroad3 => &CROSSROAD_3,
            TileKind::Crossroad4 => &CROSSROAD_4,
            TileKind::CityCathedral => &CITY_CATHEDRAL,
            TileKind::StraightRoadInn => &STRAIGHT_ROAD_INN,
            TileKind::CurveRoadInn => &CURVE_ROAD_INN,
            TileKind::CityCapWine => &CITY_CAP_WINE,
            TileKind::CityTubeGrain => &CITY_TUBE_GRAIN,
            TileKind::CityCornerCloth => &CITY_CORNER_CLOTH,
            TileKind::CityThreeSidesWine => &CITY_THREE_SIDES_WINE,
            TileKind::CrossroadRoseOrigin => &CROSSROAD_ROSE_ORIGIN,
            TileKind::CityCapRoseNorthEast => &CITY_CAP_ROSE_NORTH_EAST,
            TileKind::CurveRoadRoseSouthEast => &CURVE_ROAD_ROSE_SOUTH_EAST,
            TileKind::StraightRoadRoseSouthWest => &STRAIGHT_ROAD_ROSE_SOUTH_WEST,
            TileKind::CityCornerRoseNorthWest => &CITY_CORNER_ROSE_NORTH_WEST,
        }
    }
}

/// Tiles and copy counts that make up a bag before shuffling.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TileSet {
    counts: Vec<(TileKind, u8)>,
}

impl TileSet {
    /// An empty tile set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The base game tiles, including the start tile.
    #[must_use]
    pub fn base() -> Self {
        Self::new()
            .with(TileKind::Cloister, 4)
            .with(TileKind::CloisterRoad, 2)
            .with(TileKind::CityFull, 1)
            .with(TileKind::CityCap, 5)
            .with(TileKind::CityCapStraightRoad, 4)
            .with(TileKind::CityCorner, 3)
            .with(TileKind::CityCornerPennant, 2)
            .with(TileKind::CityTube, 1)
            .with(TileKind::CityTubePennant, 2)
            .with(TileKind::CityCapsOpposite, 3)
            .with(TileKind::CityCapsAdjacent, 2)
            .with(TileKind::CityThreeSides, 3)
            .with(TileKind::CityThreeSidesPennant, 1)
            .with(TileKind::CityThreeSidesRoad, 3)
            .with(TileKind::CityCornerRoad, 3)
            .with(TileKind::CityCapCurveWest, 3)
            .with(TileKind::CityCapCurveEast, 3)
            .with(TileKind::CityCapCrossroad, 3)
            .with(TileKind::StraightRoad, 8)
            .with(TileKind::CurveRoad, 9)
            .with(TileKind::Crossroad3, 4)
            .with(TileKind::Crossroad4, 1)
    }

    /// Add `count` copies of `kind` (builder pattern).
    #[must_use]
    pub fn with(mut self, kind: TileKind, count: u8) -> Self {
        self.add(kind, count);
        self
    }

    /// Add `count` copies of `kind`.
    pub fn add(&mut self, kind: TileKind, count: u8) {
        match self.counts.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, n)) => *n = n.saturating_add(count),
            None => self.counts.push((kind, count)),
        }
    }

    /// Remove a single copy of `kind`. Returns false if none was left.
    pub fn remove_one(&mut self, kind: TileKind) -> bool {
        match self.counts.iter_mut().find(|(k, n)| *k == kind && *n > 0) {
            Some((_, n)) => {
                *n -= 1;
                true
            }
            None => false,
        }
    }

    /// Copies of `kind` in the set.
    #[must_use]
    pub fn count(&self, kind: TileKind) -> u8 {
        self.counts
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or(0, |(_, n)| *n)
    }

    /// Total number of tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.iter().map(|(_, n)| *n as usize).sum()
    }

    /// Check if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One entry per physical tile, in insertion order.
    #[must_use]
    pub fn expand(&self) -> Vec<TileKind> {
        self.counts
            .iter()
            .flat_map(|&(kind, n)| std::iter::repeat(kind).take(n as usize))
            .collect()
    }
}

/// A tile on the board.
///
/// Segment geometry is stored unrotated in the catalog; the accessors here
/// translate between board directions and catalog directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacedTile {
    pub kind: TileKind,
    pub position: Position,
    pub rotation: Rotation,
}

impl PlacedTile {
    /// Create a new placed tile.
    #[must_use]
    pub fn new(kind: TileKind, position: Position, rotation: Rotation) -> Self {
        Self { kind, position, rotation }
    }

    #[must_use]
    pub fn definition(&self) -> &'static TileDef {
        self.kind.definition()
    }

    /// Segment `index`, if the tile has one.
    #[must_use]
    pub fn segment(&self, index: u8) -> Option<&'static SegmentDef> {
        self.definition().segments.get(index as usize)
    }

    /// Number of segments on this tile.
    #[must_use]
    pub fn segment_count(&self) -> u8 {
        self.definition().segments.len() as u8
    }

    /// Terrain along board side `side`.
    #[must_use]
    pub fn terrain(&self, side: Side) -> Terrain {
        self.definition().terrain(side.unrotate(self.rotation))
    }

    /// Board sides reached by segment `index`.
    #[must_use]
    pub fn segment_sides(&self, index: u8) -> SmallVec<[Side; 4]> {
        self.segment(index)
            .map(|s| s.sides.iter().map(|side| side.rotate(self.rotation)).collect())
            .unwrap_or_default()
    }

    /// Board half-edges reached by segment `index`.
    #[must_use]
    pub fn segment_halves(&self, index: u8) -> SmallVec<[HalfEdge; 8]> {
        self.segment(index)
            .map(|s| s.halves.iter().map(|half| half.rotate(self.rotation)).collect())
            .unwrap_or_default()
    }

    /// The segment of `kind` reaching board side `side`.
    #[must_use]
    pub fn segment_on_side(&self, kind: FeatureKind, side: Side) -> Option<u8> {
        let local = side.unrotate(self.rotation);
        self.definition()
            .segments
            .iter()
            .position(|s| s.kind == kind && s.reaches_side(local))
            .map(|i| i as u8)
    }

    /// The farm segment reaching board half-edge `half`.
    #[must_use]
    pub fn segment_on_half(&self, half: HalfEdge) -> Option<u8> {
        let local = half.rotate(self.rotation.inverse());
        self.definition()
            .segments
            .iter()
            .position(|s| s.kind == FeatureKind::Farm && s.reaches_half(local))
            .map(|i| i as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [TileKind; 34] = [
        TileKind::Cloister,
        TileKind::CloisterRoad,
        TileKind::CityFull,
        TileKind::CityCap,
        TileKind::CityCapStraightRoad,
        TileKind::CityCorner,
        TileKind::CityCornerPennant,
        TileKind::CityTube,
        TileKind::CityTubePennant,
        TileKind::CityCapsOpposite,
        TileKind::CityCapsAdjacent,
        TileKind::CityThreeSides,
        TileKind::CityThreeSidesPennant,
        TileKind::CityThreeSidesRoad,
        TileKind::CityCornerRoad,
        TileKind::CityCapCurveWest,
        TileKind::CityCapCurveEast,
        TileKind::CityCapCrossroad,
        TileKind::StraightRoad,
        TileKind::CurveRoad,
        TileKind::Crossroad3,
        TileKind::Crossroad4,
        TileKind::CityCathedral,
        TileKind::StraightRoadInn,
        TileKind::CurveRoadInn,
        TileKind::CityCapWine,
        TileKind::CityTubeGrain,
        TileKind::CityCornerCloth,
        TileKind::CityThreeSidesWine,
        TileKind::CrossroadRoseOrigin,
        TileKind::CityCapRoseNorthEast,
        TileKind::CurveRoadRoseSouthEast,
        TileKind::StraightRoadRoseSouthWest,
        TileKind::CityCornerRoseNorthWest,
    ];

    #[test]
    fn test_definitions_match_kind() {
        for kind in ALL_KINDS {
            assert_eq!(kind.definition().kind, kind);
        }
    }

    /// Every road or field side must have both halves covered by farms,
    /// city sides by none, and no half may belong to two farms.
    #[test]
    fn test_farm_halves_cover_non_city_sides() {
        for kind in ALL_KINDS {
            let def = kind.definition();
            for half in HalfEdge::ALL {
                let farms = def
                    .segments
                    .iter()
                    .filter(|s| s.kind == FeatureKind::Farm && s.reaches_half(half))
                    .count();
                let expected = match def.terrain(half.side()) {
                    Terrain::City => 0,
                    Terrain::Road | Terrain::Field => 1,
                };
                assert_eq!(farms, expected, "{:?} half {:?}", kind, half);
            }
        }
    }

    #[test]
    fn test_sides_belong_to_one_segment() {
        for kind in ALL_KINDS {
            let def = kind.definition();
            for side in Side::ALL {
                let owners = def.segments.iter().filter(|s| s.reaches_side(side)).count();
                assert!(owners <= 1, "{:?} side {:?}", kind, side);
            }
        }
    }

    #[test]
    fn test_adjoining_cities_point_at_cities() {
        for kind in ALL_KINDS {
            let def = kind.definition();
            for segment in def.segments {
                for &city in segment.adjoining_cities {
                    assert_eq!(def.segments[city as usize].kind, FeatureKind::City, "{:?}", kind);
                }
            }
        }
    }

    #[test]
    fn test_terrain() {
        let def = TileKind::CityCapStraightRoad.definition();
        assert_eq!(def.terrain(Side::North), Terrain::City);
        assert_eq!(def.terrain(Side::East), Terrain::Road);
        assert_eq!(def.terrain(Side::South), Terrain::Field);
        assert_eq!(def.terrain(Side::West), Terrain::Road);
    }

    #[test]
    fn test_base_set() {
        let mut set = TileSet::base();
        assert_eq!(set.len(), 70);
        assert_eq!(set.count(TileKind::CurveRoad), 9);

        assert!(set.remove_one(TileKind::Crossroad4));
        assert!(!set.remove_one(TileKind::Crossroad4));
        assert_eq!(set.len(), 69);
        assert_eq!(set.expand().len(), 69);
    }
}
