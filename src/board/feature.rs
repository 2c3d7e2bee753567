//! Features: connected roads, cities, farms and cloisters.
//!
//! A feature is the set of tile segments joined across matching edges. The
//! board merges features as tiles are placed, so a [`Feature`] is always the
//! maximal connected group for its kind.

use im::{OrdMap, OrdSet};
use serde::{Deserialize, Serialize};

use super::graph::Board;
use super::position::Position;
use super::tile::{Goods, SegmentDef};

/// The four kinds of feature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FeatureKind {
    Road,
    City,
    Farm,
    Cloister,
}

/// Identifier of a feature on one board.
///
/// Ids are never reused; merging features produces a fresh id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeatureId(pub u32);

impl std::fmt::Display for FeatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "F{}", self.0)
    }
}

/// A segment of a placed tile. Followers stand on places.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeaturePlace {
    pub position: Position,
    pub segment: u8,
}

impl FeaturePlace {
    /// Create a new feature place.
    #[must_use]
    pub const fn new(position: Position, segment: u8) -> Self {
        Self { position, segment }
    }
}

/// A connected feature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub id: FeatureId,
    pub kind: FeatureKind,
    pub places: OrdSet<FeaturePlace>,
}

impl Feature {
    /// Number of distinct tiles the feature spans.
    #[must_use]
    pub fn size(&self) -> usize {
        let mut positions: Vec<Position> = self.places.iter().map(|p| p.position).collect();
        positions.dedup();
        positions.len()
    }

    /// Distinct tile positions, in board order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let mut last = None;
        self.places.iter().filter_map(move |p| {
            if last == Some(p.position) {
                None
            } else {
                last = Some(p.position);
                Some(p.position)
            }
        })
    }

    fn segments<'a>(&'a self, board: &'a Board) -> impl Iterator<Item = &'static SegmentDef> + 'a {
        self.places
            .iter()
            .filter_map(move |place| board.tile(place.position)?.segment(place.segment))
    }

    /// Is the feature finished?
    ///
    /// Roads and cities are completed when no edge is left open, cloisters
    /// when all eight surrounding cells hold tiles. Farms never complete.
    #[must_use]
    pub fn is_completed(&self, board: &Board) -> bool {
        if self.places.is_empty() {
            return false;
        }
        match self.kind {
            FeatureKind::Road | FeatureKind::City => self.places.iter().all(|place| {
                board.tile(place.position).is_some_and(|tile| {
                    tile.segment_sides(place.segment)
                        .iter()
                        .all(|&side| board.tile(place.position.neighbor(side)).is_some())
                })
            }),
            FeatureKind::Cloister => self.places.iter().all(|place| {
                place
                    .position
                    .surrounding()
                    .iter()
                    .all(|p| board.tile(*p).is_some())
            }),
            FeatureKind::Farm => false,
        }
    }

    /// Number of pennant segments in the feature.
    #[must_use]
    pub fn pennants(&self, board: &Board) -> usize {
        self.segments(board).filter(|s| s.pennant).count()
    }

    /// Does any segment carry an inn?
    #[must_use]
    pub fn has_inn(&self, board: &Board) -> bool {
        self.segments(board).any(|s| s.inn)
    }

    /// Does any segment carry a cathedral?
    #[must_use]
    pub fn has_cathedral(&self, board: &Board) -> bool {
        self.segments(board).any(|s| s.cathedral)
    }

    /// Trade goods printed in the feature, by kind.
    #[must_use]
    pub fn goods(&self, board: &Board) -> OrdMap<Goods, u32> {
        let mut goods = OrdMap::new();
        for g in self.segments(board).filter_map(|s| s.goods) {
            *goods.entry(g).or_insert(0) += 1;
        }
        goods
    }

    /// Completed cities bordering this farm.
    #[must_use]
    pub fn adjoining_completed_cities(&self, board: &Board) -> OrdSet<FeatureId> {
        let mut cities = OrdSet::new();
        for place in &self.places {
            let Some(segment) = board.tile(place.position).and_then(|t| t.segment(place.segment)) else {
                continue;
            };
            for &city in segment.adjoining_cities {
                let city_place = FeaturePlace::new(place.position, city);
                if let Some(feature) = board.feature_at(city_place) {
                    if feature.is_completed(board) {
                        cities.insert(feature.id);
                    }
                }
            }
        }
        cities
    }
}
