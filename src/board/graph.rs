//! The board: placed tiles and the feature graph built from them.
//!
//! All collections are persistent (`im`), so cloning a board is O(1) and a
//! placement only copies the paths it touches.
//!
//! ## Merging
//!
//! Placing a tile visits its segments in catalog order. Each segment looks
//! across its edges (whole sides for roads and cities, half-edges for farms)
//! for features on neighbouring tiles, and everything it touches is merged
//! into a single feature under a fresh [`FeatureId`].

use im::{OrdMap, OrdSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::trace;

use super::feature::{Feature, FeatureId, FeatureKind, FeaturePlace};
use super::position::{Position, Rotation, Side};
use super::tile::{PlacedTile, TileKind};
use crate::core::snapshot::seq_map;

/// Why a tile cannot go where it was asked to.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("position {0} is already occupied")]
    Occupied(Position),

    #[error("position {0} has no neighbouring tile")]
    NotAdjacent(Position),

    #[error("{side:?} edge at {position} does not match its neighbour")]
    EdgeMismatch { position: Position, side: Side },
}

/// Placed tiles and their features.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    #[serde(with = "seq_map")]
    tiles: OrdMap<Position, PlacedTile>,
    #[serde(with = "seq_map")]
    features: OrdMap<FeatureId, Feature>,
    #[serde(with = "seq_map")]
    index: OrdMap<FeaturePlace, FeatureId>,
    next_feature: u32,
}

impl Board {
    /// Create an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tiles placed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// The tile at `position`.
    #[must_use]
    pub fn tile(&self, position: Position) -> Option<&PlacedTile> {
        self.tiles.get(&position)
    }

    /// All tiles in position order.
    pub fn tiles(&self) -> impl Iterator<Item = &PlacedTile> {
        self.tiles.values()
    }

    /// Look up a feature.
    #[must_use]
    pub fn feature(&self, id: FeatureId) -> Option<&Feature> {
        self.features.get(&id)
    }

    /// The feature a segment belongs to.
    #[must_use]
    pub fn feature_at(&self, place: FeaturePlace) -> Option<&Feature> {
        self.index.get(&place).and_then(|id| self.features.get(id))
    }

    /// All features in id order.
    pub fn features(&self) -> impl Iterator<Item = &Feature> {
        self.features.values()
    }

    /// All features of `kind`.
    pub fn features_of(&self, kind: FeatureKind) -> impl Iterator<Item = &Feature> {
        self.features.values().filter(move |f| f.kind == kind)
    }

    /// Features that a tile at `position` belongs to, plus cloisters on the
    /// surrounding cells. These are the features a placement there can
    /// complete.
    #[must_use]
    pub fn features_touching(&self, position: Position) -> SmallVec<[FeatureId; 8]> {
        let mut ids: SmallVec<[FeatureId; 8]> = SmallVec::new();
        let cells = std::iter::once(position).chain(position.surrounding());
        for cell in cells {
            let Some(tile) = self.tile(cell) else {
                continue;
            };
            for segment in 0..tile.segment_count() {
                let Some(feature) = self.feature_at(FeaturePlace::new(cell, segment)) else {
                    continue;
                };
                let relevant = cell == position || feature.kind == FeatureKind::Cloister;
                if relevant && !ids.contains(&feature.id) {
                    ids.push(feature.id);
                }
            }
        }
        ids.sort();
        ids
    }

    /// Check whether `kind` may be placed at `position` with `rotation`.
    pub fn check_placement(
        &self,
        kind: TileKind,
        position: Position,
        rotation: Rotation,
    ) -> Result<(), PlacementError> {
        if self.tiles.contains_key(&position) {
            return Err(PlacementError::Occupied(position));
        }

        let candidate = PlacedTile::new(kind, position, rotation);
        let mut has_neighbor = false;
        for side in Side::ALL {
            let Some(neighbor) = self.tile(position.neighbor(side)) else {
                continue;
            };
            has_neighbor = true;
            if candidate.terrain(side) != neighbor.terrain(side.opposite()) {
                return Err(PlacementError::EdgeMismatch { position, side });
            }
        }

        if has_neighbor {
            Ok(())
        } else {
            Err(PlacementError::NotAdjacent(position))
        }
    }

    /// Empty cells orthogonally adjacent to at least one tile.
    #[must_use]
    pub fn frontier(&self) -> OrdSet<Position> {
        self.tiles
            .keys()
            .flat_map(|p| p.adjacent())
            .filter(|p| !self.tiles.contains_key(p))
            .collect()
    }

    /// Every legal `(position, rotation)` for `kind`, in board order.
    #[must_use]
    pub fn legal_placements(&self, kind: TileKind) -> Vec<(Position, Rotation)> {
        let mut placements = Vec::new();
        for position in self.frontier() {
            for rotation in Rotation::ALL {
                if self.check_placement(kind, position, rotation).is_ok() {
                    placements.push((position, rotation));
                }
            }
        }
        placements
    }

    /// Can `kind` go anywhere at all?
    #[must_use]
    pub fn can_place(&self, kind: TileKind) -> bool {
        self.frontier().into_iter().any(|position| {
            Rotation::ALL
                .iter()
                .any(|&rotation| self.check_placement(kind, position, rotation).is_ok())
        })
    }

    /// Put a tile on the board and merge its features.
    ///
    /// Does not check legality; callers validate with
    /// [`Board::check_placement`] first (the start tile skips it).
    #[must_use]
    pub fn with_tile(&self, tile: PlacedTile) -> Self {
        let mut board = self.clone();
        board.tiles.insert(tile.position, tile);

        for segment in 0..tile.segment_count() {
            let place = FeaturePlace::new(tile.position, segment);
            let Some(def) = tile.segment(segment) else {
                continue;
            };

            let mut touching: SmallVec<[FeatureId; 4]> = SmallVec::new();
            let mut note = |id: Option<FeatureId>| {
                if let Some(id) = id {
                    if !touching.contains(&id) {
                        touching.push(id);
                    }
                }
            };

            match def.kind {
                FeatureKind::Road | FeatureKind::City => {
                    for side in tile.segment_sides(segment) {
                        let across = tile.position.neighbor(side);
                        let id = board.tile(across).and_then(|n| {
                            let seg = n.segment_on_side(def.kind, side.opposite())?;
                            board.index.get(&FeaturePlace::new(across, seg)).copied()
                        });
                        note(id);
                    }
                }
                FeatureKind::Farm => {
                    for half in tile.segment_halves(segment) {
                        let across = tile.position.neighbor(half.side());
                        let id = board.tile(across).and_then(|n| {
                            let seg = n.segment_on_half(half.opposite())?;
                            board.index.get(&FeaturePlace::new(across, seg)).copied()
                        });
                        note(id);
                    }
                }
                FeatureKind::Cloister => {}
            }

            board.merge(def.kind, place, &touching);
        }

        board
    }

    fn merge(&mut self, kind: FeatureKind, place: FeaturePlace, touching: &[FeatureId]) {
        let id = FeatureId(self.next_feature);
        self.next_feature += 1;

        let mut places = OrdSet::unit(place);
        for old in touching {
            if let Some(feature) = self.features.remove(old) {
                places = places.union(feature.places);
            }
        }
        for p in &places {
            self.index.insert(*p, id);
        }

        trace!(feature = %id, ?kind, merged = touching.len(), size = places.len(), "feature merged");
        self.features.insert(id, Feature { id, kind, places });
    }
}
