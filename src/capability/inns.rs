//! Inns and Cathedrals.
//!
//! A road with an inn is worth 2 per tile when completed and nothing
//! otherwise. A city with a cathedral is worth 3 per tile and pennant when
//! completed and nothing otherwise. Two cathedral tiles may not share an
//! edge.

use std::any::Any;

use super::{Capability, CapabilityId};
use crate::board::{Feature, FeatureKind, TileKind, TileSet};
use crate::core::{ActionError, GameState, Placement};

#[derive(Clone, Copy, Debug, Default)]
pub struct InnsAndCathedrals;

impl Capability for InnsAndCathedrals {
    fn id(&self) -> CapabilityId {
        CapabilityId::InnsAndCathedrals
    }

    fn extend_tile_set(&self, tiles: &mut TileSet) {
        tiles.add(TileKind::CityCathedral, 2);
        tiles.add(TileKind::StraightRoadInn, 2);
        tiles.add(TileKind::CurveRoadInn, 1);
    }

    fn validate_placement(&self, state: &GameState, placement: &Placement) -> Result<(), ActionError> {
        if !placement.tile.definition().has_cathedral() {
            return Ok(());
        }
        let touching = placement
            .position
            .adjacent()
            .into_iter()
            .filter_map(|p| state.board().tile(p))
            .any(|t| t.definition().has_cathedral());
        if touching {
            return Err(ActionError::Forbidden {
                capability: self.id(),
                reason: format!("cathedral at {} would touch another cathedral", placement.position),
            });
        }
        Ok(())
    }

    fn feature_points(&self, state: &GameState, feature: &Feature, completed: bool, points: i64) -> i64 {
        let board = state.board();
        match feature.kind {
            FeatureKind::Road if feature.has_inn(board) => {
                if completed {
                    2 * feature.size() as i64
                } else {
                    0
                }
            }
            FeatureKind::City if feature.has_cathedral(board) => {
                if completed {
                    3 * (feature.size() + feature.pennants(board)) as i64
                } else {
                    0
                }
            }
            _ => points,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
