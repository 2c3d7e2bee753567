//! Wind roses.
//!
//! The origin rose tile fixes a reference position. A small rose tile placed
//! unrotated inside the quadrant its rose points to, as seen from the
//! origin, is worth 3 points to the player placing it.

use std::any::Any;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Capability, CapabilityId, CapabilityState, SubState};
use crate::board::{PlacedTile, Position, Rose, Rotation, TileKind, TileSet};
use crate::core::{GameState, PointCategory};
use crate::reducers::{AddPoints, Reducer};

/// Points for a rose placed in its quadrant.
pub const ROSE_POINTS: i64 = 3;

/// Private sub-state: where the origin rose lies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindRoseState {
    pub origin: Option<Position>,
}

impl SubState for WindRoseState {
    const OWNER: CapabilityId = CapabilityId::WindRose;

    fn from_slot(slot: &CapabilityState) -> Option<&Self> {
        match slot {
            CapabilityState::WindRose(state) => Some(state),
            _ => None,
        }
    }

    fn into_slot(self) -> CapabilityState {
        CapabilityState::WindRose(self)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct WindRose;

impl Capability for WindRose {
    fn id(&self) -> CapabilityId {
        CapabilityId::WindRose
    }

    fn initial_state(&self) -> CapabilityState {
        WindRoseState::default().into_slot()
    }

    fn extend_tile_set(&self, tiles: &mut TileSet) {
        tiles.add(TileKind::CrossroadRoseOrigin, 1);
        tiles.add(TileKind::CityCapRoseNorthEast, 1);
        tiles.add(TileKind::CurveRoadRoseSouthEast, 1);
        tiles.add(TileKind::StraightRoadRoseSouthWest, 1);
        tiles.add(TileKind::CityCornerRoseNorthWest, 1);
    }

    fn on_tile_placed(&self, state: &GameState, tile: &PlacedTile) -> GameState {
        match tile.definition().rose {
            Some(Rose::Origin) => {
                debug!(position = %tile.position, "wind rose origin placed");
                state.with_sub_state(WindRoseState { origin: Some(tile.position) })
            }
            Some(Rose::Pointer(quadrant)) => {
                let origin = state.sub_state::<WindRoseState>().and_then(|s| s.origin);
                let hit = tile.rotation == Rotation::R0
                    && origin.and_then(|o| tile.position.quadrant_from(o)) == Some(quadrant);
                if hit && !state.players().is_empty() {
                    AddPoints::new(state.current_player(), ROSE_POINTS, PointCategory::WindRose).apply(state)
                } else {
                    state.clone()
                }
            }
            None => state.clone(),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
