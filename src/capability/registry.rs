//! Capability registry.
//!
//! The registry holds the active capabilities in registration order and
//! dispatches lifecycle hooks to them. It is assembled once at setup and
//! shared (behind an `Arc`) by every snapshot of the game, so the dispatch
//! order is part of the state rather than of the call site.

use std::sync::Arc;

use tracing::debug;

use super::{
    Capability, CapabilityId, Count, InnsAndCathedrals, KingAndRobberBaron, TradeGoods, WindRose,
};
use crate::board::{Feature, FeatureKind, PlacedTile, TileSet};
use crate::core::{ActionError, GameState, Placement};
use crate::scoring::CompletedFeatures;

/// Build the instance for a capability id.
fn instantiate(id: CapabilityId) -> Arc<dyn Capability> {
    match id {
        CapabilityId::KingAndRobberBaron => Arc::new(KingAndRobberBaron::new()),
        CapabilityId::Count => Arc::new(Count),
        CapabilityId::InnsAndCathedrals => Arc::new(InnsAndCathedrals),
        CapabilityId::TradeGoods => Arc::new(TradeGoods),
        CapabilityId::WindRose => Arc::new(WindRose),
    }
}

/// Active capabilities, in registration order.
#[derive(Clone, Debug, Default)]
pub struct CapabilityRegistry {
    entries: Vec<Arc<dyn Capability>>,
}

impl CapabilityRegistry {
    /// A registry with no capabilities (base rules only).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantiate capabilities in the given order.
    ///
    /// Duplicates are rejected earlier by `GameConfig::validate`; if one slips
    /// through, only its first occurrence is registered.
    #[must_use]
    pub fn from_ids(ids: &[CapabilityId]) -> Self {
        let mut registry = Self::new();
        for &id in ids {
            if !registry.contains(id) {
                registry.entries.push(instantiate(id));
            }
        }
        registry
    }

    /// Ids in registration order.
    #[must_use]
    pub fn ids(&self) -> Vec<CapabilityId> {
        self.entries.iter().map(|c| c.id()).collect()
    }

    #[must_use]
    pub fn contains(&self, id: CapabilityId) -> bool {
        self.entries.iter().any(|c| c.id() == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Capabilities in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Capability> {
        self.entries.iter().map(|c| c.as_ref())
    }

    /// The active instance of a concrete capability type.
    #[must_use]
    pub fn find<C: Capability>(&self) -> Option<&C> {
        self.entries.iter().find_map(|c| c.as_any().downcast_ref::<C>())
    }

    /// The tiles in the bag: the base set plus every capability's tiles.
    #[must_use]
    pub fn tile_set(&self) -> TileSet {
        let mut tiles = TileSet::base();
        for capability in self.iter() {
            capability.extend_tile_set(&mut tiles);
        }
        tiles
    }

    /// First veto wins.
    pub fn validate_placement(&self, state: &GameState, placement: &Placement) -> Result<(), ActionError> {
        self.iter()
            .try_for_each(|c| c.validate_placement(state, placement))
    }

    /// Fold `on_tile_placed` through every capability.
    #[must_use]
    pub fn run_tile_placed(&self, state: &GameState, tile: &PlacedTile) -> GameState {
        self.iter().fold(state.clone(), |state, capability| {
            debug!(capability = %capability.id(), position = %tile.position, "on_tile_placed");
            capability.on_tile_placed(&state, tile)
        })
    }

    /// Fold `on_turn_scoring` through every capability.
    #[must_use]
    pub fn run_turn_scoring(&self, state: &GameState, completed: &CompletedFeatures) -> GameState {
        self.iter().fold(state.clone(), |state, capability| {
            debug!(capability = %capability.id(), completed = completed.len(), "on_turn_scoring");
            capability.on_turn_scoring(&state, completed)
        })
    }

    /// Fold `on_final_scoring` through every capability.
    #[must_use]
    pub fn run_final_scoring(&self, state: &GameState) -> GameState {
        self.iter().fold(state.clone(), |state, capability| {
            debug!(capability = %capability.id(), "on_final_scoring");
            capability.on_final_scoring(&state)
        })
    }

    /// Points for a feature after every capability's adjustment.
    #[must_use]
    pub fn feature_points(&self, state: &GameState, feature: &Feature, completed: bool, base: i64) -> i64 {
        self.iter()
            .fold(base, |points, c| c.feature_points(state, feature, completed, points))
    }

    /// Sum of every capability's bonus for `kind`.
    #[must_use]
    pub fn completed_count_bonus(&self, kind: FeatureKind) -> usize {
        self.iter().map(|c| c.completed_count_bonus(kind)).sum()
    }
}
