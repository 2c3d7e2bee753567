//! Capabilities: optional rule modules layered onto the base rules.
//!
//! A capability is a rule variant or expansion. It may:
//! - own a private sub-state slot inside [`GameState`]
//! - define [`Token`] kinds tracked by the players registry
//! - hook the turn lifecycle (tile placed, turn scoring, final scoring)
//! - adjust feature points or completed-feature counts for everyone
//! - veto a placement
//! - add tiles to the bag
//!
//! ## Hooks
//!
//! Every hook takes a snapshot and returns a snapshot. The registry folds
//! the state through the active capabilities in registration order, so one
//! capability always sees what the previous ones did. Hooks have default
//! implementations that leave the state untouched; a capability overrides
//! only the ones it needs.
//!
//! ## Sub-state
//!
//! The set of capabilities is closed ([`CapabilityId`]), and so is the set
//! of sub-state shapes ([`CapabilityState`]). A capability reads and writes
//! its slot through [`SubState`], addressed by its own id; nothing else in
//! the engine looks inside.

pub mod count;
pub mod inns;
pub mod king_robber;
pub mod registry;
pub mod trade_goods;
pub mod wind_rose;

use std::any::Any;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{Feature, FeatureKind, PlacedTile, TileKind, TileSet};
use crate::core::{ActionError, GameState, Placement};
use crate::scoring::CompletedFeatures;

pub use count::Count;
pub use inns::InnsAndCathedrals;
pub use king_robber::{KingAndRobberBaron, KING, ROBBER};
pub use registry::CapabilityRegistry;
pub use trade_goods::{goods_token, TradeGoods, CLOTH, GRAIN, WINE};
pub use wind_rose::{WindRose, WindRoseState};

/// Identifies a capability. Also the key of its sub-state slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CapabilityId {
    KingAndRobberBaron,
    Count,
    InnsAndCathedrals,
    TradeGoods,
    WindRose,
}

impl CapabilityId {
    pub const ALL: [CapabilityId; 5] = [
        CapabilityId::KingAndRobberBaron,
        CapabilityId::Count,
        CapabilityId::InnsAndCathedrals,
        CapabilityId::TradeGoods,
        CapabilityId::WindRose,
    ];

    /// Stable kebab-case name, used on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            CapabilityId::KingAndRobberBaron => "king-and-robber-baron",
            CapabilityId::Count => "count",
            CapabilityId::InnsAndCathedrals => "inns-and-cathedrals",
            CapabilityId::TradeGoods => "trade-goods",
            CapabilityId::WindRose => "wind-rose",
        }
    }

    /// The capability whose tile set contains `tile`, if it is not a base tile.
    #[must_use]
    pub fn providing(tile: TileKind) -> Option<Self> {
        match tile {
            TileKind::CityCathedral | TileKind::StraightRoadInn | TileKind::CurveRoadInn => {
                Some(CapabilityId::InnsAndCathedrals)
            }
            TileKind::CityCapWine
            | TileKind::CityTubeGrain
            | TileKind::CityCornerCloth
            | TileKind::CityThreeSidesWine => Some(CapabilityId::TradeGoods),
            TileKind::CrossroadRoseOrigin
            | TileKind::CityCapRoseNorthEast
            | TileKind::CurveRoadRoseSouthEast
            | TileKind::StraightRoadRoseSouthWest
            | TileKind::CityCornerRoseNorthWest => Some(CapabilityId::WindRose),
            _ => None,
        }
    }
}

impl fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown capability name.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown capability `{0}` (expected one of: king-and-robber-baron, count, inns-and-cathedrals, trade-goods, wind-rose)")]
pub struct ParseCapabilityError(pub String);

impl FromStr for CapabilityId {
    type Err = ParseCapabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|id| id.name() == wanted)
            .ok_or_else(|| ParseCapabilityError(s.to_string()))
    }
}

/// A capability-defined marker kind.
///
/// The players registry counts tokens generically; only the owning
/// capability gives `code` a meaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Token {
    pub capability: CapabilityId,
    pub code: u8,
}

impl Token {
    /// Create a new token kind.
    #[must_use]
    pub const fn new(capability: CapabilityId, code: u8) -> Self {
        Self { capability, code }
    }
}

/// Private sub-state of one capability.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapabilityState {
    /// The capability keeps everything it needs in the shared registries.
    #[default]
    Empty,
    WindRose(WindRoseState),
}

/// A typed view of one [`CapabilityState`] variant.
pub trait SubState: Sized + Clone {
    /// The capability that owns this slot.
    const OWNER: CapabilityId;

    fn from_slot(slot: &CapabilityState) -> Option<&Self>;

    fn into_slot(self) -> CapabilityState;
}

/// A rule module. See the module docs for the hook contract.
///
/// Implementations must be pure: same snapshot in, same snapshot out.
/// Returning `state.clone()` means "no change".
pub trait Capability: Send + Sync + fmt::Debug + Any {
    fn id(&self) -> CapabilityId;

    /// Sub-state stored at setup.
    fn initial_state(&self) -> CapabilityState {
        CapabilityState::Empty
    }

    /// Add this capability's tiles to the bag contents.
    fn extend_tile_set(&self, _tiles: &mut TileSet) {}

    /// Veto a placement. Runs before anything changes.
    fn validate_placement(&self, _state: &GameState, _placement: &Placement) -> Result<(), ActionError> {
        Ok(())
    }

    /// Runs right after the drawn tile is merged into the board.
    fn on_tile_placed(&self, state: &GameState, _tile: &PlacedTile) -> GameState {
        state.clone()
    }

    /// Runs after base scoring of the features completed this turn.
    fn on_turn_scoring(&self, state: &GameState, _completed: &CompletedFeatures) -> GameState {
        state.clone()
    }

    /// Runs once, after the last turn has been scored.
    fn on_final_scoring(&self, state: &GameState) -> GameState {
        state.clone()
    }

    /// Adjust the points a feature is worth. `points` is what the base rules
    /// and earlier capabilities decided.
    fn feature_points(&self, _state: &GameState, _feature: &Feature, _completed: bool, points: i64) -> i64 {
        points
    }

    /// Extra completed features of `kind` to count when awards are scored.
    fn completed_count_bonus(&self, _kind: FeatureKind) -> usize {
        0
    }

    fn as_any(&self) -> &dyn Any;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_names_round_trip() {
        for id in CapabilityId::ALL {
            assert_eq!(id.name().parse::<CapabilityId>(), Ok(id));
            assert_eq!(id.to_string(), id.name());
        }
        assert_eq!("Trade_Goods".parse::<CapabilityId>(), Ok(CapabilityId::TradeGoods));
        assert!("dragons".parse::<CapabilityId>().is_err());
    }

    #[test]
    fn test_providing() {
        assert_eq!(CapabilityId::providing(TileKind::CurveRoad), None);
        assert_eq!(
            CapabilityId::providing(TileKind::CityCathedral),
            Some(CapabilityId::InnsAndCathedrals)
        );
        assert_eq!(
            CapabilityId::providing(TileKind::CrossroadRoseOrigin),
            Some(CapabilityId::WindRose)
        );
    }

    #[test]
    fn test_tokens_are_distinct() {
        let tokens = [KING, ROBBER, WINE, GRAIN, CLOTH];
        for (i, a) in tokens.iter().enumerate() {
            for b in &tokens[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
