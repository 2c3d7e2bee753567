//! Player actions and why they can be rejected.
//!
//! A turn is a single action: place the drawn tile, optionally standing a
//! follower on one of its segments. Tiles with no legal placement are
//! discarded by the engine before the player is asked, so there is no pass.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::player::PlayerId;
use crate::board::{PlacementError, Position, Rotation, Side, TileKind};
use crate::capability::CapabilityId;

/// A complete game action.
///
/// ## Example
///
/// ```
/// use rust_tiles::board::{Position, Rotation};
/// use rust_tiles::core::Action;
///
/// let plain = Action::place(Position::new(1, 0), Rotation::R90);
/// let with_follower = plain.clone().with_follower(0);
/// assert_ne!(plain, with_follower);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    PlaceTile {
        position: Position,
        rotation: Rotation,
        /// Segment of the placed tile to deploy a follower on.
        follower: Option<u8>,
    },
}

impl Action {
    /// Place the drawn tile without deploying a follower.
    #[must_use]
    pub fn place(position: Position, rotation: Rotation) -> Self {
        Action::PlaceTile { position, rotation, follower: None }
    }

    /// Deploy a follower on `segment` of the placed tile (builder pattern).
    #[must_use]
    pub fn with_follower(self, segment: u8) -> Self {
        match self {
            Action::PlaceTile { position, rotation, .. } => Action::PlaceTile {
                position,
                rotation,
                follower: Some(segment),
            },
        }
    }
}

/// A tile placement as seen by capability vetoes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub player: PlayerId,
    pub tile: TileKind,
    pub position: Position,
    pub rotation: Rotation,
}

/// A recorded action with metadata, kept for replays.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player who took this action.
    pub player: PlayerId,

    /// The action taken.
    pub action: Action,

    /// Turn number when action was taken.
    pub turn: u32,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(player: PlayerId, action: Action, turn: u32) -> Self {
        Self { player, action, turn }
    }
}

/// Why an action was rejected. The state is never changed by a rejected
/// action.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("the game is over")]
    GameOver,

    #[error("it is {expected}'s turn, not {actual}'s")]
    NotYourTurn { expected: PlayerId, actual: PlayerId },

    #[error("there is no tile to place")]
    NoTileToPlace,

    #[error("position {0} is already occupied")]
    Occupied(Position),

    #[error("position {0} has no neighbouring tile")]
    NotAdjacent(Position),

    #[error("{side:?} edge at {position} does not match its neighbour")]
    EdgeMismatch { position: Position, side: Side },

    #[error("tile {tile:?} has no segment {segment}")]
    NoSuchSegment { tile: TileKind, segment: u8 },

    #[error("the feature on segment {0} already has a follower")]
    FeatureOccupied(u8),

    #[error("{0} has no followers left")]
    NoFollowers(PlayerId),

    #[error("{capability} forbids this placement: {reason}")]
    Forbidden { capability: CapabilityId, reason: String },
}

impl From<PlacementError> for ActionError {
    fn from(err: PlacementError) -> Self {
        match err {
            PlacementError::Occupied(p) => ActionError::Occupied(p),
            PlacementError::NotAdjacent(p) => ActionError::NotAdjacent(p),
            PlacementError::EdgeMismatch { position, side } => ActionError::EdgeMismatch { position, side },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_builders() {
        let action = Action::place(Position::new(0, -1), Rotation::R180);
        assert_eq!(
            action,
            Action::PlaceTile { position: Position::new(0, -1), rotation: Rotation::R180, follower: None }
        );

        let action = action.with_follower(2);
        assert!(matches!(action, Action::PlaceTile { follower: Some(2), .. }));
    }

    #[test]
    fn test_action_record_serialization() {
        let action = Action::place(Position::new(1, 0), Rotation::R90).with_follower(0);
        let record = ActionRecord::new(PlayerId::new(1), action, 2);

        let json = serde_json::to_string(&record).unwrap();
        let deserialized: ActionRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(record, deserialized);
    }

    #[test]
    fn test_placement_error_conversion() {
        let err: ActionError = PlacementError::NotAdjacent(Position::new(3, 3)).into();
        assert_eq!(err, ActionError::NotAdjacent(Position::new(3, 3)));
        assert_eq!(err.to_string(), "position (3, 3) has no neighbouring tile");
    }

    #[test]
    fn test_forbidden_message() {
        let err = ActionError::Forbidden {
            capability: CapabilityId::InnsAndCathedrals,
            reason: "cathedrals may not touch".into(),
        };
        assert_eq!(
            err.to_string(),
            "inns-and-cathedrals forbids this placement: cathedrals may not touch"
        );
    }
}
