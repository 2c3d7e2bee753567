//! Game events and the append-only event log.
//!
//! Events are semantic facts ("player 2 received the king", "7 points for a
//! city"), appended by reducers in the order they happen. The presentation
//! layer reads them back to animate score changes; nothing in the engine
//! ever removes or rewrites an entry.
//!
//! ## Storage
//!
//! The log is an `im::Vector`, so appending to a derived snapshot shares
//! every earlier entry with its parent.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::board::{FeatureId, FeaturePlace, Position, Rotation, TileKind};
use crate::capability::Token;
use crate::core::players::PointCategory;
use crate::core::PlayerId;

/// Context shared by every event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMeta {
    /// Turn during which the event happened (0 during setup).
    pub turn: u32,

    /// Player whose turn it was, if any.
    pub triggering_player: Option<PlayerId>,
}

/// What happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    TilePlaced {
        tile: TileKind,
        position: Position,
        rotation: Rotation,
    },
    /// A drawn tile had no legal placement and left the game.
    TileDiscarded { tile: TileKind },
    FollowerDeployed { player: PlayerId, place: FeaturePlace },
    FollowerReturned { player: PlayerId, place: FeaturePlace },
    PointsAdded {
        player: PlayerId,
        points: i64,
        category: PointCategory,
        source: Option<FeatureId>,
    },
    TokenReceived {
        player: PlayerId,
        token: Token,
        count: u32,
        source: Option<FeatureId>,
    },
    GameOver,
}

/// A logged event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub meta: EventMeta,
    pub kind: EventKind,
}

impl GameEvent {
    /// Create a new event.
    #[must_use]
    pub fn new(meta: EventMeta, kind: EventKind) -> Self {
        Self { meta, kind }
    }

    /// The player an event is about, if it names one.
    #[must_use]
    pub fn player(&self) -> Option<PlayerId> {
        match &self.kind {
            EventKind::FollowerDeployed { player, .. }
            | EventKind::FollowerReturned { player, .. }
            | EventKind::PointsAdded { player, .. }
            | EventKind::TokenReceived { player, .. } => Some(*player),
            EventKind::TilePlaced { .. } | EventKind::TileDiscarded { .. } | EventKind::GameOver => {
                None
            }
        }
    }
}

/// Append-only, ordered event log.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    events: Vector<GameEvent>,
}

impl EventLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event at the end.
    pub fn append(&mut self, event: GameEvent) {
        self.events.push_back(event);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events in append order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &GameEvent> {
        self.events.iter()
    }

    /// The last `n` events (fewer if the log is shorter).
    pub fn tail(&self, n: usize) -> impl Iterator<Item = &GameEvent> {
        self.events.iter().skip(self.events.len().saturating_sub(n))
    }

    /// Events appended at or after `index`.
    pub fn since(&self, index: usize) -> impl Iterator<Item = &GameEvent> {
        self.events.iter().skip(index)
    }

    /// The most recent event.
    #[must_use]
    pub fn last(&self) -> Option<&GameEvent> {
        self.events.last()
    }
}
