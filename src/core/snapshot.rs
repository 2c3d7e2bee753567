//! Persistence of game snapshots.
//!
//! A [`GameState`] serializes through [`Snapshot`], which drops the two
//! fields that only make sense inside one process: the snapshot version and
//! the shared capability registry. The registry is rebuilt from the stored
//! capability ids on load, and the loaded state gets a fresh version.
//!
//! Maps keyed by structs are written as sequences of pairs so that text
//! formats without composite keys (JSON) can carry them.

use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::action::ActionRecord;
use super::event::EventLog;
use super::players::PlayersState;
use super::state::{GameState, TurnState};
use crate::board::{Board, TileKind};
use crate::capability::{CapabilityId, CapabilityState};

/// Snapshot encoding or decoding failed.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] bincode::Error),

    #[error("failed to decode snapshot: {0}")]
    Decode(#[source] bincode::Error),
}

/// The serialized form of a [`GameState`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Snapshot {
    pub capabilities: Vec<CapabilityId>,
    pub board: Board,
    pub players: PlayersState,
    #[serde(with = "seq_map")]
    pub capability_states: OrdMap<CapabilityId, CapabilityState>,
    pub events: EventLog,
    pub turn: TurnState,
    pub bag: Vector<TileKind>,
    pub history: Vector<ActionRecord>,
}

impl GameState {
    /// Encode with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(SnapshotError::Encode)
    }

    /// Decode a state written by [`GameState::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        bincode::deserialize(bytes).map_err(SnapshotError::Decode)
    }
}

/// Serialize an `OrdMap` as a sequence of `(key, value)` pairs.
pub mod seq_map {
    use im::OrdMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<K, V, S>(map: &OrdMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        K: Serialize + Ord + Clone,
        V: Serialize + Clone,
        S: Serializer,
    {
        serializer.collect_seq(map.iter())
    }

    pub fn deserialize<'de, K, V, D>(deserializer: D) -> Result<OrdMap<K, V>, D::Error>
    where
        K: Deserialize<'de> + Ord + Clone,
        V: Deserialize<'de> + Clone,
        D: Deserializer<'de>,
    {
        let pairs: Vec<(K, V)> = Vec::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}
