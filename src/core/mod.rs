//! Core engine types: players, state, actions, events, memoization, RNG,
//! configuration.

pub mod action;
pub mod config;
pub mod event;
pub mod memo;
pub mod player;
pub mod players;
pub mod rng;
pub mod snapshot;
pub mod state;

pub use action::{Action, ActionError, ActionRecord, Placement};
pub use config::{ConfigError, GameConfig, DEFAULT_FOLLOWERS, MAX_PLAYERS};
pub use event::{EventKind, EventLog, EventMeta, GameEvent};
pub use memo::{MemoStats, Memoized, DEFAULT_MEMO_CAPACITY};
pub use player::{Player, PlayerColor, PlayerId, PlayerMap};
pub use players::{PlayersState, PointCategory};
pub use rng::GameRng;
pub use snapshot::{Snapshot, SnapshotError};
pub use state::{GameState, Phase, StateVersion, TurnState};
