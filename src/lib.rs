//! # rust-tiles
//!
//! A deterministic rule engine for tile-placement territory games.
//!
//! ## Design Principles
//!
//! 1. **Snapshots, not mutation**: every operation takes a `GameState` and
//!    returns a new one. Published snapshots never change, so any thread
//!    may keep reading an old one while the game moves on.
//!
//! 2. **Determinism**: the same configuration and actions always produce
//!    identical snapshots and event logs. Nothing inside a snapshot is
//!    hash-ordered.
//!
//! 3. **Capabilities over special cases**: rule variants are capabilities
//!    registered at setup. Each owns a private sub-state slot and hooks the
//!    turn lifecycle; the base rules never name one.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) snapshot cloning via `im-rs`.
//!
//! - **Scoring pipeline**: base scoring of completed features, then every
//!   capability's hook folded over the state in registration order.
//!
//! - **Memoization**: expensive feature queries cached per snapshot
//!   version, bounded by an LRU.
//!
//! ## Modules
//!
//! - `board`: positions, tile catalog, feature graph
//! - `core`: players, state, actions, events, memoization, RNG, configuration
//! - `capability`: the capability trait, registry and built-in capabilities
//! - `reducers`: pure state-transition primitives
//! - `scoring`: base feature points and the scoring pipeline
//! - `rules`: `RulesEngine` trait and the standard turn
//! - `stats`: end-of-game summary

pub mod board;
pub mod capability;
pub mod core;
pub mod reducers;
pub mod rules;
pub mod scoring;
pub mod stats;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionError, ActionRecord, ConfigError, EventKind, EventLog, GameConfig, GameEvent, GameRng,
    GameState, Memoized, Phase, PlayerId, PlayerMap, PointCategory, SnapshotError, StateVersion,
};

pub use crate::board::{Board, Feature, FeatureId, FeatureKind, FeaturePlace, PlacedTile, Position, Rotation, TileKind};

pub use crate::capability::{Capability, CapabilityId, CapabilityRegistry, Token};

pub use crate::reducers::Reducer;

pub use crate::rules::{GameResult, RulesEngine, StandardRules};

pub use crate::stats::GameSummary;
