//! Game configuration.
//!
//! A game is configured once at setup by providing:
//! - the seated players (nicknames, in seating order)
//! - the active capabilities, in the order their hooks run
//! - a seed for the tile bag, or a fixed tile sequence for replays and tests
//!
//! The engine never changes the configuration afterwards; the registry it
//! builds from `capabilities` is stored in every snapshot.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::TileKind;
use crate::capability::CapabilityId;

/// Most players a game can seat.
pub const MAX_PLAYERS: usize = 6;

/// Followers each player starts with.
pub const DEFAULT_FOLLOWERS: u8 = 7;

/// Rejected configuration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("player count {0} is outside 1..=6")]
    PlayerCount(usize),

    #[error("capability {0:?} is listed more than once")]
    DuplicateCapability(CapabilityId),

    #[error("tile {0:?} in the tile sequence needs a capability that is not active")]
    UnavailableTile(TileKind),
}

/// Complete game configuration.
///
/// ## Example
///
/// ```
/// use rust_tiles::capability::CapabilityId;
/// use rust_tiles::core::GameConfig;
///
/// let config = GameConfig::new(["ada", "brin"])
///     .with_capability(CapabilityId::KingAndRobberBaron)
///     .with_seed(7);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.players.len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Nicknames in seating order.
    pub players: Vec<String>,

    /// Active capabilities in registration order.
    pub capabilities: Vec<CapabilityId>,

    /// Seed for the tile bag shuffle.
    pub seed: u64,

    /// Followers each player starts with.
    pub followers: u8,

    /// Fixed draw order. When set, the bag is not shuffled.
    pub tile_sequence: Option<Vec<TileKind>>,

    /// The tile placed at the origin before the first turn.
    pub start_tile: TileKind,
}

impl GameConfig {
    /// Create a new game configuration.
    pub fn new<S: Into<String>>(players: impl IntoIterator<Item = S>) -> Self {
        Self {
            players: players.into_iter().map(Into::into).collect(),
            capabilities: Vec::new(),
            seed: 0,
            followers: DEFAULT_FOLLOWERS,
            tile_sequence: None,
            start_tile: TileKind::CityCapStraightRoad,
        }
    }

    /// Activate a capability (builder pattern).
    #[must_use]
    pub fn with_capability(mut self, capability: CapabilityId) -> Self {
        self.capabilities.push(capability);
        self
    }

    /// Activate several capabilities in order (builder pattern).
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: impl IntoIterator<Item = CapabilityId>) -> Self {
        self.capabilities.extend(capabilities);
        self
    }

    /// Set the bag seed (builder pattern).
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the starting follower supply (builder pattern).
    #[must_use]
    pub fn with_followers(mut self, followers: u8) -> Self {
        self.followers = followers;
        self
    }

    /// Use a fixed draw order instead of a shuffled bag (builder pattern).
    #[must_use]
    pub fn with_tile_sequence(mut self, tiles: impl IntoIterator<Item = TileKind>) -> Self {
        self.tile_sequence = Some(tiles.into_iter().collect());
        self
    }

    /// Set the start tile (builder pattern).
    #[must_use]
    pub fn with_start_tile(mut self, tile: TileKind) -> Self {
        self.start_tile = tile;
        self
    }

    /// Check the configuration before a game is created from it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.players.is_empty() || self.players.len() > MAX_PLAYERS {
            return Err(ConfigError::PlayerCount(self.players.len()));
        }

        for (i, id) in self.capabilities.iter().enumerate() {
            if self.capabilities[..i].contains(id) {
                return Err(ConfigError::DuplicateCapability(*id));
            }
        }

        let sequence = self.tile_sequence.iter().flatten();
        for &tile in sequence.chain(std::iter::once(&self.start_tile)) {
            if let Some(required) = CapabilityId::providing(tile) {
                if !self.capabilities.contains(&required) {
                    return Err(ConfigError::UnavailableTile(tile));
                }
            }
        }

        Ok(())
    }
}
