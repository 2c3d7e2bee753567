//! Game state: the immutable snapshot everything else reads and derives.
//!
//! ## GameState
//!
//! Complete game state:
//! - board and feature graph
//! - players registry (points, tokens, followers)
//! - one private sub-state slot per active capability
//! - event log and action history
//! - turn marker and tile bag
//!
//! ## Snapshots
//!
//! A published `GameState` is never mutated. Operations take `&self` and
//! return a new state; every collection inside is persistent (`im`), so a
//! derived state shares all untouched structure with its parent and cloning
//! is O(1).
//!
//! Every snapshot carries a process-unique [`StateVersion`]. A clone is the
//! same snapshot and keeps the version; every derivation gets a fresh one.
//! Memoized queries are keyed by it.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::action::ActionRecord;
use super::config::{ConfigError, GameConfig};
use super::event::{EventKind, EventLog, EventMeta, GameEvent};
use super::player::PlayerId;
use super::players::PlayersState;
use super::rng::GameRng;
use super::snapshot::Snapshot;
use crate::board::{Board, Feature, FeatureId, FeatureKind, FeaturePlace, PlacedTile, Position, Rotation, TileKind};
use crate::capability::{CapabilityId, CapabilityRegistry, CapabilityState, SubState};
use crate::rules::turn;

static NEXT_VERSION: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateVersion(u64);

impl StateVersion {
    fn next() -> Self {
        Self(NEXT_VERSION.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for StateVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Where the game is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// The turn player places the drawn tile.
    #[default]
    PlaceTile,
    /// Final scoring is done; no further actions are accepted.
    GameOver,
}

/// Turn marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    /// Turn number (starts at 1; 0 during setup).
    pub turn: u32,

    /// Whose turn it is.
    pub player: PlayerId,

    pub phase: Phase,

    /// The tile drawn for this turn.
    pub tile: Option<TileKind>,
}

impl Default for TurnState {
    fn default() -> Self {
        Self {
            turn: 0,
            player: PlayerId::new(0),
            phase: Phase::PlaceTile,
            tile: None,
        }
    }
}

/// The immutable game snapshot.
#[derive(Clone, Serialize, Deserialize)]
#[serde(into = "Snapshot", from = "Snapshot")]
pub struct GameState {
    version: StateVersion,
    registry: Arc<CapabilityRegistry>,
    board: Board,
    players: PlayersState,
    capabilities: OrdMap<CapabilityId, CapabilityState>,
    events: EventLog,
    turn: TurnState,
    bag: Vector<TileKind>,
    history: Vector<ActionRecord>,
}

impl GameState {
    /// Create the initial snapshot for a validated configuration.
    ///
    /// The start tile is placed at the origin, the bag is filled (shuffled
    /// from the seed unless a fixed sequence is given) and the first tile
    /// is drawn for player 0.
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let registry = CapabilityRegistry::from_ids(&config.capabilities);
        let capabilities = registry
            .iter()
            .map(|c| (c.id(), c.initial_state()))
            .collect();

        let bag: Vector<TileKind> = match &config.tile_sequence {
            Some(sequence) => sequence.iter().copied().collect(),
            None => {
                let mut tiles = registry.tile_set();
                tiles.remove_one(config.start_tile);
                let mut tiles = tiles.expand();
                let mut rng = GameRng::new(config.seed).for_context("tile-bag");
                rng.shuffle(&mut tiles);
                tiles.into_iter().collect()
            }
        };

        let state = Self {
            version: StateVersion::next(),
            registry: Arc::new(registry),
            board: Board::new(),
            players: PlayersState::new(config.players.iter().cloned(), config.followers),
            capabilities,
            events: EventLog::new(),
            turn: TurnState::default(),
            bag,
            history: Vector::new(),
        };
        debug!(players = config.players.len(), bag = state.bag.len(), "game created");

        let start = PlacedTile::new(config.start_tile, Position::ORIGIN, Rotation::R0);
        let state = state.derive(|s| {
            let meta = s.event_meta();
            s.board = s.board.with_tile(start);
            s.events.append(GameEvent::new(
                meta,
                EventKind::TilePlaced { tile: start.kind, position: start.position, rotation: start.rotation },
            ));
        });
        let state = state.registry().run_tile_placed(&state, &start);
        let state = state.derive(|s| s.turn.turn = 1);

        Ok(turn::draw_tile(&state))
    }

    /// Copy this snapshot, apply `f`, and stamp the result with a fresh
    /// version.
    #[must_use]
    pub(crate) fn derive(&self, f: impl FnOnce(&mut GameState)) -> Self {
        let mut next = self.clone();
        next.version = StateVersion::next();
        f(&mut next);
        next
    }

    // === Identity ===

    /// This snapshot's identity.
    #[must_use]
    pub fn version(&self) -> StateVersion {
        self.version
    }

    /// The active capabilities, in registration order.
    #[must_use]
    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    #[must_use]
    pub fn has_capability(&self, id: CapabilityId) -> bool {
        self.registry.contains(id)
    }

    // === Components ===

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn players(&self) -> &PlayersState {
        &self.players
    }

    #[must_use]
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    #[must_use]
    pub fn turn(&self) -> &TurnState {
        &self.turn
    }

    /// Tiles left to draw, in draw order.
    #[must_use]
    pub fn bag(&self) -> &Vector<TileKind> {
        &self.bag
    }

    /// Accepted actions, in order.
    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.turn.player
    }

    #[must_use]
    pub fn current_tile(&self) -> Option<TileKind> {
        self.turn.tile
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.turn.phase == Phase::GameOver
    }

    /// Metadata for an event raised now.
    #[must_use]
    pub fn event_meta(&self) -> EventMeta {
        let triggering_player = (self.turn.turn > 0 && !self.players.is_empty()).then_some(self.turn.player);
        EventMeta { turn: self.turn.turn, triggering_player }
    }

    // === Features ===

    /// All features of `kind`, in id order.
    pub fn features_of_kind(&self, kind: FeatureKind) -> impl Iterator<Item = &Feature> {
        self.board.features_of(kind)
    }

    #[must_use]
    pub fn feature(&self, id: FeatureId) -> Option<&Feature> {
        self.board.feature(id)
    }

    #[must_use]
    pub fn feature_at(&self, place: FeaturePlace) -> Option<&Feature> {
        self.board.feature_at(place)
    }

    /// Features a tile at `position` belongs to, plus neighbouring cloisters.
    #[must_use]
    pub fn features_touching(&self, position: Position) -> smallvec::SmallVec<[FeatureId; 8]> {
        self.board.features_touching(position)
    }

    /// Completed features of `kind`, plus every capability's bonus.
    #[must_use]
    pub fn completed_feature_count(&self, kind: FeatureKind) -> usize {
        let completed = self
            .features_of_kind(kind)
            .filter(|f| f.is_completed(&self.board))
            .count();
        completed + self.registry.completed_count_bonus(kind)
    }

    // === Capability sub-state ===

    /// Raw slot of a capability.
    #[must_use]
    pub fn capability_state(&self, id: CapabilityId) -> Option<&CapabilityState> {
        self.capabilities.get(&id)
    }

    /// Typed sub-state of the capability owning `S`.
    ///
    /// Sub-states are readable from anywhere but only written by the
    /// capability hooks inside this crate:
    ///
    /// ```
    /// use rust_tiles::capability::{CapabilityId, WindRoseState};
    /// use rust_tiles::core::{GameConfig, GameState};
    ///
    /// let config = GameConfig::new(["ada"]).with_capability(CapabilityId::WindRose);
    /// let state = GameState::new(&config).unwrap();
    /// assert_eq!(state.sub_state::<WindRoseState>(), Some(&WindRoseState::default()));
    /// ```
    ///
    /// ```compile_fail
    /// use rust_tiles::capability::{CapabilityId, WindRoseState};
    /// use rust_tiles::core::{GameConfig, GameState};
    ///
    /// let config = GameConfig::new(["ada"]).with_capability(CapabilityId::WindRose);
    /// let state = GameState::new(&config).unwrap();
    /// let _ = state.with_sub_state(WindRoseState { origin: None });
    /// ```
    #[must_use]
    pub fn sub_state<S: SubState>(&self) -> Option<&S> {
        self.capabilities.get(&S::OWNER).and_then(S::from_slot)
    }

    /// Replace the sub-state of the capability owning `S`.
    ///
    /// Returns the state unchanged if that capability is not active.
    #[must_use]
    pub(crate) fn with_sub_state<S: SubState>(&self, sub_state: S) -> Self {
        if !self.capabilities.contains_key(&S::OWNER) {
            return self.clone();
        }
        self.derive(|s| {
            s.capabilities.insert(S::OWNER, sub_state.into_slot());
        })
    }

    // === Events ===

    /// Append an event to the log.
    #[must_use]
    pub fn append_event(&self, event: GameEvent) -> Self {
        self.derive(|s| s.events.append(event))
    }

    // === Crate-internal mutation (only inside `derive`) ===

    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub(crate) fn players_mut(&mut self) -> &mut PlayersState {
        &mut self.players
    }

    pub(crate) fn events_mut(&mut self) -> &mut EventLog {
        &mut self.events
    }

    pub(crate) fn turn_mut(&mut self) -> &mut TurnState {
        &mut self.turn
    }

    pub(crate) fn bag_mut(&mut self) -> &mut Vector<TileKind> {
        &mut self.bag
    }

    pub(crate) fn history_mut(&mut self) -> &mut Vector<ActionRecord> {
        &mut self.history
    }
}

impl fmt::Debug for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameState")
            .field("version", &self.version)
            .field("capabilities", &self.registry.ids())
            .field("tiles", &self.board.len())
            .field("turn", &self.turn)
            .field("bag", &self.bag.len())
            .field("events", &self.events.len())
            .finish()
    }
}

/// Structural equality. The version and the registry instance are ignored;
/// registries compare by their ids.
impl PartialEq for GameState {
    fn eq(&self, other: &Self) -> bool {
        self.registry.ids() == other.registry.ids()
            && self.board == other.board
            && self.players == other.players
            && self.capabilities == other.capabilities
            && self.events == other.events
            && self.turn == other.turn
            && self.bag == other.bag
            && self.history == other.history
    }
}

impl Eq for GameState {}

impl From<GameState> for Snapshot {
    fn from(state: GameState) -> Self {
        Snapshot {
            capabilities: state.registry.ids(),
            board: state.board,
            players: state.players,
            capability_states: state.capabilities,
            events: state.events,
            turn: state.turn,
            bag: state.bag,
            history: state.history,
        }
    }
}

impl From<Snapshot> for GameState {
    fn from(snapshot: Snapshot) -> Self {
        Self {
            version: StateVersion::next(),
            registry: Arc::new(CapabilityRegistry::from_ids(&snapshot.capabilities)),
            board: snapshot.board,
            players: snapshot.players,
            capabilities: snapshot.capability_states,
            events: snapshot.events,
            turn: snapshot.turn,
            bag: snapshot.bag,
            history: snapshot.history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::WindRoseState;

    fn config() -> GameConfig {
        GameConfig::new(["ada", "brin"]).with_seed(11)
    }

    #[test]
    fn test_new_state() {
        let state = GameState::new(&config()).unwrap();

        assert_eq!(state.board().len(), 1);
        assert_eq!(state.turn().turn, 1);
        assert_eq!(state.current_player(), PlayerId::new(0));
        assert!(state.current_tile().is_some());
        // 70 tiles minus the start tile minus the one drawn.
        assert_eq!(state.bag().len(), 68);
        assert!(!state.is_game_over());
        assert_eq!(state.events().len(), 1);
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let none: [&str; 0] = [];
        assert!(matches!(
            GameState::new(&GameConfig::new(none)),
            Err(ConfigError::PlayerCount(0))
        ));
    }

    #[test]
    fn test_same_seed_same_bag() {
        let a = GameState::new(&config()).unwrap();
        let b = GameState::new(&config()).unwrap();
        let c = GameState::new(&config().with_seed(12)).unwrap();

        assert_eq!(a, b);
        assert_ne!(a.version(), b.version());
        assert_ne!(a.bag(), c.bag());
    }

    #[test]
    fn test_tile_sequence_is_not_shuffled() {
        let tiles = [TileKind::CurveRoad, TileKind::Cloister, TileKind::CityCap];
        let state = GameState::new(&config().with_tile_sequence(tiles)).unwrap();

        assert_eq!(state.current_tile(), Some(TileKind::CurveRoad));
        assert_eq!(state.bag().iter().copied().collect::<Vec<_>>(), tiles[1..].to_vec());
    }

    #[test]
    fn test_clone_keeps_version_derive_does_not() {
        let state = GameState::new(&config()).unwrap();
        assert_eq!(state.clone().version(), state.version());

        let derived = state.append_event(GameEvent::new(state.event_meta(), EventKind::GameOver));
        assert_ne!(derived.version(), state.version());
        assert_eq!(state.events().len(), 1);
        assert_eq!(derived.events().len(), 2);
    }

    #[test]
    fn test_sub_state_slots() {
        let plain = GameState::new(&config()).unwrap();
        assert!(plain.sub_state::<WindRoseState>().is_none());
        let unchanged = plain.with_sub_state(WindRoseState { origin: Some(Position::new(1, 1)) });
        assert_eq!(unchanged.version(), plain.version());

        let roses = GameState::new(&config().with_capability(CapabilityId::WindRose)).unwrap();
        assert_eq!(roses.sub_state::<WindRoseState>(), Some(&WindRoseState::default()));

        let moved = roses.with_sub_state(WindRoseState { origin: Some(Position::new(2, 0)) });
        assert_eq!(moved.sub_state::<WindRoseState>().unwrap().origin, Some(Position::new(2, 0)));
        assert_eq!(roses.sub_state::<WindRoseState>().unwrap().origin, None);
    }

    #[test]
    fn test_zero_capabilities_count() {
        let state = GameState::new(&config()).unwrap();
        assert_eq!(state.completed_feature_count(FeatureKind::City), 0);

        let counted = GameState::new(&config().with_capability(CapabilityId::Count)).unwrap();
        assert_eq!(counted.completed_feature_count(FeatureKind::City), 1);
    }
}
