//! The standard turn: place the drawn tile, maybe deploy a follower, score.

use tracing::debug;

use super::engine::{GameResult, RulesEngine};
use super::turn;
use crate::board::{FeaturePlace, PlacedTile, Position, Rotation};
use crate::core::{Action, ActionError, ActionRecord, GameState, Placement, PlayerId};
use crate::reducers::{DeployFollower, PlaceTile, Reducer};
use crate::scoring::score_turn;

/// Base rules plus whatever capabilities the state carries.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardRules;

impl StandardRules {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Everything that can reject `action`, checked before any reducer runs.
    fn validate(
        &self,
        state: &GameState,
        player: PlayerId,
        position: Position,
        rotation: Rotation,
        follower: Option<u8>,
    ) -> Result<(PlacedTile, Option<FeaturePlace>), ActionError> {
        if state.is_game_over() {
            return Err(ActionError::GameOver);
        }
        let expected = state.current_player();
        if player != expected {
            return Err(ActionError::NotYourTurn { expected, actual: player });
        }
        let kind = state.current_tile().ok_or(ActionError::NoTileToPlace)?;

        state.board().check_placement(kind, position, rotation)?;
        state
            .registry()
            .validate_placement(state, &Placement { player, tile: kind, position, rotation })?;

        let tile = PlacedTile::new(kind, position, rotation);
        let place = follower
            .map(|segment| turn::check_follower(state, player, tile, segment))
            .transpose()?;
        Ok((tile, place))
    }

    /// Re-apply recorded actions on top of `state`.
    pub fn replay<'a>(
        &self,
        state: &GameState,
        records: impl IntoIterator<Item = &'a ActionRecord>,
    ) -> Result<GameState, ActionError> {
        records
            .into_iter()
            .try_fold(state.clone(), |state, record| self.apply_action(&state, record.player, &record.action))
    }
}

impl RulesEngine for StandardRules {
    fn legal_placements(&self, state: &GameState, player: PlayerId) -> Vec<(Position, Rotation)> {
        if state.is_game_over() || player != state.current_player() {
            return Vec::new();
        }
        state
            .current_tile()
            .map(|kind| turn::legal_placements(state, kind))
            .unwrap_or_default()
    }

    fn legal_followers(
        &self,
        state: &GameState,
        player: PlayerId,
        position: Position,
        rotation: Rotation,
    ) -> Vec<u8> {
        if state.is_game_over() || player != state.current_player() {
            return Vec::new();
        }
        let Some(kind) = state.current_tile() else {
            return Vec::new();
        };
        let tile = PlacedTile::new(kind, position, rotation);
        (0..tile.segment_count())
            .filter(|&segment| turn::check_follower(state, player, tile, segment).is_ok())
            .collect()
    }

    fn apply_action(&self, state: &GameState, player: PlayerId, action: &Action) -> Result<GameState, ActionError> {
        let Action::PlaceTile { position, rotation, follower } = *action;
        let (tile, place) = self.validate(state, player, position, rotation, follower)?;
        let turn_number = state.turn().turn;
        debug!(turn = turn_number, %player, tile = ?tile.kind, %position, ?rotation, ?follower, "apply action");

        let next = PlaceTile { tile }.apply(state);
        let next = next.registry().run_tile_placed(&next, &tile);
        let next = match place {
            Some(place) => DeployFollower { player, place }.apply(&next),
            None => next,
        };
        let next = score_turn(&next, position);
        let next = next.derive(|s| {
            s.history_mut()
                .push_back(ActionRecord::new(player, action.clone(), turn_number));
        });

        Ok(turn::end_turn(&next))
    }

    fn is_terminal(&self, state: &GameState) -> Option<GameResult> {
        if !state.is_game_over() {
            return None;
        }
        let players = state.players();
        Some(GameResult::from_totals(players.ids().map(|p| (p, players.total(p)))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Side, TileKind};
    use crate::capability::CapabilityId;
    use crate::core::{EventKind, GameConfig, PointCategory};

    fn state(tiles: impl IntoIterator<Item = TileKind>) -> GameState {
        GameState::new(&GameConfig::new(["a", "b"]).with_tile_sequence(tiles)).unwrap()
    }

    #[test]
    fn test_rejections_leave_state_untouched() {
        let rules = StandardRules::new();
        let state = state([TileKind::CityCap]);
        let (a, b) = (PlayerId::new(0), PlayerId::new(1));
        let north = Position::new(0, -1);

        let cases = [
            (b, Action::place(north, Rotation::R180), ActionError::NotYourTurn { expected: a, actual: b }),
            (a, Action::place(Position::ORIGIN, Rotation::R0), ActionError::Occupied(Position::ORIGIN)),
            (a, Action::place(Position::new(5, 5), Rotation::R0), ActionError::NotAdjacent(Position::new(5, 5))),
            (
                a,
                Action::place(north, Rotation::R0),
                ActionError::EdgeMismatch { position: north, side: Side::South },
            ),
            (
                a,
                Action::place(north, Rotation::R180).with_follower(7),
                ActionError::NoSuchSegment { tile: TileKind::CityCap, segment: 7 },
            ),
        ];
        for (player, action, expected) in cases {
            assert_eq!(rules.apply_action(&state, player, &action), Err(expected));
        }
        assert_eq!(state.board().len(), 1);
        assert_eq!(state.events().len(), 1);
    }

    #[test]
    fn test_full_turn() {
        let rules = StandardRules::new();
        let state = state([TileKind::CityCap, TileKind::CurveRoad]);
        let a = PlayerId::new(0);

        let action = Action::place(Position::new(0, -1), Rotation::R180).with_follower(0);
        let next = rules.apply_action(&state, a, &action).unwrap();

        assert_eq!(next.players().points(a, PointCategory::City), 4);
        assert_eq!(next.players().supply(a), 7);
        assert_eq!(next.current_player(), PlayerId::new(1));
        assert_eq!(next.current_tile(), Some(TileKind::CurveRoad));
        assert_eq!(next.history().len(), 1);
        assert_eq!(rules.is_terminal(&next), None);

        let kinds: Vec<_> = next.events().since(1).map(|e| e.kind.clone()).collect();
        assert!(matches!(kinds[0], EventKind::TilePlaced { tile: TileKind::CityCap, .. }));
        assert!(matches!(kinds[1], EventKind::FollowerDeployed { player, .. } if player == a));
        assert!(matches!(kinds[2], EventKind::PointsAdded { points: 4, .. }));
        assert!(matches!(kinds[3], EventKind::FollowerReturned { .. }));
        assert_eq!(kinds.len(), 4);
    }

    #[test]
    fn test_last_tile_ends_game() {
        let rules = StandardRules::new();
        let state = state([TileKind::CityCap]);
        let a = PlayerId::new(0);

        let action = Action::place(Position::new(0, -1), Rotation::R180);
        let over = rules.apply_action(&state, a, &action).unwrap();

        assert!(over.is_game_over());
        // Nobody had a follower out, so nobody scored.
        assert_eq!(rules.is_terminal(&over), Some(GameResult::Winners(vec![a, PlayerId::new(1)])));
        assert_eq!(rules.apply_action(&over, PlayerId::new(1), &action), Err(ActionError::GameOver));
        assert!(rules.legal_actions(&over, PlayerId::new(1)).is_empty());
    }

    #[test]
    fn test_legal_actions_include_followers() {
        let rules = StandardRules::new();
        let state = state([TileKind::CityCap]);
        let a = PlayerId::new(0);

        let actions = rules.legal_actions(&state, a);
        assert!(actions.contains(&Action::place(Position::new(0, -1), Rotation::R180)));
        assert!(actions.contains(&Action::place(Position::new(0, -1), Rotation::R180).with_follower(0)));
        assert!(rules.legal_actions(&state, PlayerId::new(1)).is_empty());

        for action in &actions {
            assert!(rules.apply_action(&state, a, action).is_ok(), "{:?}", action);
        }
    }

    #[test]
    fn test_legal_followers_only_for_turn_player() {
        let rules = StandardRules::new();
        let state = state([TileKind::CityCap]);
        let (a, b) = (PlayerId::new(0), PlayerId::new(1));
        let north = Position::new(0, -1);

        assert_eq!(rules.legal_followers(&state, a, north, Rotation::R180), vec![0, 1]);
        assert!(rules.legal_followers(&state, b, north, Rotation::R180).is_empty());

        let over = rules.apply_action(&state, a, &Action::place(north, Rotation::R180)).unwrap();
        assert!(over.is_game_over());
        for player in [a, b] {
            assert!(rules.legal_followers(&over, player, north, Rotation::R180).is_empty());
        }
    }

    #[test]
    fn test_cathedral_veto_is_an_action_error() {
        let rules = StandardRules::new();
        let config = GameConfig::new(["a", "b"])
            .with_capability(CapabilityId::InnsAndCathedrals)
            .with_start_tile(TileKind::CityCathedral)
            .with_tile_sequence([TileKind::CityFull, TileKind::CityCathedral]);
        let state = GameState::new(&config).unwrap();
        let (a, b) = (PlayerId::new(0), PlayerId::new(1));

        let state = rules.apply_action(&state, a, &Action::place(Position::new(1, 0), Rotation::R0)).unwrap();
        assert_eq!(state.current_tile(), Some(TileKind::CityCathedral));

        let touching = Action::place(Position::new(0, -1), Rotation::R0);
        assert!(matches!(
            rules.apply_action(&state, b, &touching),
            Err(ActionError::Forbidden { capability: CapabilityId::InnsAndCathedrals, .. })
        ));
        assert!(!rules.legal_placements(&state, b).contains(&(Position::new(0, -1), Rotation::R0)));
        assert!(rules.apply_action(&state, b, &Action::place(Position::new(2, 0), Rotation::R0)).is_ok());
    }

    #[test]
    fn test_replay_reproduces_state() {
        let rules = StandardRules::new();
        let initial = state([TileKind::CityCap, TileKind::CurveRoad, TileKind::StraightRoad]);
        let a = rules
            .apply_action(&initial, PlayerId::new(0), &Action::place(Position::new(0, -1), Rotation::R180))
            .unwrap();
        let b = rules
            .apply_action(&a, PlayerId::new(1), &rules.legal_actions(&a, PlayerId::new(1))[0])
            .unwrap();

        let replayed = rules.replay(&initial, b.history()).unwrap();
        assert_eq!(replayed, b);
    }
}
