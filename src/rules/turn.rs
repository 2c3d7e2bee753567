//! Turn lifecycle helpers shared by the rules engine and game setup.

use tracing::{debug, warn};

use crate::board::{FeaturePlace, PlacedTile, Position, Rotation, TileKind};
use crate::core::{ActionError, EventKind, GameEvent, GameState, Placement, PlayerId};
use crate::scoring::score_final;

/// Placements of `kind` that the board accepts and no capability vetoes,
/// for the current player.
#[must_use]
pub fn legal_placements(state: &GameState, kind: TileKind) -> Vec<(Position, Rotation)> {
    state
        .board()
        .legal_placements(kind)
        .into_iter()
        .filter(|&(position, rotation)| allowed(state, kind, position, rotation))
        .collect()
}

fn allowed(state: &GameState, kind: TileKind, position: Position, rotation: Rotation) -> bool {
    let placement = Placement { player: state.current_player(), tile: kind, position, rotation };
    state.registry().validate_placement(state, &placement).is_ok()
}

fn playable(state: &GameState, kind: TileKind) -> bool {
    state
        .board()
        .legal_placements(kind)
        .into_iter()
        .any(|(position, rotation)| allowed(state, kind, position, rotation))
}

/// Draw the next playable tile for the current player.
///
/// Tiles with no legal placement are discarded. When the bag runs out the
/// game ends with final scoring.
#[must_use]
pub fn draw_tile(state: &GameState) -> GameState {
    let mut state = state.clone();
    loop {
        let Some(&kind) = state.bag().front() else {
            return score_final(&state);
        };

        if playable(&state, kind) {
            debug!(turn = state.turn().turn, player = %state.current_player(), tile = ?kind, "tile drawn");
            return state.derive(|s| {
                s.bag_mut().pop_front();
                s.turn_mut().tile = Some(kind);
            });
        }

        warn!(turn = state.turn().turn, tile = ?kind, "no legal placement, tile discarded");
        state = state.derive(|s| {
            let meta = s.event_meta();
            s.bag_mut().pop_front();
            s.events_mut().append(GameEvent::new(meta, EventKind::TileDiscarded { tile: kind }));
        });
    }
}

/// Pass the turn to the next player and draw.
#[must_use]
pub fn end_turn(state: &GameState) -> GameState {
    let player_count = state.players().len();
    let next = state.derive(|s| {
        let turn = s.turn_mut();
        turn.turn += 1;
        turn.player = turn.player.next(player_count);
        turn.tile = None;
    });
    draw_tile(&next)
}

/// Check that `player` may stand a follower on `segment` of `tile`, which
/// is about to be placed. Returns the place the follower would occupy.
pub fn check_follower(
    state: &GameState,
    player: PlayerId,
    tile: PlacedTile,
    segment: u8,
) -> Result<FeaturePlace, ActionError> {
    if tile.segment(segment).is_none() {
        return Err(ActionError::NoSuchSegment { tile: tile.kind, segment });
    }
    if state.players().supply(player) == 0 {
        return Err(ActionError::NoFollowers(player));
    }

    let place = FeaturePlace::new(tile.position, segment);
    let board = state.board().with_tile(tile);
    let occupied = board
        .feature_at(place)
        .is_some_and(|f| !state.players().followers_on(&f.places).is_empty());
    if occupied {
        return Err(ActionError::FeatureOccupied(segment));
    }
    Ok(place)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::CapabilityId;
    use crate::core::GameConfig;
    use crate::reducers::{DeployFollower, Reducer};

    fn config() -> GameConfig {
        GameConfig::new(["a", "b"])
    }

    #[test]
    fn test_unplayable_tiles_are_discarded() {
        // Every free cell touches the start cathedral.
        let cathedrals = config()
            .with_capability(CapabilityId::InnsAndCathedrals)
            .with_start_tile(TileKind::CityCathedral)
            .with_tile_sequence([TileKind::CityCathedral, TileKind::CityCap]);
        let state = GameState::new(&cathedrals).unwrap();
        assert_eq!(state.current_tile(), Some(TileKind::CityCap));
        assert!(matches!(
            state.events().last().map(|e| &e.kind),
            Some(EventKind::TileDiscarded { tile: TileKind::CityCathedral })
        ));
    }

    #[test]
    fn test_empty_bag_ends_game() {
        let empty: [TileKind; 0] = [];
        let state = GameState::new(&config().with_tile_sequence(empty)).unwrap();
        assert!(state.is_game_over());
        assert_eq!(state.events().last().map(|e| &e.kind), Some(&EventKind::GameOver));
    }

    #[test]
    fn test_end_turn_rotates_players() {
        let state = GameState::new(&config().with_tile_sequence([TileKind::CityCap, TileKind::CurveRoad])).unwrap();
        let next = end_turn(&state);
        assert_eq!(next.turn().turn, 2);
        assert_eq!(next.current_player(), PlayerId::new(1));
        assert_eq!(next.current_tile(), Some(TileKind::CurveRoad));
        assert!(next.bag().is_empty());
    }

    #[test]
    fn test_check_follower() {
        let state = GameState::new(&config().with_tile_sequence([TileKind::CityCap])).unwrap();
        let p = PlayerId::new(0);
        let tile = PlacedTile::new(TileKind::CityCap, Position::new(0, -1), Rotation::R180);

        assert_eq!(check_follower(&state, p, tile, 0), Ok(FeaturePlace::new(tile.position, 0)));
        assert_eq!(
            check_follower(&state, p, tile, 9),
            Err(ActionError::NoSuchSegment { tile: TileKind::CityCap, segment: 9 })
        );

        let guarded = DeployFollower { player: PlayerId::new(1), place: FeaturePlace::new(Position::ORIGIN, 0) }
            .apply(&state);
        assert_eq!(check_follower(&guarded, p, tile, 0), Err(ActionError::FeatureOccupied(0)));
        assert!(check_follower(&guarded, p, tile, 1).is_ok());

        let broke = GameState::new(&config().with_followers(0).with_tile_sequence([TileKind::CityCap])).unwrap();
        assert_eq!(check_follower(&broke, p, tile, 0), Err(ActionError::NoFollowers(p)));
    }
}
