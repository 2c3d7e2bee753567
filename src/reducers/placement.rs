use crate::board::{FeatureId, FeaturePlace, PlacedTile};
use crate::core::{EventKind, GameEvent, GameState, PlayerId};

use super::Reducer;

/// Put the drawn tile on the board, merge its features, and clear the
/// drawn tile from the turn marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaceTile {
    pub tile: PlacedTile,
}

impl Reducer for PlaceTile {
    fn apply(&self, state: &GameState) -> GameState {
        let tile = self.tile;
        state.derive(|s| {
            let meta = s.event_meta();
            let board = s.board().with_tile(tile);
            *s.board_mut() = board;
            s.turn_mut().tile = None;
            s.events_mut().append(GameEvent::new(
                meta,
                EventKind::TilePlaced { tile: tile.kind, position: tile.position, rotation: tile.rotation },
            ));
        })
    }
}

/// Stand one of a player's followers on a segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeployFollower {
    pub player: PlayerId,
    pub place: FeaturePlace,
}

impl Reducer for DeployFollower {
    fn apply(&self, state: &GameState) -> GameState {
        state.derive(|s| {
            let meta = s.event_meta();
            s.players_mut().deploy(self.player, self.place);
            s.events_mut().append(GameEvent::new(
                meta,
                EventKind::FollowerDeployed { player: self.player, place: self.place },
            ));
        })
    }
}

/// Send every follower on a feature back to its owner's supply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReturnFollowers {
    pub feature: FeatureId,
}

impl Reducer for ReturnFollowers {
    fn apply(&self, state: &GameState) -> GameState {
        let Some(feature) = state.feature(self.feature) else {
            return state.clone();
        };
        let followers = state.players().followers_on(&feature.places);
        if followers.is_empty() {
            return state.clone();
        }

        state.derive(|s| {
            let meta = s.event_meta();
            for (place, player) in followers {
                s.players_mut().return_follower(place);
                s.events_mut().append(GameEvent::new(meta, EventKind::FollowerReturned { player, place }));
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Position, Rotation, TileKind};
    use crate::core::GameConfig;

    fn state() -> GameState {
        GameState::new(&GameConfig::new(["a", "b"]).with_tile_sequence([TileKind::CityCap])).unwrap()
    }

    #[test]
    fn test_place_tile_merges_and_logs() {
        let state = state();
        let tile = PlacedTile::new(TileKind::CityCap, Position::new(0, -1), Rotation::R180);
        let next = PlaceTile { tile }.apply(&state);

        assert_eq!(next.board().len(), 2);
        assert_eq!(next.current_tile(), None);
        let city = next.feature_at(FeaturePlace::new(Position::ORIGIN, 0)).unwrap();
        assert!(city.is_completed(next.board()));
        assert!(matches!(
            next.events().last().map(|e| &e.kind),
            Some(EventKind::TilePlaced { tile: TileKind::CityCap, .. })
        ));
        assert_eq!(state.board().len(), 1);
    }

    #[test]
    fn test_deploy_and_return_followers() {
        let state = state();
        let p = PlayerId::new(0);
        let place = FeaturePlace::new(Position::ORIGIN, 0);
        let city = state.feature_at(place).unwrap().id;

        let deployed = DeployFollower { player: p, place }.apply(&state);
        assert_eq!(deployed.players().follower_at(place), Some(p));
        assert_eq!(deployed.players().supply(p), 6);

        let returned = ReturnFollowers { feature: city }.apply(&deployed);
        assert_eq!(returned.players().follower_at(place), None);
        assert_eq!(returned.players().supply(p), 7);
        assert_eq!(
            returned.events().last().map(|e| &e.kind),
            Some(&EventKind::FollowerReturned { player: p, place })
        );
    }

    #[test]
    fn test_return_followers_without_followers_is_noop() {
        let state = state();
        let city = state.feature_at(FeaturePlace::new(Position::ORIGIN, 0)).unwrap().id;
        let next = ReturnFollowers { feature: city }.apply(&state);
        assert_eq!(next.version(), state.version());
    }
}
