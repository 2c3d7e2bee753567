//! Traders: goods printed in cities.
//!
//! Completing a city hands its goods to the player who placed the closing
//! tile, whoever owned the city. At the end of the game the player with the
//! most of each goods kind scores 10 points; ties all score.

use std::any::Any;

use tracing::debug;

use super::{Capability, CapabilityId, Token};
use crate::board::{FeatureKind, Goods, TileKind, TileSet};
use crate::core::{EventKind, GameEvent, GameState, PointCategory};
use crate::reducers::{AddPoints, AppendEvent, Reducer, SetTokenCount};
use crate::scoring::CompletedFeatures;

pub const WINE: Token = Token::new(CapabilityId::TradeGoods, 0);
pub const GRAIN: Token = Token::new(CapabilityId::TradeGoods, 1);
pub const CLOTH: Token = Token::new(CapabilityId::TradeGoods, 2);

/// Points for holding the most of one goods kind.
pub const MAJORITY_POINTS: i64 = 10;

/// The token counting `goods`.
#[must_use]
pub const fn goods_token(goods: Goods) -> Token {
    match goods {
        Goods::Wine => WINE,
        Goods::Grain => GRAIN,
        Goods::Cloth => CLOTH,
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TradeGoods;

impl Capability for TradeGoods {
    fn id(&self) -> CapabilityId {
        CapabilityId::TradeGoods
    }

    fn extend_tile_set(&self, tiles: &mut TileSet) {
        tiles.add(TileKind::CityCapWine, 2);
        tiles.add(TileKind::CityTubeGrain, 2);
        tiles.add(TileKind::CityCornerCloth, 2);
        tiles.add(TileKind::CityThreeSidesWine, 1);
    }

    fn on_turn_scoring(&self, state: &GameState, completed: &CompletedFeatures) -> GameState {
        if state.players().is_empty() {
            return state.clone();
        }
        let player = state.current_player();

        completed.keys().fold(state.clone(), |state, &id| {
            let goods = state
                .feature(id)
                .filter(|f| f.kind == FeatureKind::City)
                .map(|f| f.goods(state.board()))
                .unwrap_or_default();
            goods.into_iter().fold(state, |s, (kind, count)| {
                let token = goods_token(kind);
                let total = s.players().token_count(player, token) + count;
                debug!(%player, ?kind, count, total, "goods received");

                let s = SetTokenCount { player, token, count: total }.apply(&s);
                let event = GameEvent::new(
                    s.event_meta(),
                    EventKind::TokenReceived { player, token, count, source: Some(id) },
                );
                AppendEvent(event).apply(&s)
            })
        })
    }

    fn on_final_scoring(&self, state: &GameState) -> GameState {
        Goods::ALL.into_iter().fold(state.clone(), |state, goods| {
            let token = goods_token(goods);
            let best = state
                .players()
                .ids()
                .map(|p| state.players().token_count(p, token))
                .max()
                .unwrap_or(0);
            if best == 0 {
                return state;
            }
            let leaders: Vec<_> = state
                .players()
                .ids()
                .filter(|&p| state.players().token_count(p, token) == best)
                .collect();
            leaders.into_iter().fold(state, |s, player| {
                AddPoints::new(player, MAJORITY_POINTS, PointCategory::TradeGoods).apply(&s)
            })
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{PlacedTile, Position, Rotation};
    use crate::core::{GameConfig, PlayerId};
    use crate::reducers::PlaceTile;
    use crate::scoring::completed_by;

    fn state() -> GameState {
        GameState::new(
            &GameConfig::new(["a", "b", "c"])
                .with_capability(CapabilityId::TradeGoods)
                .with_tile_sequence([TileKind::CityCapWine]),
        )
        .unwrap()
    }

    #[test]
    fn test_completing_city_hands_out_goods() {
        let state = state();
        let tile = PlacedTile::new(TileKind::CityCapWine, Position::new(0, -1), Rotation::R180);
        let placed = PlaceTile { tile }.apply(&state);
        let completed = completed_by(&placed, tile.position);

        let scored = TradeGoods.on_turn_scoring(&placed, &completed);
        let p0 = PlayerId::new(0);
        assert_eq!(scored.players().token_count(p0, WINE), 1);
        assert_eq!(scored.players().token_count(p0, GRAIN), 0);
        assert!(matches!(
            scored.events().last().map(|e| &e.kind),
            Some(EventKind::TokenReceived { token, count: 1, source: Some(_), .. }) if *token == WINE
        ));
    }

    #[test]
    fn test_majority_ties_all_score() {
        let state = state();
        let (a, b, c) = (PlayerId::new(0), PlayerId::new(1), PlayerId::new(2));
        let state = [(a, WINE, 2), (b, WINE, 2), (c, WINE, 1), (c, CLOTH, 1)]
            .into_iter()
            .fold(state, |s, (player, token, count)| SetTokenCount { player, token, count }.apply(&s));

        let scored = TradeGoods.on_final_scoring(&state);
        let points = |p| scored.players().points(p, PointCategory::TradeGoods);
        assert_eq!(points(a), 10);
        assert_eq!(points(b), 10);
        assert_eq!(points(c), 10);

        let none = TradeGoods.on_final_scoring(&GameState::new(&GameConfig::new(["x"])).unwrap());
        assert_eq!(none.players().points(PlayerId::new(0), PointCategory::TradeGoods), 0);
    }
}
