//! King and Robber Baron: awards for the biggest city and the longest road.
//!
//! Whoever completes a city bigger than every city completed before holds
//! the king; the same goes for roads and the robber baron. At the end of
//! the game each holder scores one point per completed feature of the
//! award's kind, as counted by [`GameState::completed_feature_count`].

use std::any::Any;
use std::sync::Arc;

use tracing::debug;

use super::{Capability, CapabilityId, Token};
use crate::board::{FeatureId, FeatureKind};
use crate::core::{
    EventKind, GameEvent, GameState, MemoStats, Memoized, PointCategory, DEFAULT_MEMO_CAPACITY,
};
use crate::reducers::{AddPoints, AppendEvent, Reducer, SetTokenCount};
use crate::scoring::CompletedFeatures;

/// Held by the player who completed the biggest city.
pub const KING: Token = Token::new(CapabilityId::KingAndRobberBaron, 0);

/// Held by the player who completed the longest road.
pub const ROBBER: Token = Token::new(CapabilityId::KingAndRobberBaron, 1);

/// Completed features of one kind, biggest first, ties by id.
type Ranking = Arc<[(FeatureId, usize)]>;

#[derive(Clone, Copy, Debug)]
struct Award {
    kind: FeatureKind,
    token: Token,
    category: PointCategory,
}

const AWARDS: [Award; 2] = [
    Award { kind: FeatureKind::City, token: KING, category: PointCategory::BiggestCity },
    Award { kind: FeatureKind::Road, token: ROBBER, category: PointCategory::LongestRoad },
];

#[derive(Debug)]
pub struct KingAndRobberBaron {
    cities: Memoized<Ranking>,
    roads: Memoized<Ranking>,
}

impl KingAndRobberBaron {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cities: Memoized::new("completed-cities", DEFAULT_MEMO_CAPACITY),
            roads: Memoized::new("completed-roads", DEFAULT_MEMO_CAPACITY),
        }
    }

    /// Size of the biggest completed city, 0 if there is none.
    #[must_use]
    pub fn biggest_city_size(&self, state: &GameState) -> usize {
        self.ranking(state, FeatureKind::City).first().map_or(0, |&(_, size)| size)
    }

    /// Size of the longest completed road, 0 if there is none.
    #[must_use]
    pub fn longest_road_size(&self, state: &GameState) -> usize {
        self.ranking(state, FeatureKind::Road).first().map_or(0, |&(_, size)| size)
    }

    /// Combined hit/miss counters of both rankings.
    #[must_use]
    pub fn memo_stats(&self) -> MemoStats {
        let (a, b) = (self.cities.stats(), self.roads.stats());
        MemoStats { hits: a.hits + b.hits, misses: a.misses + b.misses }
    }

    fn ranking(&self, state: &GameState, kind: FeatureKind) -> Ranking {
        let memo = match kind {
            FeatureKind::Road => &self.roads,
            _ => &self.cities,
        };
        memo.get_or_compute(state, |s| {
            let mut ranking: Vec<(FeatureId, usize)> = s
                .features_of_kind(kind)
                .filter(|f| f.is_completed(s.board()))
                .map(|f| (f.id, f.size()))
                .collect();
            ranking.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
            ranking.into()
        })
    }

    fn score_award(&self, state: &GameState, award: Award, completed: &CompletedFeatures) -> GameState {
        let ranking = self.ranking(state, award.kind);
        let Some(&(source, size)) = ranking.iter().find(|(id, _)| completed.contains_key(id)) else {
            return state.clone();
        };
        let record = ranking
            .iter()
            .find(|(id, _)| !completed.contains_key(id))
            .map_or(0, |&(_, size)| size);
        if size <= record {
            return state.clone();
        }

        let winner = state.current_player();
        debug!(token = ?award.token, %winner, size, record, feature = %source, "award transferred");

        let transferred = state.players().ids().fold(state.clone(), |s, player| {
            SetTokenCount { player, token: award.token, count: u32::from(player == winner) }.apply(&s)
        });
        let event = GameEvent::new(
            transferred.event_meta(),
            EventKind::TokenReceived { player: winner, token: award.token, count: 1, source: Some(source) },
        );
        AppendEvent(event).apply(&transferred)
    }
}

impl Default for KingAndRobberBaron {
    fn default() -> Self {
        Self::new()
    }
}

impl Capability for KingAndRobberBaron {
    fn id(&self) -> CapabilityId {
        CapabilityId::KingAndRobberBaron
    }

    fn on_turn_scoring(&self, state: &GameState, completed: &CompletedFeatures) -> GameState {
        if state.players().is_empty() {
            return state.clone();
        }
        AWARDS
            .into_iter()
            .fold(state.clone(), |state, award| self.score_award(&state, award, completed))
    }

    fn on_final_scoring(&self, state: &GameState) -> GameState {
        AWARDS.into_iter().fold(state.clone(), |state, award| {
            let points = state.completed_feature_count(award.kind) as i64;
            let holders: Vec<_> = state.players().holders(award.token).collect();
            holders.into_iter().fold(state, |s, player| {
                AddPoints::new(player, points, award.category).apply(&s)
            })
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
