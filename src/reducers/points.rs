use crate::board::FeatureId;
use crate::capability::Token;
use crate::core::{EventKind, GameEvent, GameState, PlayerId, PointCategory};

use super::Reducer;

/// Add points to a player's category total and log a `PointsAdded` event.
///
/// Zero and negative amounts are applied as given.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddPoints {
    pub player: PlayerId,
    pub amount: i64,
    pub category: PointCategory,
    pub source: Option<FeatureId>,
}

impl AddPoints {
    #[must_use]
    pub fn new(player: PlayerId, amount: i64, category: PointCategory) -> Self {
        Self { player, amount, category, source: None }
    }

    /// Attribute the points to a feature (builder pattern).
    #[must_use]
    pub fn from_feature(mut self, feature: FeatureId) -> Self {
        self.source = Some(feature);
        self
    }
}

impl Reducer for AddPoints {
    fn apply(&self, state: &GameState) -> GameState {
        state.derive(|s| {
            let meta = s.event_meta();
            s.players_mut().add_points(self.player, self.amount, self.category);
            s.events_mut().append(GameEvent::new(
                meta,
                EventKind::PointsAdded {
                    player: self.player,
                    points: self.amount,
                    category: self.category,
                    source: self.source,
                },
            ));
        })
    }
}

/// Overwrite a player's count of one token kind. Logs nothing; callers
/// append `TokenReceived` when a transfer should be visible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetTokenCount {
    pub player: PlayerId,
    pub token: Token,
    pub count: u32,
}

impl Reducer for SetTokenCount {
    fn apply(&self, state: &GameState) -> GameState {
        state.derive(|s| s.players_mut().set_token_count(self.player, self.token, self.count))
    }
}
