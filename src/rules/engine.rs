//! Rules engine trait.
//!
//! A rules engine defines:
//! - what placements and actions are legal
//! - how an action turns one snapshot into the next
//! - when the game is over and who won

use crate::board::{Position, Rotation};
use crate::core::{Action, ActionError, GameState, PlayerId};

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Draw (no players to rank).
    Draw,
    /// Shared victory on equal points.
    Winners(Vec<PlayerId>),
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Winners(ps) => ps.contains(&player),
            GameResult::Draw => false,
        }
    }

    /// Result from final totals: the highest total wins, ties share.
    #[must_use]
    pub fn from_totals(totals: impl IntoIterator<Item = (PlayerId, i64)>) -> Self {
        let totals: Vec<_> = totals.into_iter().collect();
        let Some(best) = totals.iter().map(|&(_, t)| t).max() else {
            return GameResult::Draw;
        };
        let mut winners: Vec<_> = totals.into_iter().filter(|&(_, t)| t == best).map(|(p, _)| p).collect();
        if winners.len() == 1 {
            GameResult::Winner(winners.remove(0))
        } else {
            GameResult::Winners(winners)
        }
    }
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `legal_placements`: empty when `player` cannot act
/// - `legal_followers`: segments of the drawn tile a follower may take
///   after placing it as given
/// - `apply_action`: pure and deterministic; a rejected action leaves no
///   trace
/// - `is_terminal`: `None` while the game continues
pub trait RulesEngine {
    /// Where `player` may put the drawn tile.
    fn legal_placements(&self, state: &GameState, player: PlayerId) -> Vec<(Position, Rotation)>;

    /// Segments of the drawn tile, placed at `position` with `rotation`,
    /// that `player` may deploy a follower on.
    fn legal_followers(
        &self,
        state: &GameState,
        player: PlayerId,
        position: Position,
        rotation: Rotation,
    ) -> Vec<u8>;

    /// Apply an action, producing the next snapshot.
    fn apply_action(&self, state: &GameState, player: PlayerId, action: &Action) -> Result<GameState, ActionError>;

    /// Check if the game is over.
    fn is_terminal(&self, state: &GameState) -> Option<GameResult>;

    // === Convenience Methods ===

    /// Enumerate every legal action for a player: each placement without a
    /// follower, then with a follower on each allowed segment.
    fn legal_actions(&self, state: &GameState, player: PlayerId) -> Vec<Action> {
        let mut actions = Vec::new();

        for (position, rotation) in self.legal_placements(state, player) {
            let plain = Action::place(position, rotation);
            for segment in self.legal_followers(state, player, position, rotation) {
                actions.push(plain.clone().with_follower(segment));
            }
            actions.push(plain);
        }

        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_result_is_winner() {
        let result = GameResult::Winner(PlayerId::new(1));
        assert!(!result.is_winner(PlayerId::new(0)));
        assert!(result.is_winner(PlayerId::new(1)));

        let draw = GameResult::Draw;
        assert!(!draw.is_winner(PlayerId::new(0)));

        let shared = GameResult::Winners(vec![PlayerId::new(0), PlayerId::new(2)]);
        assert!(shared.is_winner(PlayerId::new(0)));
        assert!(!shared.is_winner(PlayerId::new(1)));
        assert!(shared.is_winner(PlayerId::new(2)));
    }

    #[test]
    fn test_from_totals() {
        let (a, b, c) = (PlayerId::new(0), PlayerId::new(1), PlayerId::new(2));
        assert_eq!(GameResult::from_totals([(a, 3), (b, 9), (c, 4)]), GameResult::Winner(b));
        assert_eq!(GameResult::from_totals([(a, 9), (b, 9), (c, 4)]), GameResult::Winners(vec![a, b]));
        assert_eq!(GameResult::from_totals([]), GameResult::Draw);
    }
}
