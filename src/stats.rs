//! End-of-game summary for display and logging.

use im::OrdMap;
use serde::Serialize;

use crate::capability::KingAndRobberBaron;
use crate::core::{EventKind, GameState, PlayerId, PointCategory};

/// One row of the summary table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerSummary {
    pub player: PlayerId,
    pub nickname: String,

    /// `"1"`, or `"1 - 2"` when players share a place.
    pub rank: String,

    pub total: i64,

    /// Tiles this player placed (the start tile belongs to nobody).
    pub tiles_placed: u32,

    pub points: OrdMap<PointCategory, i64>,

    /// Share of the total thinking time, in percent.
    pub clock_share: Option<f64>,
}

/// Standings of a game, best first.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameSummary {
    pub players: Vec<PlayerSummary>,
    pub turns: u32,
    pub tiles_on_board: usize,
    pub biggest_city: Option<usize>,
    pub longest_road: Option<usize>,
}

impl GameSummary {
    /// Summarize `state`. Players are ordered by total points, then by
    /// nickname ignoring case.
    #[must_use]
    pub fn new(state: &GameState) -> Self {
        let players = state.players();

        let mut tiles_placed: OrdMap<PlayerId, u32> = OrdMap::new();
        for event in state.events().iter() {
            if let (EventKind::TilePlaced { .. }, Some(player)) = (&event.kind, event.meta.triggering_player) {
                *tiles_placed.entry(player).or_insert(0) += 1;
            }
        }

        let mut rows: Vec<PlayerSummary> = players
            .iter()
            .map(|p| PlayerSummary {
                player: p.id,
                nickname: p.nickname.clone(),
                rank: String::new(),
                total: players.total(p.id),
                tiles_placed: tiles_placed.get(&p.id).copied().unwrap_or(0),
                points: players.points_by_category(p.id),
                clock_share: None,
            })
            .collect();
        rows.sort_by(|a, b| {
            b.total
                .cmp(&a.total)
                .then_with(|| a.nickname.to_lowercase().cmp(&b.nickname.to_lowercase()))
        });

        let mut start = 0;
        while start < rows.len() {
            let total = rows[start].total;
            let end = rows[start..].iter().take_while(|r| r.total == total).count() + start;
            let rank = if end - start == 1 {
                (start + 1).to_string()
            } else {
                format!("{} - {}", start + 1, end)
            };
            for row in &mut rows[start..end] {
                row.rank = rank.clone();
            }
            start = end;
        }

        let king = state.registry().find::<KingAndRobberBaron>();
        Self {
            players: rows,
            turns: state.turn().turn,
            tiles_on_board: state.board().len(),
            biggest_city: king.map(|k| k.biggest_city_size(state)),
            longest_road: king.map(|k| k.longest_road_size(state)),
        }
    }

    /// Fill in clock shares from milliseconds spent per player, indexed by
    /// seat. Missing entries count as zero.
    #[must_use]
    pub fn with_clocks(mut self, millis: &[u64]) -> Self {
        let total: u64 = millis.iter().sum();
        for row in &mut self.players {
            let spent = millis.get(row.player.index()).copied().unwrap_or(0);
            row.clock_share = clock_share(spent, total);
        }
        self
    }

    #[must_use]
    pub fn winner(&self) -> Option<&PlayerSummary> {
        self.players.first().filter(|p| p.rank == "1")
    }
}

/// `spent` as a percentage of `total`; `None` when no time was recorded.
#[must_use]
pub fn clock_share(spent: u64, total: u64) -> Option<f64> {
    (total > 0).then(|| spent as f64 * 100.0 / total as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;
    use crate::reducers::{AddPoints, Reducer};

    fn state() -> GameState {
        GameState::new(&GameConfig::new(["cleo", "Bram", "ada"]).with_seed(5)).unwrap()
    }

    #[test]
    fn test_ranks_and_order() {
        let state = state();
        let (cleo, bram, ada) = (PlayerId::new(0), PlayerId::new(1), PlayerId::new(2));
        let state = AddPoints::new(cleo, 5, PointCategory::City).apply(&state);
        let state = AddPoints::new(ada, 5, PointCategory::Road).apply(&state);
        let state = AddPoints::new(bram, 2, PointCategory::Farm).apply(&state);

        let summary = GameSummary::new(&state);
        let order: Vec<_> = summary.players.iter().map(|p| (p.nickname.as_str(), p.rank.as_str())).collect();
        assert_eq!(order, vec![("ada", "1 - 2"), ("cleo", "1 - 2"), ("Bram", "3")]);
        assert!(summary.winner().is_none());
        assert_eq!(summary.players[0].points.get(&PointCategory::Road), Some(&5));
        assert_eq!(summary.biggest_city, None);
    }

    #[test]
    fn test_single_winner() {
        let state = AddPoints::new(PlayerId::new(1), 1, PointCategory::Road).apply(&state());
        let summary = GameSummary::new(&state);
        assert_eq!(summary.winner().map(|p| p.nickname.as_str()), Some("Bram"));
        assert_eq!(summary.players[1].rank, "2 - 3");
    }

    #[test]
    fn test_clock_share() {
        let summary = GameSummary::new(&state()).with_clocks(&[300, 100, 600]);
        let share = |name: &str| summary.players.iter().find(|p| p.nickname == name).and_then(|p| p.clock_share);
        assert_eq!(share("cleo"), Some(30.0));
        assert_eq!(share("Bram"), Some(10.0));
        assert_eq!(share("ada"), Some(60.0));

        let idle = GameSummary::new(&state()).with_clocks(&[0, 0, 0]);
        assert!(idle.players.iter().all(|p| p.clock_share.is_none()));
        assert_eq!(clock_share(0, 0), None);
    }

    #[test]
    fn test_start_tile_is_nobodys() {
        let summary = GameSummary::new(&state());
        assert!(summary.players.iter().all(|p| p.tiles_placed == 0));
        assert_eq!(summary.tiles_on_board, 1);
    }
}
