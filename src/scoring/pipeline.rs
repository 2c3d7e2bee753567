use tracing::{debug, info};

use super::{CompletedFeatures, ScoreFeature};
use crate::board::{FeatureKind, Position};
use crate::core::{EventKind, GameEvent, GameState, Phase};
use crate::reducers::{Reducer, ReturnFollowers};

/// Features completed by the tile just placed at `position`.
#[must_use]
pub fn completed_by(state: &GameState, position: Position) -> CompletedFeatures {
    let board = state.board();
    state
        .features_touching(position)
        .into_iter()
        .filter_map(|id| board.feature(id))
        .filter(|f| f.kind != FeatureKind::Farm && f.is_completed(board))
        .map(|f| (f.id, ScoreFeature { feature: f.id, completed: true }))
        .collect()
}

/// Score the features completed by the tile at `position`.
#[must_use]
pub fn score_turn(state: &GameState, position: Position) -> GameState {
    let completed = completed_by(state, position);
    debug!(turn = state.turn().turn, completed = completed.len(), "turn scoring");

    let scored = completed
        .values()
        .fold(state.clone(), |state, reducer| reducer.apply(&state));
    let scored = scored.registry().run_turn_scoring(&scored, &completed);

    completed
        .keys()
        .fold(scored, |state, &feature| ReturnFollowers { feature }.apply(&state))
}

/// Score what is left on the board and end the game.
///
/// Runs exactly once: the resulting state is in [`Phase::GameOver`], which
/// the rules engine never leaves.
#[must_use]
pub fn score_final(state: &GameState) -> GameState {
    let board = state.board();
    let pending: Vec<ScoreFeature> = board
        .features()
        .filter(|f| !f.is_completed(board))
        .filter(|f| f.kind == FeatureKind::Farm || !state.players().followers_on(&f.places).is_empty())
        .map(|f| ScoreFeature { feature: f.id, completed: false })
        .collect();
    debug!(pending = pending.len(), "final scoring");

    let scored = pending
        .iter()
        .fold(state.clone(), |state, reducer| reducer.apply(&state));
    let scored = scored.registry().run_final_scoring(&scored);

    let over = scored.derive(|s| {
        let meta = s.event_meta();
        let turn = s.turn_mut();
        turn.phase = Phase::GameOver;
        turn.tile = None;
        s.events_mut().append(GameEvent::new(meta, EventKind::GameOver));
    });

    info!(
        turn = over.turn().turn,
        tiles = over.board().len(),
        totals = ?over.players().ids().map(|p| over.players().total(p)).collect::<Vec<_>>(),
        "game over"
    );
    over
}
