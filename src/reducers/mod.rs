//! Reducers: pure state-transition primitives.
//!
//! A reducer describes one change ("add 4 city points to player 1") and
//! applies it to a snapshot, returning the next snapshot. Reducers never
//! fail; validation happens before any of them runs. Those that represent
//! something a player should see also append the matching event.

mod placement;
mod points;

pub use placement::{DeployFollower, PlaceTile, ReturnFollowers};
pub use points::{AddPoints, SetTokenCount};

use crate::core::{GameEvent, GameState};

/// A pure state transition.
pub trait Reducer {
    fn apply(&self, state: &GameState) -> GameState;
}

/// Append an arbitrary event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppendEvent(pub GameEvent);

impl Reducer for AppendEvent {
    fn apply(&self, state: &GameState) -> GameState {
        state.append_event(self.0.clone())
    }
}

/// Apply reducers left to right.
#[must_use]
pub fn apply_all<'a>(state: &GameState, reducers: impl IntoIterator<Item = &'a dyn Reducer>) -> GameState {
    reducers
        .into_iter()
        .fold(state.clone(), |state, reducer| reducer.apply(&state))
}
