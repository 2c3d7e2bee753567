//! Rules engine.
//!
//! `RulesEngine` defines:
//! - Legal placements and actions for each snapshot
//! - How an action turns one snapshot into the next
//! - When the game is over and who won
//!
//! `StandardRules` runs the base turn and leaves every variation to the
//! capabilities registered in the state.

pub mod engine;
pub mod standard;
pub mod turn;

pub use engine::{GameResult, RulesEngine};
pub use standard::StandardRules;
