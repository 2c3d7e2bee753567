//! Scoring: feature values and the turn/final scoring pipeline.
//!
//! ## Turn scoring
//!
//! After the tile is placed and the follower (if any) deployed:
//! 1. every feature completed by the placement is scored by its majority
//!    owners ([`ScoreFeature`])
//! 2. the capability registry folds `on_turn_scoring` over the result,
//!    receiving the full map of features completed this turn
//! 3. followers on the scored features go back to their owners
//!
//! ## Final scoring
//!
//! When the bag is exhausted: incomplete features with followers and all
//! farms are scored, then `on_final_scoring` is folded once, then the game
//! is marked over.

mod feature;
mod pipeline;

pub use feature::{base_points, feature_value, ScoreFeature};
pub use pipeline::{completed_by, score_final, score_turn};

use im::OrdMap;

use crate::board::FeatureId;

/// Features completed this turn, each with the reducer that scores it.
pub type CompletedFeatures = OrdMap<FeatureId, ScoreFeature>;
