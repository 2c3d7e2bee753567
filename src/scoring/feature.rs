use crate::board::{Board, Feature, FeatureId, FeatureKind};
use crate::core::{GameState, PointCategory};
use crate::reducers::{AddPoints, Reducer};

/// Points a feature is worth under the base rules.
///
/// | kind     | completed                  | unfinished at game end    |
/// |----------|----------------------------|---------------------------|
/// | road     | 1 per tile                 | 1 per tile                |
/// | city     | 2 per tile and per pennant | 1 per tile and pennant    |
/// | cloister | 9                          | 1 + surrounding tiles     |
/// | farm     | n/a                        | 3 per completed city      |
#[must_use]
pub fn base_points(board: &Board, feature: &Feature, completed: bool) -> i64 {
    let size = feature.size() as i64;
    match feature.kind {
        FeatureKind::Road => size,
        FeatureKind::City => {
            let per_unit = if completed { 2 } else { 1 };
            per_unit * (size + feature.pennants(board) as i64)
        }
        FeatureKind::Cloister => {
            let neighbors = feature
                .positions()
                .next()
                .map_or(0, |p| p.surrounding().iter().filter(|q| board.tile(**q).is_some()).count());
            1 + neighbors as i64
        }
        FeatureKind::Farm => 3 * feature.adjoining_completed_cities(board).len() as i64,
    }
}

/// Points a feature is worth after every capability's adjustment.
#[must_use]
pub fn feature_value(state: &GameState, feature: &Feature, completed: bool) -> i64 {
    let base = base_points(state.board(), feature, completed);
    state.registry().feature_points(state, feature, completed, base)
}

fn category(kind: FeatureKind) -> PointCategory {
    match kind {
        FeatureKind::Road => PointCategory::Road,
        FeatureKind::City => PointCategory::City,
        FeatureKind::Cloister => PointCategory::Cloister,
        FeatureKind::Farm => PointCategory::Farm,
    }
}

/// Award a feature's points to the players with the most followers on it.
/// Tied players each get the full value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreFeature {
    pub feature: FeatureId,
    pub completed: bool,
}

impl Reducer for ScoreFeature {
    fn apply(&self, state: &GameState) -> GameState {
        let Some(feature) = state.feature(self.feature) else {
            return state.clone();
        };
        let owners = state.players().majority_owners(&feature.places);
        if owners.is_empty() {
            return state.clone();
        }

        let points = feature_value(state, feature, self.completed);
        let category = category(feature.kind);
        owners.into_iter().fold(state.clone(), |state, player| {
            AddPoints::new(player, points, category)
                .from_feature(self.feature)
                .apply(&state)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{FeaturePlace, PlacedTile, Position, Rotation, TileKind};

    fn board(tiles: &[(TileKind, i32, i32, Rotation)]) -> Board {
        tiles.iter().fold(Board::new(), |b, &(kind, x, y, rotation)| {
            b.with_tile(PlacedTile::new(kind, Position::new(x, y), rotation))
        })
    }

    fn at(board: &Board, x: i32, y: i32, segment: u8) -> Feature {
        board.feature_at(FeaturePlace::new(Position::new(x, y), segment)).unwrap().clone()
    }

    #[test]
    fn test_city_points() {
        let b = board(&[
            (TileKind::CityCap, 0, 0, Rotation::R0),
            (TileKind::CityCornerPennant, 0, -1, Rotation::R180),
        ]);
        // Corner rotated 180 reaches south and east; only the south side is closed.
        let city = at(&b, 0, 0, 0);
        assert!(!city.is_completed(&b));
        assert_eq!(base_points(&b, &city, false), 3);
        assert_eq!(base_points(&b, &city, true), 6);
    }

    #[test]
    fn test_cloister_points() {
        let b = board(&[
            (TileKind::Cloister, 0, 0, Rotation::R0),
            (TileKind::Cloister, 1, 0, Rotation::R0),
            (TileKind::Cloister, 1, 1, Rotation::R0),
        ]);
        let cloister = at(&b, 0, 0, 0);
        assert_eq!(base_points(&b, &cloister, false), 3);
    }

    #[test]
    fn test_farm_points_count_completed_cities() {
        let b = board(&[
            (TileKind::CityCap, 0, 0, Rotation::R0),
            (TileKind::CityCap, 0, -1, Rotation::R180),
        ]);
        let farm = at(&b, 0, 0, 1);
        assert_eq!(farm.kind, FeatureKind::Farm);
        assert_eq!(base_points(&b, &farm, false), 3);

        let open = board(&[(TileKind::CityCap, 0, 0, Rotation::R0)]);
        assert_eq!(base_points(&open, &at(&open, 0, 0, 1), false), 0);
    }

    #[test]
    fn test_road_points() {
        let b = board(&[
            (TileKind::StraightRoad, 0, 0, Rotation::R0),
            (TileKind::StraightRoad, 0, 1, Rotation::R0),
        ]);
        assert_eq!(base_points(&b, &at(&b, 0, 0, 0), false), 2);
    }
}
