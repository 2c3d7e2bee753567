//! Memoization tests.
//!
//! A memo answers from cache for the same snapshot (or a clone of it) and
//! recomputes for any other snapshot, however similar.

use std::sync::atomic::{AtomicUsize, Ordering};

use rust_tiles::board::{FeatureKind, Position, Rotation, TileKind};
use rust_tiles::capability::{CapabilityId, KingAndRobberBaron};
use rust_tiles::core::{Action, GameConfig, GameState, MemoStats, Memoized, PlayerId};
use rust_tiles::rules::{RulesEngine, StandardRules};

fn state() -> GameState {
    GameState::new(&GameConfig::new(["ada", "brin"]).with_seed(9)).unwrap()
}

fn completed_cities(state: &GameState) -> usize {
    state
        .features_of_kind(FeatureKind::City)
        .filter(|f| f.is_completed(state.board()))
        .count()
}

#[test]
fn test_same_snapshot_hits() {
    let memo = Memoized::new("cities", 8);
    let calls = AtomicUsize::new(0);
    let count = |s: &GameState| {
        calls.fetch_add(1, Ordering::SeqCst);
        completed_cities(s)
    };

    let state = state();
    assert_eq!(memo.get_or_compute(&state, count), 0);
    assert_eq!(memo.get_or_compute(&state, count), 0);
    assert_eq!(memo.get_or_compute(&state.clone(), count), 0);

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(memo.stats(), MemoStats { hits: 2, misses: 1 });
}

#[test]
fn test_equal_but_distinct_snapshot_recomputes() {
    let memo = Memoized::new("cities", 8);
    let calls = AtomicUsize::new(0);
    let count = |s: &GameState| {
        calls.fetch_add(1, Ordering::SeqCst);
        completed_cities(s)
    };

    let state = state();
    let reloaded = GameState::from_bytes(&state.to_bytes().unwrap()).unwrap();
    assert_eq!(state, reloaded);
    assert_ne!(state.version(), reloaded.version());

    memo.get_or_compute(&state, count);
    memo.get_or_compute(&reloaded, count);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(memo.len(), 2);
}

#[test]
fn test_capacity_bounds_the_cache() {
    let memo = Memoized::new("tiles", 1);
    let a = state();
    let b = GameState::from_bytes(&a.to_bytes().unwrap()).unwrap();

    memo.get_or_compute(&a, |s| s.board().len());
    memo.get_or_compute(&b, |s| s.board().len());
    memo.get_or_compute(&a, |s| s.board().len());

    assert_eq!(memo.len(), 1);
    assert_eq!(memo.stats(), MemoStats { hits: 0, misses: 3 });
}

#[test]
fn test_concurrent_readers_agree() {
    let memo = Memoized::new("cities", 4);
    let state = state();
    let expected = completed_cities(&state);

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..50 {
                    assert_eq!(memo.get_or_compute(&state, completed_cities), expected);
                }
            });
        }
    });

    let stats = memo.stats();
    assert_eq!(stats.hits + stats.misses, 200);
    assert!(stats.misses >= 1);
    assert_eq!(memo.len(), 1);
}

/// The king's size queries are cached inside the game's own registry.
#[test]
fn test_king_queries_share_the_registry_memo() {
    let config = GameConfig::new(["ada", "brin"])
        .with_capability(CapabilityId::KingAndRobberBaron)
        .with_tile_sequence([TileKind::CityCap, TileKind::StraightRoad]);
    let state = GameState::new(&config).unwrap();
    let next = StandardRules::new()
        .apply_action(&state, PlayerId::new(0), &Action::place(Position::new(0, -1), Rotation::R180))
        .unwrap();

    let king = next.registry().find::<KingAndRobberBaron>().unwrap();
    let before = king.memo_stats();
    assert_eq!(king.biggest_city_size(&next), 2);
    assert_eq!(king.biggest_city_size(&next), 2);
    let after = king.memo_stats();

    assert_eq!(after.misses - before.misses, 1);
    assert_eq!(after.hits - before.hits, 1);
    assert_eq!(king.biggest_city_size(&state), 0);
}
