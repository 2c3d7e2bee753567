//! Benchmarks for snapshot derivation and memoized feature queries

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_tiles::capability::{CapabilityId, KingAndRobberBaron};
use rust_tiles::core::{GameConfig, GameRng, GameState, PlayerId, PointCategory};
use rust_tiles::reducers::{AddPoints, Reducer};
use rust_tiles::rules::{RulesEngine, StandardRules};

/// A game advanced `turns` turns by seeded random play.
fn game_after(turns: usize) -> GameState {
    let rules = StandardRules::new();
    let config = GameConfig::new(["a", "b", "c"])
        .with_capability(CapabilityId::KingAndRobberBaron)
        .with_seed(42);
    let mut rng = GameRng::new(42).for_context("bench");
    let mut state = GameState::new(&config).expect("valid config");

    for _ in 0..turns {
        if rules.is_terminal(&state).is_some() {
            break;
        }
        let player = state.current_player();
        let actions = rules.legal_actions(&state, player);
        let action = rng.choose(&actions).expect("a drawn tile is always playable");
        state = rules.apply_action(&state, player, action).expect("legal action");
    }
    state
}

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");
    for turns in [10, 40] {
        let state = game_after(turns);

        group.bench_with_input(BenchmarkId::new("clone", turns), &state, |b, state| {
            b.iter(|| black_box(state.clone()))
        });

        group.bench_with_input(BenchmarkId::new("add_points", turns), &state, |b, state| {
            let reducer = AddPoints::new(PlayerId::new(0), 1, PointCategory::Road);
            b.iter(|| black_box(reducer.apply(black_box(state))))
        });
    }
    group.finish();
}

fn bench_feature_queries(c: &mut Criterion) {
    let state = game_after(40);
    let king = state
        .registry()
        .find::<KingAndRobberBaron>()
        .expect("capability is registered");

    c.bench_function("biggest_city_hot", |b| {
        b.iter(|| black_box(king.biggest_city_size(black_box(&state))))
    });

    let reducer = AddPoints::new(PlayerId::new(0), 0, PointCategory::Road);
    c.bench_function("biggest_city_cold", |b| {
        b.iter(|| {
            let fresh = reducer.apply(&state);
            black_box(king.biggest_city_size(&fresh))
        })
    });
}

fn bench_turn(c: &mut Criterion) {
    let rules = StandardRules::new();
    let state = game_after(20);
    let player = state.current_player();
    let actions = rules.legal_actions(&state, player);

    c.bench_function("legal_actions", |b| {
        b.iter(|| black_box(rules.legal_actions(black_box(&state), player)))
    });

    c.bench_function("apply_action", |b| {
        b.iter(|| black_box(rules.apply_action(&state, player, &actions[0])))
    });
}

criterion_group!(benches, bench_snapshot, bench_feature_queries, bench_turn);
criterion_main!(benches);
