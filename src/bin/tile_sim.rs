//! # tile-sim
//!
//! Plays seeded games between random players and prints the standings.

use std::time::Instant;

use clap::Parser;
use rust_tiles::capability::CapabilityId;
use rust_tiles::core::{GameConfig, GameRng, GameState, DEFAULT_FOLLOWERS};
use rust_tiles::rules::{RulesEngine, StandardRules};
use rust_tiles::stats::GameSummary;
use tracing::info;

#[derive(Parser)]
#[command(name = "tile-sim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Player nicknames (comma separated)
    #[arg(long, value_delimiter = ',', default_values_t = ["ada".to_string(), "brin".to_string()])]
    players: Vec<String>,

    /// Capabilities to enable, in registration order (comma separated)
    #[arg(long, value_delimiter = ',')]
    capabilities: Vec<CapabilityId>,

    /// Seed of the first game
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Number of games to play, with consecutive seeds
    #[arg(long, default_value_t = 1)]
    games: u64,

    /// Followers per player
    #[arg(long, default_value_t = DEFAULT_FOLLOWERS)]
    followers: u8,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Play one game to the end, choosing uniformly among legal actions.
fn play(config: &GameConfig, rules: &StandardRules) -> anyhow::Result<(GameState, Vec<u64>)> {
    let mut rng = GameRng::new(config.seed).for_context("players");
    let mut clocks = vec![0u64; config.players.len()];
    let mut state = GameState::new(config)?;

    while rules.is_terminal(&state).is_none() {
        let player = state.current_player();
        let started = Instant::now();
        let actions = rules.legal_actions(&state, player);
        let action = rng
            .choose(&actions)
            .ok_or_else(|| anyhow::anyhow!("{player} has no legal action on turn {}", state.turn().turn))?;
        state = rules.apply_action(&state, player, action)?;
        clocks[player.index()] += started.elapsed().as_millis() as u64;
    }

    Ok((state, clocks))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let rules = StandardRules::new();
    for seed in cli.seed..cli.seed.saturating_add(cli.games) {
        let config = GameConfig::new(cli.players.iter().cloned())
            .with_capabilities(cli.capabilities.iter().copied())
            .with_followers(cli.followers)
            .with_seed(seed);

        let (state, clocks) = play(&config, &rules)?;
        let summary = GameSummary::new(&state).with_clocks(&clocks);
        info!(seed, turns = summary.turns, tiles = summary.tiles_on_board, "game finished");

        if cli.json {
            println!("{}", serde_json::to_string(&summary)?);
            continue;
        }

        println!("game {seed}: {} turns, {} tiles", summary.turns, summary.tiles_on_board);
        for row in &summary.players {
            let clock = row.clock_share.map_or_else(|| "-".to_string(), |s| format!("{s:.0}%"));
            println!(
                "  {:>5}  {:<12} {:>4} pts  {:>3} tiles  {:>4} clock",
                row.rank, row.nickname, row.total, row.tiles_placed, clock
            );
        }
        if let Some(size) = summary.biggest_city {
            println!("  biggest city: {size} tiles");
        }
        if let Some(size) = summary.longest_road {
            println!("  longest road: {size} tiles");
        }
    }

    Ok(())
}
