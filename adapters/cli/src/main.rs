#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that spawns and runs a Grid Skirmish battle.

mod presenter;
mod scenario;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use grid_skirmish_core::{MoveStrategy, WELCOME_BANNER};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::scenario::Overrides;

/// Runs a deterministic grid combat simulation.
#[derive(Debug, Parser)]
#[command(name = "grid-skirmish", version)]
struct Cli {
    /// TOML configuration file; built-in defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Spawn seed, overriding the configuration file.
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many turns even without a winner.
    #[arg(long, default_value_t = 10_000)]
    max_turns: u64,

    /// Movement strategy (`greedy` or `pathfinding`), overriding the configuration file.
    #[arg(long)]
    movement: Option<MoveStrategy>,

    /// Log every grid cell at debug level before and after the run.
    #[arg(long)]
    dump_grid: bool,
}

/// Entry point for the Grid Skirmish command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = scenario::load_config(
        cli.config.as_deref(),
        Overrides {
            seed: cli.seed,
            movement: cli.movement,
        },
    )?;

    println!("{WELCOME_BANNER}");
    let summary = scenario::run(&config, cli.max_turns, cli.dump_grid)?;

    println!(
        "{} ({} units spawned, {} attacks, {} moves, {} deaths)",
        scenario::describe(&summary),
        summary.spawned,
        summary.presenter.attacks(),
        summary.presenter.moves(),
        summary.presenter.deaths(),
    );
    for unit in &summary.survivors {
        println!("  {}", scenario::describe_unit(unit));
    }
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
