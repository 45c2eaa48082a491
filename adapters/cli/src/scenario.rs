use std::{fs, path::Path};

use anyhow::{Context, Result};
use grid_skirmish_core::{
    present, Event, MoveStrategy, Outcome, SimulationConfig, UnitId, UnitSnapshot,
};
use grid_skirmish_engine::{Config, Engine};
use grid_skirmish_system_spawning::{Config as SpawnConfig, Spawning};

use crate::presenter::LogPresenter;

/// Command-line values that take precedence over the configuration file.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Overrides {
    pub(crate) seed: Option<u64>,
    pub(crate) movement: Option<MoveStrategy>,
}

/// Reads the configuration file, if any, and applies command-line overrides.
pub(crate) fn load_config(path: Option<&Path>, overrides: Overrides) -> Result<SimulationConfig> {
    let mut config = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            SimulationConfig::from_toml_str(&contents)
                .with_context(|| format!("invalid config file {}", path.display()))?
        }
        None => SimulationConfig::default(),
    };

    if let Some(seed) = overrides.seed {
        config.spawn.seed = seed;
    }
    if let Some(movement) = overrides.movement {
        config.movement = movement;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Result of a complete run.
#[derive(Debug)]
pub(crate) struct Summary {
    pub(crate) outcome: Outcome,
    pub(crate) turns: u64,
    pub(crate) spawned: usize,
    pub(crate) survivors: Vec<UnitSnapshot>,
    pub(crate) presenter: LogPresenter,
}

/// Spawns the configured scenario and drives it until it ends or hits `max_turns`.
pub(crate) fn run(config: &SimulationConfig, max_turns: u64, dump_grid: bool) -> Result<Summary> {
    let mut engine: Engine = Engine::new(Config::from(config));
    let mut spawning = Spawning::new(SpawnConfig::new(config.spawn));
    let spawned: Vec<UnitId> = engine
        .spawn(&mut spawning)
        .context("failed to place spawned units")?;
    if dump_grid {
        engine.grid().debug_dump();
    }

    let mut presenter = LogPresenter::default();
    let mut events = Vec::new();
    let mut outcome = None;
    engine.start(&mut events);

    while engine.is_running() {
        if engine.turn() >= max_turns {
            tracing::warn!(max_turns, "turn limit reached");
            engine.end(&mut events);
        } else {
            let report = engine
                .advance(engine.time_step(), &mut events)
                .with_context(|| format!("turn {} failed", engine.turn() + 1))?;
            if let Some(report) = report {
                tracing::info!(
                    turn = report.turn,
                    attacks = report.attacks,
                    moves = report.moves,
                    blocked = report.blocked,
                    deaths = report.deaths.len(),
                    "turn complete"
                );
            }
        }

        outcome = ended_with(&events).or(outcome);
        present(&events, &mut presenter);
        events.clear();
    }

    if dump_grid {
        engine.grid().debug_dump();
    }

    let survivors = engine
        .snapshots()
        .into_iter()
        .filter(|unit| unit.alive)
        .collect();
    Ok(Summary {
        outcome: outcome.unwrap_or(Outcome::Stopped),
        turns: engine.turn(),
        spawned: spawned.len(),
        survivors,
        presenter,
    })
}

fn ended_with(events: &[Event]) -> Option<Outcome> {
    events.iter().find_map(|event| match event {
        Event::SimulationEnded { outcome } => Some(*outcome),
        _ => None,
    })
}

/// Formats the outcome line printed at the end of a run.
pub(crate) fn describe(summary: &Summary) -> String {
    match summary.outcome {
        Outcome::Victory { team } => {
            format!("{team} wins after {} turns", summary.turns)
        }
        Outcome::NotEnoughUnits => "not enough units to fight".to_owned(),
        Outcome::Stopped => format!("stopped after {} turns", summary.turns),
    }
}

/// Formats one surviving unit.
pub(crate) fn describe_unit(unit: &UnitSnapshot) -> String {
    format!(
        "{} ({}) at {} with {:.1} health",
        unit.id, unit.team, unit.position, unit.health
    )
}
