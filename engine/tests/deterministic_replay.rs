use std::{
    collections::{hash_map::DefaultHasher, HashSet},
    hash::{Hash, Hasher},
};

use grid_skirmish_core::{
    AttributeRange, Event, GridSettings, MoveStrategy, Outcome, SimulationConfig, SpawnSettings,
    Topology,
};
use grid_skirmish_engine::{Config, Engine};
use grid_skirmish_system_spawning::{Config as SpawnConfig, Spawning};

const TURN_LIMIT: u64 = 2_000;

fn scenario(seed: u64, topology: Topology, movement: MoveStrategy) -> SimulationConfig {
    SimulationConfig {
        time_step_ms: 100,
        movement,
        grid: GridSettings {
            size_x: 12,
            size_y: 12,
            topology,
        },
        spawn: SpawnSettings {
            seed,
            teams: 2,
            units_per_team: 4,
            attack_range: 1,
            health: AttributeRange::new(1.0, 10.0),
            attack_power: AttributeRange::new(1.0, 10.0),
        },
    }
}

#[derive(Debug, PartialEq)]
struct Replay {
    frames: Vec<Vec<(u32, i32, i32, u32, bool)>>,
    events: Vec<Event>,
    outcome: Option<Outcome>,
}

impl Replay {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.frames.hash(&mut hasher);
        self.events.len().hash(&mut hasher);
        hasher.finish()
    }
}

fn replay(config: &SimulationConfig) -> Replay {
    let mut engine: Engine = Engine::new(Config::from(config));
    let mut spawning = Spawning::new(SpawnConfig::new(config.spawn));
    let spawned = engine.spawn(&mut spawning).expect("spawn cells are free");
    assert_eq!(spawned.len(), 8);

    let mut events = Vec::new();
    let mut frames = Vec::new();
    let mut outcome = None;
    engine.start(&mut events);

    while engine.is_running() && engine.turn() < TURN_LIMIT {
        let report = engine
            .advance(config.time_step(), &mut events)
            .expect("grid invariants hold");
        if let Some(report) = report {
            outcome = report.outcome.or(outcome);
        }

        let frame = engine
            .snapshots()
            .into_iter()
            .map(|unit| {
                (
                    unit.id.get(),
                    unit.position.x(),
                    unit.position.y(),
                    unit.health.to_bits(),
                    unit.alive,
                )
            })
            .collect::<Vec<_>>();
        let cells: HashSet<_> = frame.iter().map(|(_, x, y, _, _)| (*x, *y)).collect();
        assert_eq!(cells.len(), frame.len(), "two units share a cell");
        frames.push(frame);
    }

    Replay {
        frames,
        events,
        outcome,
    }
}

#[test]
fn identical_seeds_replay_identically() {
    for topology in [
        Topology::Rectangular,
        Topology::Hexagonal,
        Topology::Octagonal,
    ] {
        let config = scenario(0x5eed, topology, MoveStrategy::Greedy);
        let first = replay(&config);
        let second = replay(&config);

        assert!(!first.frames.is_empty());
        assert_eq!(first, second, "{topology:?} replay diverged");
        assert_eq!(first.fingerprint(), second.fingerprint());
    }
}

#[test]
fn pathfinding_battles_replay_identically() {
    let config = scenario(0xc0ffee, Topology::Octagonal, MoveStrategy::Pathfinding);
    let first = replay(&config);
    let second = replay(&config);

    assert_eq!(first, second, "replay diverged between runs");
    assert!(first
        .events
        .iter()
        .any(|event| matches!(event, Event::UnitAttacked { .. })));
    if let Some(outcome) = first.outcome {
        assert!(matches!(outcome, Outcome::Victory { .. }));
    }
}

#[test]
fn different_seeds_diverge() {
    let first = replay(&scenario(1, Topology::Rectangular, MoveStrategy::Greedy));
    let second = replay(&scenario(2, Topology::Rectangular, MoveStrategy::Greedy));

    assert_ne!(first.fingerprint(), second.fingerprint());
}
