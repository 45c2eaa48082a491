use std::time::Duration;

use grid_skirmish_core::{
    CellCoord, Combatant, Event, GridSettings, MoveStrategy, Outcome, TeamId, Topology, Unit,
    UnitAttributes, UnitId, UnitState,
};
use grid_skirmish_engine::{Config, Engine};

const STEP: Duration = Duration::from_millis(100);

fn engine(size_x: u32, size_y: u32, movement: MoveStrategy) -> Engine {
    Engine::new(Config::new(
        GridSettings {
            size_x,
            size_y,
            topology: Topology::Rectangular,
        },
        STEP,
        movement,
    ))
}

fn unit(team: u32, health: f32, attack_power: f32) -> Unit {
    Unit::new(UnitAttributes {
        team: TeamId::new(team),
        health,
        attack_power,
        attack_range: 1,
    })
}

fn register(engine: &mut Engine, unit: Unit, cell: (i32, i32)) -> UnitId {
    engine
        .register_unit(unit, cell.into())
        .expect("cell is free")
}

#[test]
fn lethal_attack_removes_the_target() {
    let mut engine = engine(5, 5, MoveStrategy::Greedy);
    let attacker = register(&mut engine, unit(0, 10.0, 5.0), (0, 0));
    let target = register(&mut engine, unit(1, 5.0, 1.0), (1, 0));
    let mut events = Vec::new();
    engine.start(&mut events);

    let report = engine
        .advance(STEP, &mut events)
        .expect("grid intact")
        .expect("a turn ran");

    assert_eq!(report.turn, 1);
    assert_eq!(report.attacks, 1);
    assert_eq!(report.deaths, vec![target]);
    assert_eq!(engine.tally(TeamId::new(0)), 1);
    assert_eq!(engine.tally(TeamId::new(1)), 0);
    assert_eq!(engine.living_units(), 1);
    assert_eq!(engine.grid().occupant(CellCoord::new(1, 0)), Ok(None));

    let fallen = engine.snapshot(target).expect("roster keeps dead units");
    assert!(!fallen.alive);
    assert_eq!(fallen.health, 0.0);
    assert!(events.contains(&Event::UnitAttacked {
        attacker,
        target,
        damage: 5.0,
        remaining_health: 0.0,
    }));
    assert!(events.contains(&Event::UnitDied {
        unit: target,
        team: TeamId::new(1),
        killer: attacker,
    }));
}

#[test]
fn last_team_standing_wins() {
    let mut engine = engine(5, 5, MoveStrategy::Greedy);
    let _ = register(&mut engine, unit(0, 10.0, 5.0), (0, 0));
    let _ = register(&mut engine, unit(1, 5.0, 1.0), (1, 0));
    let mut events = Vec::new();
    engine.start(&mut events);

    let report = engine
        .advance(STEP, &mut events)
        .expect("grid intact")
        .expect("a turn ran");

    let victory = Outcome::Victory {
        team: TeamId::new(0),
    };
    assert_eq!(report.outcome, Some(victory));
    assert!(!engine.is_running());
    assert_eq!(
        events.last(),
        Some(&Event::SimulationEnded { outcome: victory })
    );

    let after = engine.advance(STEP, &mut events).expect("grid intact");
    assert!(after.is_none());
    assert_eq!(engine.turn(), 1);
}

#[test]
fn lone_unit_ends_the_simulation_without_a_turn() {
    let mut engine = engine(3, 3, MoveStrategy::Greedy);
    let _ = register(&mut engine, unit(0, 1.0, 1.0), (1, 1));
    let mut events = Vec::new();
    engine.start(&mut events);

    let report = engine.advance(STEP, &mut events).expect("grid intact");

    assert!(report.is_none());
    assert_eq!(engine.turn(), 0);
    assert!(!engine.is_running());
    assert_eq!(
        events,
        vec![
            Event::SimulationStarted,
            Event::SimulationEnded {
                outcome: Outcome::NotEnoughUnits
            },
        ]
    );
}

#[test]
fn turns_wait_for_a_full_time_step() {
    let mut engine = engine(8, 1, MoveStrategy::Greedy);
    let _ = register(&mut engine, unit(0, 5.0, 1.0), (0, 0));
    let _ = register(&mut engine, unit(1, 5.0, 1.0), (7, 0));
    let mut events = Vec::new();
    engine.start(&mut events);

    let half = Duration::from_millis(50);
    assert!(engine.advance(half, &mut events).expect("grid intact").is_none());
    assert!(engine.advance(half, &mut events).expect("grid intact").is_some());
    assert_eq!(engine.turn(), 1);

    let long = Duration::from_secs(3);
    assert!(engine.advance(long, &mut events).expect("grid intact").is_some());
    assert_eq!(engine.turn(), 2, "one turn per advance at most");
    assert!(engine.advance(half, &mut events).expect("grid intact").is_none());
}

#[test]
fn units_close_distance_with_either_strategy() {
    for strategy in [MoveStrategy::Greedy, MoveStrategy::Pathfinding] {
        let mut engine = engine(6, 3, strategy);
        let left = register(&mut engine, unit(0, 10.0, 1.0), (0, 0));
        let right = register(&mut engine, unit(1, 10.0, 1.0), (4, 0));
        let mut events = Vec::new();
        engine.start(&mut events);

        let report = engine
            .advance(STEP, &mut events)
            .expect("grid intact")
            .expect("a turn ran");

        assert_eq!(report.moves, 2, "{strategy:?}");
        let left_unit = engine.unit(left).expect("registered");
        let right_unit = engine.unit(right).expect("registered");
        assert_eq!(left_unit.position(), CellCoord::new(1, 0), "{strategy:?}");
        assert_eq!(right_unit.position(), CellCoord::new(3, 0), "{strategy:?}");
        assert_eq!(left_unit.state(), UnitState::Moving);
        assert_eq!(engine.grid().occupant(CellCoord::new(0, 0)), Ok(None));
        assert_eq!(engine.grid().occupant(CellCoord::new(1, 0)), Ok(Some(left)));
        assert!(events.contains(&Event::UnitMoved {
            unit: left,
            from: CellCoord::new(0, 0),
            to: CellCoord::new(1, 0),
            step_duration: STEP,
        }));

        let report = engine
            .advance(STEP, &mut events)
            .expect("grid intact")
            .expect("a turn ran");
        assert_eq!(report.moves, 1, "{strategy:?}");
        assert_eq!(report.attacks, 1, "{strategy:?}");
    }
}

#[test]
fn dead_units_do_not_act_later_in_the_turn() {
    let mut engine = engine(6, 6, MoveStrategy::Greedy);
    let hunter = register(&mut engine, unit(0, 5.0, 10.0), (0, 0));
    let prey = register(&mut engine, unit(1, 1.0, 10.0), (1, 0));
    let _ = register(&mut engine, unit(1, 5.0, 1.0), (5, 5));
    let mut events = Vec::new();
    engine.start(&mut events);

    let report = engine
        .advance(STEP, &mut events)
        .expect("grid intact")
        .expect("a turn ran");

    assert_eq!(report.deaths, vec![prey]);
    assert!(!events.iter().any(|event| matches!(
        event,
        Event::UnitAttacked { attacker, .. } if *attacker == prey
    )));
    assert!(engine.unit(hunter).is_some_and(Combatant::is_alive));
    assert!(engine.is_running());
    assert_eq!(engine.living_units(), 2);
}

#[test]
fn earlier_actions_stand_when_the_actor_dies_later() {
    let mut engine = engine(4, 4, MoveStrategy::Greedy);
    let first = register(&mut engine, unit(0, 1.0, 1.0), (0, 0));
    let second = register(&mut engine, unit(1, 5.0, 5.0), (1, 0));
    let mut events = Vec::new();
    engine.start(&mut events);

    let report = engine
        .advance(STEP, &mut events)
        .expect("grid intact")
        .expect("a turn ran");

    assert_eq!(report.attacks, 2);
    assert_eq!(report.deaths, vec![first]);
    assert_eq!(engine.snapshot(second).map(|unit| unit.health), Some(4.0));
    assert_eq!(
        report.outcome,
        Some(Outcome::Victory {
            team: TeamId::new(1)
        })
    );
}

#[test]
fn teammates_without_opponents_halt() {
    let mut engine = engine(4, 4, MoveStrategy::Greedy);
    let a = register(&mut engine, unit(2, 3.0, 1.0), (0, 0));
    let b = register(&mut engine, unit(2, 3.0, 1.0), (3, 3));
    let mut events = Vec::new();
    engine.start(&mut events);

    let report = engine
        .advance(STEP, &mut events)
        .expect("grid intact")
        .expect("a turn ran");

    assert_eq!(report.halted, 2);
    assert!(events.contains(&Event::UnitHalted { unit: a }));
    assert!(events.contains(&Event::UnitHalted { unit: b }));
    assert_eq!(
        report.outcome,
        Some(Outcome::Victory {
            team: TeamId::new(2)
        })
    );
    assert_eq!(engine.unit(a).map(Unit::state), Some(UnitState::Idle));
}

#[test]
fn blocked_units_stay_put() {
    let mut engine = engine(3, 1, MoveStrategy::Greedy);
    let left = register(&mut engine, unit(0, 5.0, 1.0), (0, 0));
    let _ = register(&mut engine, unit(0, 5.0, 1.0), (1, 0));
    let _ = register(&mut engine, unit(1, 5.0, 1.0), (2, 0));
    let mut events = Vec::new();
    engine.start(&mut events);

    let report = engine
        .advance(STEP, &mut events)
        .expect("grid intact")
        .expect("a turn ran");

    assert_eq!(report.blocked, 1);
    assert!(events.contains(&Event::MoveBlocked {
        unit: left,
        target: UnitId::new(2),
    }));
    assert_eq!(
        engine.unit(left).map(Combatant::position),
        Some(CellCoord::new(0, 0))
    );
}
