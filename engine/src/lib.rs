#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick-driven turn engine for Grid Skirmish.
//!
//! The engine owns the [`Grid`], the unit roster and the per-team tally. Hosts
//! register units, call [`Engine::start`] and then feed elapsed time through
//! [`Engine::advance`]. Once a full time step has accumulated the engine runs a
//! single turn: every living unit, in registration order, either attacks its
//! nearest opponent or moves one cell toward it. Side effects are appended to
//! the caller's event buffer.

mod turn;

use std::{collections::BTreeMap, time::Duration};

use grid_skirmish_core::{
    CellCoord, Combatant, Event, GridSettings, MoveStrategy, Outcome, SimulationConfig, TeamId,
    Unit, UnitId, UnitSnapshot,
};
use grid_skirmish_system_movement::{selector_for, MoveSelector};
use grid_skirmish_system_spawning::{SpawnOrder, Spawning};
use grid_skirmish_world::{Grid, GridError};

/// Errors surfaced by engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A grid invariant was violated.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// Every unit handle has been handed out.
    #[error("unit roster is full")]
    RosterFull,
}

/// Configuration parameters required to construct the engine.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    grid: GridSettings,
    time_step: Duration,
    movement: MoveStrategy,
}

impl Config {
    /// Creates a new configuration from grid settings, turn cadence and move strategy.
    #[must_use]
    pub const fn new(grid: GridSettings, time_step: Duration, movement: MoveStrategy) -> Self {
        Self {
            grid,
            time_step,
            movement,
        }
    }
}

impl From<&SimulationConfig> for Config {
    fn from(config: &SimulationConfig) -> Self {
        Self::new(config.grid, config.time_step(), config.movement)
    }
}

/// Summary of one processed turn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnReport {
    /// Sequence number of the turn, starting at one.
    pub turn: u64,
    /// Attacks performed.
    pub attacks: usize,
    /// Successful single-cell moves.
    pub moves: usize,
    /// Moves that found no closer cell.
    pub blocked: usize,
    /// Units that found no opponent.
    pub halted: usize,
    /// Units killed during the turn, in order of death.
    pub deaths: Vec<UnitId>,
    /// Set when the turn ended the simulation.
    pub outcome: Option<Outcome>,
}

/// Simulation engine generic over the unit representation.
#[derive(Debug)]
pub struct Engine<U: Combatant = Unit> {
    grid: Grid,
    roster: Vec<Option<U>>,
    active: Vec<UnitId>,
    kill_list: Vec<UnitId>,
    tally: BTreeMap<TeamId, usize>,
    running: bool,
    accumulator: Duration,
    time_step: Duration,
    turn: u64,
    selector: Box<dyn MoveSelector>,
}

impl<U: Combatant> Engine<U> {
    /// Creates an idle engine with an empty grid of the configured size.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let settings = config.grid;
        Self {
            grid: Grid::new(settings.size_x, settings.size_y, settings.topology),
            roster: Vec::new(),
            active: Vec::new(),
            kill_list: Vec::new(),
            tally: BTreeMap::new(),
            running: false,
            accumulator: Duration::ZERO,
            time_step: config.time_step,
            turn: 0,
            selector: selector_for(config.movement),
        }
    }

    /// Read-only view of the grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Reports whether turns are being processed.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Number of turns processed so far.
    #[must_use]
    pub const fn turn(&self) -> u64 {
        self.turn
    }

    /// Simulated time that must accumulate before a turn runs.
    #[must_use]
    pub const fn time_step(&self) -> Duration {
        self.time_step
    }

    /// Number of units still taking part in turns.
    #[must_use]
    pub fn living_units(&self) -> usize {
        self.active.len()
    }

    /// Live unit count for the provided team.
    #[must_use]
    pub fn tally(&self, team: TeamId) -> usize {
        self.tally.get(&team).copied().unwrap_or(0)
    }

    /// Returns the registered unit behind a handle, dead or alive.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&U> {
        self.roster.get(id.get() as usize)?.as_ref()
    }

    /// Captures the current attributes of a registered unit.
    #[must_use]
    pub fn snapshot(&self, id: UnitId) -> Option<UnitSnapshot> {
        self.unit(id).map(|unit| UnitSnapshot::capture(id, unit))
    }

    /// Snapshots of every unit still taking part in turns, in registration order.
    #[must_use]
    pub fn snapshots(&self) -> Vec<UnitSnapshot> {
        self.active
            .iter()
            .filter_map(|id| self.snapshot(*id))
            .collect()
    }

    /// Places a unit into `cell` and adds it to the turn order.
    ///
    /// Fails when the cell is off the grid or already occupied.
    pub fn register_unit(&mut self, mut unit: U, cell: CellCoord) -> Result<UnitId, EngineError> {
        let id = u32::try_from(self.roster.len())
            .map(UnitId::new)
            .map_err(|_| EngineError::RosterFull)?;

        self.grid.occupy(cell, id)?;
        unit.set_position(cell);
        let team = unit.team();
        let alive = unit.is_alive();
        self.roster.push(Some(unit));

        if alive {
            self.active.push(id);
            *self.tally.entry(team).or_insert(0) += 1;
        }
        tracing::debug!(unit = %id, %team, %cell, "registered unit");
        Ok(id)
    }

    /// Removes a unit from the grid, the turn order and the tally.
    ///
    /// Returns the unit so the host can dispose of it; unknown handles are
    /// logged and yield `None`.
    pub fn unregister_unit(&mut self, id: UnitId) -> Result<Option<U>, EngineError> {
        let Some(unit) = self
            .roster
            .get_mut(id.get() as usize)
            .and_then(Option::take)
        else {
            tracing::warn!(unit = %id, "unregister requested for an unknown unit");
            return Ok(None);
        };

        let position = unit.position();
        if self.grid.occupant(position)? == Some(id) {
            let _ = self.grid.vacate(position)?;
        }

        let was_active = self.active.contains(&id);
        self.active.retain(|active| *active != id);
        self.kill_list.retain(|killed| *killed != id);
        if was_active && unit.is_alive() {
            self.decrement_tally(unit.team());
        }
        Ok(Some(unit))
    }

    /// Begins processing turns.
    pub fn start(&mut self, out: &mut Vec<Event>) {
        if self.running {
            tracing::warn!("start requested while already running");
            return;
        }
        self.running = true;
        self.accumulator = Duration::ZERO;
        tracing::info!(units = self.active.len(), "simulation started");
        out.push(Event::SimulationStarted);
    }

    /// Stops processing turns.
    pub fn end(&mut self, out: &mut Vec<Event>) {
        self.finish(Outcome::Stopped, out);
    }

    /// Accumulates elapsed time and runs at most one turn once a full step has passed.
    ///
    /// Returns the report of the processed turn, or `None` when no turn ran.
    pub fn advance(
        &mut self,
        elapsed: Duration,
        out: &mut Vec<Event>,
    ) -> Result<Option<TurnReport>, EngineError> {
        if !self.running {
            return Ok(None);
        }

        self.accumulator = self.accumulator.saturating_add(elapsed);
        if self.accumulator < self.time_step {
            return Ok(None);
        }
        self.accumulator = Duration::ZERO;

        self.run_turn(out)
    }

    fn finish(&mut self, outcome: Outcome, out: &mut Vec<Event>) {
        if !self.running {
            return;
        }
        self.running = false;
        tracing::info!(?outcome, turn = self.turn, "simulation ended");
        out.push(Event::SimulationEnded { outcome });
    }

    fn unit_mut(&mut self, id: UnitId) -> Option<&mut U> {
        self.roster.get_mut(id.get() as usize)?.as_mut()
    }

    fn decrement_tally(&mut self, team: TeamId) {
        if let Some(count) = self.tally.get_mut(&team) {
            *count = count.saturating_sub(1);
        }
    }
}

impl Engine<Unit> {
    /// Runs one spawning phase and registers a [`Unit`] for every placement.
    ///
    /// Returns the handles of the registered units in spawn order.
    pub fn spawn(&mut self, spawning: &mut Spawning) -> Result<Vec<UnitId>, EngineError> {
        let mut orders: Vec<SpawnOrder> = Vec::new();
        spawning.handle(&mut self.grid, &mut orders);

        let mut spawned = Vec::with_capacity(orders.len());
        for order in orders {
            spawned.push(self.register_unit(Unit::new(order.attributes), order.cell)?);
        }
        tracing::info!(units = spawned.len(), "spawned units");
        Ok(spawned)
    }
}
