//! Unit capability interface and the default unit record.

use crate::{CellCoord, TeamId};

/// Behavioural state a unit reports to its presenter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum UnitState {
    /// Standing still, either freshly spawned or without opponents.
    #[default]
    Idle,
    /// Stepping into a neighboring cell.
    Moving,
    /// Striking an opponent.
    Attacking,
    /// Health reached zero.
    Dead,
}

/// Read/write attribute interface the engine needs from a combat unit.
///
/// The engine stores values implementing this trait in its roster and refers
/// to them by [`crate::UnitId`]; nothing else in the workspace touches units
/// directly.
pub trait Combatant {
    /// Team the unit fights for.
    fn team(&self) -> TeamId;

    /// Cell the unit currently occupies.
    fn position(&self) -> CellCoord;

    /// Records the cell the unit occupies.
    fn set_position(&mut self, cell: CellCoord);

    /// Current health points.
    fn health(&self) -> f32;

    /// Overwrites the current health points.
    fn set_health(&mut self, health: f32);

    /// Damage dealt by a single attack.
    fn attack_power(&self) -> f32;

    /// Attack reach measured in cells.
    fn attack_range(&self) -> u32;

    /// Whether the unit is still alive.
    fn is_alive(&self) -> bool;

    /// Sets the alive flag.
    fn set_alive(&mut self, alive: bool);

    /// Updates the behavioural state.
    fn set_state(&mut self, state: UnitState);

    /// Zeroes health, clears the alive flag and enters [`UnitState::Dead`].
    fn mark_dead(&mut self) {
        self.set_health(0.0);
        self.set_alive(false);
        self.set_state(UnitState::Dead);
    }

    /// Stops whatever the unit was doing.
    fn halt(&mut self) {
        self.set_state(UnitState::Idle);
    }
}

/// Base attributes a spawner assigns before registering a unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitAttributes {
    /// Team the unit fights for.
    pub team: TeamId,
    /// Starting health points.
    pub health: f32,
    /// Damage dealt by a single attack.
    pub attack_power: f32,
    /// Attack reach measured in cells.
    pub attack_range: u32,
}

/// Default combat unit used by the engine and the spawning system.
#[derive(Clone, Debug, PartialEq)]
pub struct Unit {
    team: TeamId,
    position: CellCoord,
    health: f32,
    attack_power: f32,
    attack_range: u32,
    alive: bool,
    state: UnitState,
}

impl Unit {
    /// Creates a living, idle unit from the provided attributes.
    ///
    /// The position is assigned when the unit is registered on the grid.
    #[must_use]
    pub fn new(attributes: UnitAttributes) -> Self {
        Self {
            team: attributes.team,
            position: CellCoord::default(),
            health: attributes.health,
            attack_power: attributes.attack_power,
            attack_range: attributes.attack_range,
            alive: true,
            state: UnitState::Idle,
        }
    }

    /// Current behavioural state.
    #[must_use]
    pub const fn state(&self) -> UnitState {
        self.state
    }
}

impl Combatant for Unit {
    fn team(&self) -> TeamId {
        self.team
    }

    fn position(&self) -> CellCoord {
        self.position
    }

    fn set_position(&mut self, cell: CellCoord) {
        self.position = cell;
    }

    fn health(&self) -> f32 {
        self.health
    }

    fn set_health(&mut self, health: f32) {
        self.health = health;
    }

    fn attack_power(&self) -> f32 {
        self.attack_power
    }

    fn attack_range(&self) -> u32 {
        self.attack_range
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn set_alive(&mut self, alive: bool) {
        self.alive = alive;
    }

    fn set_state(&mut self, state: UnitState) {
        self.state = state;
    }
}
