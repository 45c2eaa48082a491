#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Grid Skirmish engine.
//!
//! This crate defines the vocabulary that connects the grid, the pure
//! systems, the simulation engine and whatever host drives it. Units are
//! referenced exclusively through [`UnitId`] handles; their attributes are
//! reached through the [`Combatant`] capability trait so that spatial and
//! search code never depends on a concrete unit type. The engine reports every
//! side effect as an [`Event`], which hosts forward to a [`Presenter`].

mod config;
mod unit;

use std::{fmt, time::Duration};

use serde::Deserialize;

pub use config::{
    AttributeRange, ConfigError, GridSettings, MoveStrategy, SimulationConfig, SpawnSettings,
};
pub use unit::{Combatant, Unit, UnitAttributes, UnitState};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Grid Skirmish.";

/// Location of a single grid cell expressed as signed column and row values.
///
/// Coordinates are signed so that neighbor offsets may step outside the grid;
/// the grid decides whether a coordinate is on the board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    x: i32,
    y: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the coordinate displaced by the provided offset.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Squared straight-line distance between two coordinates.
    #[must_use]
    pub fn distance_squared(self, other: CellCoord) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        dx * dx + dy * dy
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for CellCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Unique identifier assigned to a registered unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}

/// Identifier of the side a unit fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TeamId(u32);

impl TeamId {
    /// Creates a new team identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "team {}", self.0)
    }
}

/// Adjacency pattern that defines which cells neighbor each other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    /// Four orthogonal neighbors.
    #[default]
    Rectangular,
    /// Six neighbors: the horizontal pair plus the four diagonals.
    Hexagonal,
    /// All eight surrounding cells.
    Octagonal,
}

impl Topology {
    /// Number of neighbors an interior cell has under this topology.
    #[must_use]
    pub const fn neighbor_count(self) -> usize {
        match self {
            Self::Rectangular => 4,
            Self::Hexagonal => 6,
            Self::Octagonal => 8,
        }
    }
}

/// Read-only copy of a registered unit's attributes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitSnapshot {
    /// Handle of the unit.
    pub id: UnitId,
    /// Team the unit fights for.
    pub team: TeamId,
    /// Cell the unit occupies.
    pub position: CellCoord,
    /// Current health points.
    pub health: f32,
    /// Damage dealt by a single attack.
    pub attack_power: f32,
    /// Attack reach measured in cells.
    pub attack_range: u32,
    /// Whether the unit is still alive.
    pub alive: bool,
}

impl UnitSnapshot {
    /// Captures the attributes of `unit` under the provided handle.
    #[must_use]
    pub fn capture<U>(id: UnitId, unit: &U) -> Self
    where
        U: Combatant + ?Sized,
    {
        Self {
            id,
            team: unit.team(),
            position: unit.position(),
            health: unit.health(),
            attack_power: unit.attack_power(),
            attack_range: unit.attack_range(),
            alive: unit.is_alive(),
        }
    }
}

/// Reason the simulation stopped advancing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Every remaining unit belongs to the named team.
    Victory {
        /// Team whose units are the only ones left.
        team: TeamId,
    },
    /// A turn was requested with fewer than two living units.
    NotEnoughUnits,
    /// The host ended the simulation explicitly.
    Stopped,
}

/// Events broadcast by the engine while it processes turns.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The engine accepted a start request and will process turns.
    SimulationStarted,
    /// A new turn began.
    TurnStarted {
        /// Sequence number of the turn, starting at one.
        turn: u64,
    },
    /// A unit struck an opponent.
    UnitAttacked {
        /// Unit that performed the attack.
        attacker: UnitId,
        /// Unit that received the damage.
        target: UnitId,
        /// Damage subtracted from the target's health.
        damage: f32,
        /// Target health after the attack was applied.
        remaining_health: f32,
    },
    /// A unit advanced one cell.
    UnitMoved {
        /// Unit that moved.
        unit: UnitId,
        /// Cell the unit occupied before moving.
        from: CellCoord,
        /// Cell the unit occupies after moving.
        to: CellCoord,
        /// Duration the host should use to animate the step.
        step_duration: Duration,
    },
    /// A unit wanted to move toward its target but no cell brought it closer.
    MoveBlocked {
        /// Unit that could not move.
        unit: UnitId,
        /// Opponent the unit was advancing toward.
        target: UnitId,
    },
    /// A unit found no living opponent and stopped.
    UnitHalted {
        /// Unit that halted.
        unit: UnitId,
    },
    /// A unit's health dropped to zero.
    UnitDied {
        /// Unit that died.
        unit: UnitId,
        /// Team the unit belonged to.
        team: TeamId,
        /// Unit that dealt the final blow.
        killer: UnitId,
    },
    /// The simulation stopped advancing.
    SimulationEnded {
        /// Why the simulation stopped.
        outcome: Outcome,
    },
}

/// Presentation hooks a host implements to visualise engine side effects.
///
/// Every hook is fire-and-forget: the engine never waits for the host. All
/// methods default to doing nothing.
pub trait Presenter {
    /// Called after `attacker` struck `target`; the target is passed for facing.
    fn on_attack(&mut self, _attacker: UnitId, _target: UnitId) {}

    /// Called after `unit` moved into `destination`.
    fn on_move(&mut self, _unit: UnitId, _destination: CellCoord, _step_duration: Duration) {}

    /// Called after `unit` died.
    fn on_death(&mut self, _unit: UnitId) {}
}

/// Forwards the presentation-relevant events to the provided presenter in order.
pub fn present<P>(events: &[Event], presenter: &mut P)
where
    P: Presenter + ?Sized,
{
    for event in events {
        match event {
            Event::UnitAttacked {
                attacker, target, ..
            } => presenter.on_attack(*attacker, *target),
            Event::UnitMoved {
                unit,
                to,
                step_duration,
                ..
            } => presenter.on_move(*unit, *to, *step_duration),
            Event::UnitDied { unit, .. } => presenter.on_death(*unit),
            _ => {}
        }
    }
}
