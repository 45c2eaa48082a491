//! Setup-time configuration shared by the engine, the spawner and adapters.

use std::{str::FromStr, time::Duration};

use serde::Deserialize;

use crate::Topology;

/// Errors reported while loading or validating a [`SimulationConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed into a configuration.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// One of the grid dimensions is zero.
    #[error("grid dimensions must be non-zero, got {size_x}x{size_y}")]
    EmptyGrid {
        /// Configured column count.
        size_x: u32,
        /// Configured row count.
        size_y: u32,
    },
    /// The grid does not fit signed cell coordinates.
    #[error("grid dimensions {size_x}x{size_y} exceed the supported maximum")]
    GridTooLarge {
        /// Configured column count.
        size_x: u32,
        /// Configured row count.
        size_y: u32,
    },
    /// An attribute range has its bounds swapped or is not a finite, non-negative span.
    #[error("{attribute} range [{min}, {max}] is invalid")]
    InvalidRange {
        /// Name of the attribute the range configures.
        attribute: &'static str,
        /// Configured lower bound.
        min: f32,
        /// Configured upper bound.
        max: f32,
    },
    /// No teams were requested.
    #[error("at least one team is required")]
    NoTeams,
    /// A movement strategy name was not recognised.
    #[error("unknown movement strategy `{0}`, expected `greedy` or `pathfinding`")]
    UnknownMoveStrategy(String),
}

/// How units choose the next cell when advancing toward a target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveStrategy {
    /// Step to the free neighbor that most reduces the squared distance.
    #[default]
    Greedy,
    /// Step to the second node of a pathfinder route.
    Pathfinding,
}

impl FromStr for MoveStrategy {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "greedy" => Ok(Self::Greedy),
            "pathfinding" => Ok(Self::Pathfinding),
            other => Err(ConfigError::UnknownMoveStrategy(other.to_owned())),
        }
    }
}

/// Inclusive bounds used when rolling a random attribute value.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeRange {
    /// Smallest value that may be rolled.
    pub min: f32,
    /// Largest value that may be rolled.
    pub max: f32,
}

impl AttributeRange {
    /// Creates a new inclusive range.
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    fn validate(self, attribute: &'static str) -> Result<(), ConfigError> {
        let finite = self.min.is_finite() && self.max.is_finite();
        if !finite || self.min < 0.0 || self.min > self.max {
            return Err(ConfigError::InvalidRange {
                attribute,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Grid dimensions and adjacency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridSettings {
    /// Number of columns.
    pub size_x: u32,
    /// Number of rows.
    pub size_y: u32,
    /// Neighbor pattern applied to every cell.
    pub topology: Topology,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            size_x: 100,
            size_y: 100,
            topology: Topology::Rectangular,
        }
    }
}

/// Parameters for the seeded spawning phase.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpawnSettings {
    /// Seed for placement and attribute rolls.
    pub seed: u64,
    /// Number of opposing teams.
    pub teams: u32,
    /// Units spawned for every team.
    pub units_per_team: u32,
    /// Attack reach assigned to every unit, in cells.
    pub attack_range: u32,
    /// Range the starting health is rolled from.
    pub health: AttributeRange,
    /// Range the attack power is rolled from.
    pub attack_power: AttributeRange,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            seed: 0x5eed_0f_9a1d,
            teams: 2,
            units_per_team: 1,
            attack_range: 1,
            health: AttributeRange::new(1.0, 10.0),
            attack_power: AttributeRange::new(1.0, 10.0),
        }
    }
}

/// Complete setup for one simulation run.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Simulated time that must accumulate before a turn runs, in milliseconds.
    pub time_step_ms: u64,
    /// Move-selection strategy used by every unit.
    pub movement: MoveStrategy,
    /// Grid dimensions and adjacency.
    pub grid: GridSettings,
    /// Spawning parameters.
    pub spawn: SpawnSettings,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_step_ms: 100,
            movement: MoveStrategy::Greedy,
            grid: GridSettings::default(),
            spawn: SpawnSettings::default(),
        }
    }
}

impl SimulationConfig {
    /// Parses and validates a configuration from TOML source.
    ///
    /// Missing fields fall back to their defaults; unknown fields are rejected.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let GridSettings { size_x, size_y, .. } = self.grid;
        if size_x == 0 || size_y == 0 {
            return Err(ConfigError::EmptyGrid { size_x, size_y });
        }
        let fits = i32::try_from(size_x).is_ok()
            && i32::try_from(size_y).is_ok()
            && u64::from(size_x) * u64::from(size_y) <= u64::from(u32::MAX);
        if !fits {
            return Err(ConfigError::GridTooLarge { size_x, size_y });
        }
        if self.spawn.teams == 0 {
            return Err(ConfigError::NoTeams);
        }
        self.spawn.health.validate("health")?;
        self.spawn.attack_power.validate("attack power")?;
        Ok(())
    }

    /// Simulated time that must accumulate before a turn runs.
    #[must_use]
    pub fn time_step(&self) -> Duration {
        Duration::from_millis(self.time_step_ms)
    }
}
