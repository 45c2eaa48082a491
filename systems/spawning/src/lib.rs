#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system that places teams onto random free cells.

use grid_skirmish_core::{AttributeRange, CellCoord, SpawnSettings, TeamId, UnitAttributes};
use grid_skirmish_world::Grid;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    settings: SpawnSettings,
}

impl Config {
    /// Creates a new configuration from the provided spawn settings.
    #[must_use]
    pub const fn new(settings: SpawnSettings) -> Self {
        Self { settings }
    }
}

/// Placement decided for one unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnOrder {
    /// Cell the unit should be registered into.
    pub cell: CellCoord,
    /// Rolled base attributes.
    pub attributes: UnitAttributes,
}

/// Pure system that rolls placements and attributes from a seeded stream.
#[derive(Debug)]
pub struct Spawning {
    settings: SpawnSettings,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            settings: config.settings,
            rng: ChaCha8Rng::seed_from_u64(config.settings.seed),
        }
    }

    /// Runs one spawning phase on `grid`, appending an order per placed unit.
    ///
    /// Units alternate between teams in spawn order. Placement stops early
    /// when the grid runs out of free cells.
    pub fn handle(&mut self, grid: &mut Grid, out: &mut Vec<SpawnOrder>) {
        let teams = self.settings.teams;
        if teams == 0 {
            return;
        }
        let total = u64::from(teams) * u64::from(self.settings.units_per_team);

        grid.begin_spawning_phase();
        let mut spawned = 0_u64;
        while spawned < total {
            let Some(cell) = grid.pick_random_free_cell(&mut self.rng) else {
                tracing::warn!(
                    requested = total,
                    spawned,
                    "grid ran out of free cells while spawning"
                );
                break;
            };
            if !cell.is_free() {
                continue;
            }

            let team = TeamId::new((spawned % u64::from(teams)) as u32);
            let health = roll(&mut self.rng, self.settings.health);
            let attack_power = roll(&mut self.rng, self.settings.attack_power);
            out.push(SpawnOrder {
                cell: cell.coords(),
                attributes: UnitAttributes {
                    team,
                    health,
                    attack_power,
                    attack_range: self.settings.attack_range,
                },
            });
            spawned += 1;
        }
        grid.end_spawning_phase();

        tracing::debug!(spawned, teams, "spawning phase complete");
    }
}

fn roll<R>(rng: &mut R, range: AttributeRange) -> f32
where
    R: Rng + ?Sized,
{
    if range.min >= range.max {
        return range.min;
    }
    rng.gen_range(range.min..=range.max)
}
