#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that applies attack damage to a combatant.

use grid_skirmish_core::Combatant;

/// Result of a single strike.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The target survived with positive health.
    Wounded,
    /// The target's health reached zero; it has been marked dead.
    Killed,
}

/// Damage report for one attack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Strike {
    /// Damage subtracted from the target.
    pub damage: f32,
    /// Target health after the strike.
    pub remaining_health: f32,
    /// Whether the target survived.
    pub outcome: Outcome,
}

/// Subtracts `damage` from the target's health and marks it dead at zero.
///
/// Dead targets are left untouched and reported as killed with no damage.
pub fn strike<U>(damage: f32, target: &mut U) -> Strike
where
    U: Combatant + ?Sized,
{
    if !target.is_alive() {
        return Strike {
            damage: 0.0,
            remaining_health: target.health(),
            outcome: Outcome::Killed,
        };
    }

    let remaining = target.health() - damage;
    if remaining <= 0.0 {
        target.mark_dead();
        return Strike {
            damage,
            remaining_health: target.health(),
            outcome: Outcome::Killed,
        };
    }

    target.set_health(remaining);
    Strike {
        damage,
        remaining_health: remaining,
        outcome: Outcome::Wounded,
    }
}
