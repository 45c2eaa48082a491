#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that picks the nearest living opponent for a unit.

use grid_skirmish_core::{CellCoord, UnitId, UnitSnapshot};

/// Squared distance at which no closer opponent can exist on the grid.
const ADJACENT_DISTANCE_SQUARED: i64 = 1;

/// Opponent chosen for a seeking unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Target {
    /// Handle of the chosen opponent.
    pub unit: UnitId,
    /// Cell the opponent occupies.
    pub position: CellCoord,
    /// Squared distance between seeker and opponent.
    pub distance_squared: i64,
}

impl Target {
    /// Reports whether an attack with the provided reach lands on the target.
    #[must_use]
    pub fn within_reach(&self, attack_range: u32) -> bool {
        let reach = i64::from(attack_range);
        self.distance_squared <= reach * reach
    }
}

/// Scans `candidates` in order for the closest living unit of another team.
///
/// The first candidate encountered wins ties. The scan stops early once an
/// adjacent opponent is found.
pub fn closest_opponent<I>(seeker: &UnitSnapshot, candidates: I) -> Option<Target>
where
    I: IntoIterator<Item = UnitSnapshot>,
{
    let mut best: Option<Target> = None;

    for candidate in candidates {
        if candidate.id == seeker.id || !candidate.alive || candidate.team == seeker.team {
            continue;
        }

        let distance_squared = seeker.position.distance_squared(candidate.position);
        let closer = best.map_or(true, |current| distance_squared < current.distance_squared);
        if !closer {
            continue;
        }

        best = Some(Target {
            unit: candidate.id,
            position: candidate.position,
            distance_squared,
        });
        if distance_squared <= ADJACENT_DISTANCE_SQUARED {
            break;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_skirmish_core::TeamId;

    fn snapshot(id: u32, team: u32, position: (i32, i32)) -> UnitSnapshot {
        UnitSnapshot {
            id: UnitId::new(id),
            team: TeamId::new(team),
            position: position.into(),
            health: 5.0,
            attack_power: 1.0,
            attack_range: 1,
            alive: true,
        }
    }

    #[test]
    fn picks_the_nearest_opponent() {
        let seeker = snapshot(0, 0, (0, 0));
        let candidates = vec![
            seeker,
            snapshot(1, 1, (5, 5)),
            snapshot(2, 1, (2, 1)),
            snapshot(3, 1, (4, 0)),
        ];

        let target = closest_opponent(&seeker, candidates).expect("opponents exist");

        assert_eq!(target.unit, UnitId::new(2));
        assert_eq!(target.position, CellCoord::new(2, 1));
        assert_eq!(target.distance_squared, 5);
    }

    #[test]
    fn allies_and_dead_units_are_ignored() {
        let seeker = snapshot(0, 0, (0, 0));
        let mut fallen = snapshot(2, 1, (0, 1));
        fallen.alive = false;
        let candidates = vec![snapshot(1, 0, (1, 0)), fallen, snapshot(3, 1, (3, 3))];

        let target = closest_opponent(&seeker, candidates).expect("one opponent alive");

        assert_eq!(target.unit, UnitId::new(3));
    }

    #[test]
    fn first_candidate_wins_ties() {
        let seeker = snapshot(0, 0, (2, 2));
        let candidates = vec![snapshot(7, 1, (4, 2)), snapshot(3, 1, (0, 2))];

        let target = closest_opponent(&seeker, candidates).expect("opponents exist");

        assert_eq!(target.unit, UnitId::new(7));
    }

    #[test]
    fn adjacent_opponent_ends_the_scan() {
        let seeker = snapshot(0, 0, (1, 1));
        let candidates = vec![snapshot(1, 1, (1, 2)), snapshot(2, 1, (1, 1))];

        let target = closest_opponent(&seeker, candidates).expect("opponents exist");

        assert_eq!(target.unit, UnitId::new(1));
    }

    #[test]
    fn no_opponents_yields_none() {
        let seeker = snapshot(0, 0, (0, 0));
        assert_eq!(closest_opponent(&seeker, vec![seeker]), None);
        assert_eq!(closest_opponent(&seeker, Vec::new()), None);
    }

    #[test]
    fn reach_compares_squared_distances() {
        let target = Target {
            unit: UnitId::new(1),
            position: CellCoord::new(1, 1),
            distance_squared: 2,
        };
        assert!(!target.within_reach(1));
        assert!(target.within_reach(2));
    }
}
