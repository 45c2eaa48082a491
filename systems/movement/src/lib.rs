#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Move selection for units advancing toward an opponent.
//!
//! A [`MoveSelector`] only proposes the next cell; applying the move to the
//! grid is the engine's job.

use std::fmt;

use grid_skirmish_core::{CellCoord, MoveStrategy, UnitId};
use grid_skirmish_system_pathfinding::Pathfinder;
use grid_skirmish_world::{Grid, GridError};

/// Everything a selector needs to know about one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepRequest {
    /// Unit that wants to move.
    pub unit: UnitId,
    /// Cell the unit currently occupies.
    pub from: CellCoord,
    /// Opponent the unit is advancing toward.
    pub target: UnitId,
    /// Cell the opponent occupies.
    pub target_position: CellCoord,
}

/// Strategy that chooses the neighboring cell a unit steps into.
pub trait MoveSelector: fmt::Debug {
    /// Proposes an unoccupied neighbor of `request.from`, or `None` when the
    /// unit cannot get closer.
    fn next_cell(&self, grid: &Grid, request: &StepRequest) -> Result<Option<CellCoord>, GridError>;
}

/// Steps to the free neighbor that strictly reduces the squared distance the most.
///
/// Ties keep the neighbor that comes first in topology order.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyStep;

impl MoveSelector for GreedyStep {
    fn next_cell(&self, grid: &Grid, request: &StepRequest) -> Result<Option<CellCoord>, GridError> {
        let mut least = request.from.distance_squared(request.target_position);
        let mut best = None;

        for cell in grid.neighbors(request.from)? {
            if !cell.is_free() {
                continue;
            }
            let distance = cell.coords().distance_squared(request.target_position);
            if distance < least {
                least = distance;
                best = Some(cell.coords());
            }
        }

        Ok(best)
    }
}

/// Steps to the second cell of a route found by the [`Pathfinder`].
///
/// The target's own cell counts as passable during the search so the route
/// can end on it; the step itself never enters an occupied cell. When the
/// target is already adjacent the greedy rule picks the step.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathfindingStep;

impl MoveSelector for PathfindingStep {
    fn next_cell(&self, grid: &Grid, request: &StepRequest) -> Result<Option<CellCoord>, GridError> {
        let path = Pathfinder::init_graph(grid).find_path_ignoring(
            request.from,
            request.target_position,
            &[request.target],
        )?;

        let Some(&next) = path.get(1) else {
            tracing::debug!(unit = %request.unit, target = %request.target, "no route to target");
            return Ok(None);
        };
        if next == request.target_position {
            // Adjacent but out of reach, e.g. diagonally on an octagonal grid.
            return GreedyStep.next_cell(grid, request);
        }
        if grid.occupant(next)?.is_some() {
            return Ok(None);
        }
        Ok(Some(next))
    }
}

/// Returns the selector implementing the provided strategy.
#[must_use]
pub fn selector_for(strategy: MoveStrategy) -> Box<dyn MoveSelector> {
    match strategy {
        MoveStrategy::Greedy => Box::new(GreedyStep),
        MoveStrategy::Pathfinding => Box::new(PathfindingStep),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_skirmish_core::Topology;

    fn request(from: (i32, i32), target_position: (i32, i32)) -> StepRequest {
        StepRequest {
            unit: UnitId::new(0),
            from: from.into(),
            target: UnitId::new(1),
            target_position: target_position.into(),
        }
    }

    fn grid_with_units(topology: Topology, request: &StepRequest) -> Grid {
        let mut grid = Grid::new(6, 6, topology);
        grid.occupy(request.from, request.unit).expect("cell is free");
        grid.occupy(request.target_position, request.target)
            .expect("cell is free");
        grid
    }

    #[test]
    fn greedy_moves_straight_at_the_target() {
        let request = request((0, 0), (4, 0));
        let grid = grid_with_units(Topology::Rectangular, &request);

        let next = GreedyStep.next_cell(&grid, &request).expect("on grid");

        assert_eq!(next, Some(CellCoord::new(1, 0)));
    }

    #[test]
    fn greedy_uses_diagonals_when_available() {
        let request = request((0, 0), (3, 3));
        let grid = grid_with_units(Topology::Octagonal, &request);

        let next = GreedyStep.next_cell(&grid, &request).expect("on grid");

        assert_eq!(next, Some(CellCoord::new(1, 1)));
    }

    #[test]
    fn greedy_reports_blocked_when_nothing_is_closer() {
        let request = request((0, 0), (3, 0));
        let mut grid = grid_with_units(Topology::Rectangular, &request);
        grid.occupy(CellCoord::new(1, 0), UnitId::new(5))
            .expect("cell is free");

        let next = GreedyStep.next_cell(&grid, &request).expect("on grid");

        assert_eq!(next, None);
    }

    #[test]
    fn greedy_never_enters_the_target_cell() {
        let request = request((0, 0), (1, 0));
        let grid = grid_with_units(Topology::Rectangular, &request);

        let next = GreedyStep.next_cell(&grid, &request).expect("on grid");

        assert_eq!(next, None);
    }

    #[test]
    fn pathfinding_detours_around_blockers() {
        let request = request((0, 0), (3, 0));
        let mut grid = grid_with_units(Topology::Rectangular, &request);
        grid.occupy(CellCoord::new(1, 0), UnitId::new(5))
            .expect("cell is free");

        let next = PathfindingStep.next_cell(&grid, &request).expect("on grid");

        assert_eq!(next, Some(CellCoord::new(0, 1)));
    }

    #[test]
    fn pathfinding_stays_put_next_to_the_target() {
        let request = request((2, 2), (3, 2));
        let grid = grid_with_units(Topology::Rectangular, &request);

        let next = PathfindingStep.next_cell(&grid, &request).expect("on grid");

        assert_eq!(next, None);
    }

    #[test]
    fn pathfinding_squares_up_to_a_diagonal_target() {
        let request = request((2, 2), (3, 3));
        let grid = grid_with_units(Topology::Octagonal, &request);

        let next = PathfindingStep.next_cell(&grid, &request).expect("on grid");

        assert_eq!(next, Some(CellCoord::new(2, 3)));
    }

    #[test]
    fn selector_matches_strategy() {
        let request = request((0, 0), (4, 0));
        let grid = grid_with_units(Topology::Rectangular, &request);

        for strategy in [MoveStrategy::Greedy, MoveStrategy::Pathfinding] {
            let next = selector_for(strategy)
                .next_cell(&grid, &request)
                .expect("on grid");
            assert_eq!(next, Some(CellCoord::new(1, 0)), "{strategy:?}");
        }
    }
}
