#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Best-first path search over the grid adjacency.
//!
//! The search estimates remaining cost with the squared straight-line
//! distance, which favours heading straight at the goal over guaranteeing the
//! shortest route. Every step costs one. Records are never removed from the
//! open set; once expanded they are re-inserted as visited and sink below all
//! discovered work. Once no discovered work is left the best visited record
//! surfaces twice in a row, which trips the stall guard and ends the search
//! without a path.

mod records;

use grid_skirmish_core::{CellCoord, UnitId};
use grid_skirmish_world::{Grid, GridError};

use crate::records::{OpenSet, RecordArena, StallGuard, VisitStatus};

/// Graph vertex exposed by the pathfinder.
///
/// Two nodes are equal when they refer to the same coordinates.
#[derive(Clone, Copy, Debug)]
pub struct Node {
    coords: CellCoord,
    reachable: bool,
}

impl Node {
    /// Coordinates of the underlying grid cell.
    #[must_use]
    pub const fn coords(&self) -> CellCoord {
        self.coords
    }

    /// Reports whether a unit may step onto the node.
    #[must_use]
    pub const fn is_reachable(&self) -> bool {
        self.reachable
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.coords == other.coords
    }
}

impl Eq for Node {}

/// Read-only search view over a [`Grid`].
#[derive(Clone, Copy, Debug)]
pub struct Pathfinder<'a> {
    grid: &'a Grid,
}

impl<'a> Pathfinder<'a> {
    /// Wraps the provided grid; no state survives between searches.
    #[must_use]
    pub const fn init_graph(grid: &'a Grid) -> Self {
        Self { grid }
    }

    /// Builds the node describing the provided cell.
    pub fn node(&self, coords: CellCoord) -> Result<Node, GridError> {
        let cell = self.grid.at(coords)?;
        Ok(Node {
            coords,
            reachable: cell.is_free(),
        })
    }

    /// Lists the adjacent nodes in topology order; occupied cells are unreachable.
    pub fn neighbors(&self, node: Node) -> Result<Vec<Node>, GridError> {
        Ok(self
            .grid
            .neighbors(node.coords)?
            .map(|cell| Node {
                coords: cell.coords(),
                reachable: cell.is_free(),
            })
            .collect())
    }

    /// Searches for a route from `start` to `goal` through unoccupied cells.
    ///
    /// The returned path begins with `start` and ends with `goal`. An empty
    /// path means no route exists. Coordinates outside the grid are an error.
    pub fn find_path(&self, start: CellCoord, goal: CellCoord) -> Result<Vec<CellCoord>, GridError> {
        self.search(start, goal, &[])
    }

    /// Same as [`Pathfinder::find_path`] but cells held by any of the `ignored`
    /// units count as reachable.
    pub fn find_path_ignoring(
        &self,
        start: CellCoord,
        goal: CellCoord,
        ignored: &[UnitId],
    ) -> Result<Vec<CellCoord>, GridError> {
        self.search(start, goal, ignored)
    }

    fn search(
        &self,
        start: CellCoord,
        goal: CellCoord,
        ignored: &[UnitId],
    ) -> Result<Vec<CellCoord>, GridError> {
        let start_index = self.grid.index_of(start)?;
        let _ = self.grid.index_of(goal)?;

        if start == goal {
            return Ok(vec![start]);
        }

        let mut arena = RecordArena::default();
        let mut open = OpenSet::default();

        let root = arena.insert(start_index, start, estimate(start, goal));
        let _ = arena.discover(root, 0, None);
        open.push(root, arena.get(root));
        let mut guard = StallGuard::default();

        while let Some(entry) = open.pop() {
            if !arena.is_current(&entry) {
                continue;
            }

            let current = entry.slot;
            let progressed = arena.get(current).status == VisitStatus::Discovered;
            if guard.stalled(current, progressed) {
                tracing::warn!(%start, %goal, "path search stalled on the same record; giving up");
                return Ok(Vec::new());
            }

            arena.mark_visited(current);
            open.push(current, arena.get(current));
            if !progressed {
                continue;
            }

            let record = *arena.get(current);
            if record.coords == goal {
                let path = arena.path_to(current);
                tracing::trace!(%start, %goal, steps = path.len() - 1, "path found");
                return Ok(path);
            }

            let tentative = record.cost_so_far + 1;
            for cell in self.grid.neighbors(record.coords)? {
                let reachable = match cell.occupant() {
                    None => true,
                    Some(unit) => ignored.contains(&unit),
                };
                if !reachable {
                    continue;
                }

                let slot = match arena.slot_for_cell(cell.index()) {
                    Some(slot) if arena.get(slot).cost_so_far <= tentative => continue,
                    Some(slot) => slot,
                    None => arena.insert(cell.index(), cell.coords(), estimate(cell.coords(), goal)),
                };
                let _ = arena.discover(slot, tentative, Some(current));
                open.push(slot, arena.get(slot));
            }
        }

        tracing::trace!(%start, %goal, "no path");
        Ok(Vec::new())
    }
}

fn estimate(from: CellCoord, to: CellCoord) -> u64 {
    from.distance_squared(to).unsigned_abs()
}
