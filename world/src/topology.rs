//! Neighbor offset tables keyed by topology.
//!
//! ```text
//! NW NN NE | (-1, 1)  (0, 1)  (1, 1)
//! WW OO EE | (-1, 0)  (0, 0)  (1, 0)
//! SW SS SE | (-1,-1)  (0,-1)  (1,-1)
//! ```
//!
//! The order inside each table is the order neighbors are reported in, and
//! therefore the tie-break order for movement and path search.

use grid_skirmish_core::Topology;

const RECTANGULAR: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

const HEXAGONAL: [(i32, i32); 6] = [(1, 0), (-1, 0), (1, 1), (1, -1), (-1, 1), (-1, -1)];

const OCTAGONAL: [(i32, i32); 8] = [
    (-1, 1),
    (0, 1),
    (1, 1),
    (-1, 0),
    (1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Coordinate offsets `(dx, dy)` that reach the neighbors of a cell.
#[must_use]
pub const fn neighbor_offsets(topology: Topology) -> &'static [(i32, i32)] {
    match topology {
        Topology::Rectangular => &RECTANGULAR,
        Topology::Hexagonal => &HEXAGONAL,
        Topology::Octagonal => &OCTAGONAL,
    }
}
