#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative spatial grid for Grid Skirmish.
//!
//! The [`Grid`] owns a dense, row-major array of [`Cell`] values. Each cell
//! knows its coordinates, its linear index and at most one occupying
//! [`UnitId`]. The grid never owns units; it only records which handle sits
//! where. Out-of-bounds access is an invariant violation reported as a
//! [`GridError`] and is never clamped or wrapped.

mod spawn_pool;
mod topology;

use std::{fmt, ops::Index};

use grid_skirmish_core::{CellCoord, Topology, UnitId};
use rand::Rng;

use crate::spawn_pool::FreeCellPool;

pub use topology::neighbor_offsets;

/// Invariant violations reported by grid accessors.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// The grid has no cells because it was never initialised.
    #[error("grid used before initialisation")]
    Uninitialized,
    /// Coordinates fall outside the configured dimensions.
    #[error("coordinates {coords} lie outside the {size_x}x{size_y} grid")]
    OutOfBounds {
        /// Offending coordinates.
        coords: CellCoord,
        /// Column count of the grid.
        size_x: u32,
        /// Row count of the grid.
        size_y: u32,
    },
    /// A linear index falls outside the cell array.
    #[error("index {index} is outside a grid of {len} cells")]
    IndexOutOfBounds {
        /// Offending index.
        index: usize,
        /// Number of cells in the grid.
        len: usize,
    },
    /// A unit was placed onto a cell that already holds another unit.
    #[error("cell {coords} is already occupied by {occupant}")]
    Occupied {
        /// Coordinates of the contested cell.
        coords: CellCoord,
        /// Unit already occupying the cell.
        occupant: UnitId,
    },
}

/// One addressable grid position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    coords: CellCoord,
    index: usize,
    occupant: Option<UnitId>,
}

impl Cell {
    /// Coordinates of the cell.
    #[must_use]
    pub const fn coords(&self) -> CellCoord {
        self.coords
    }

    /// Linear index of the cell inside the grid.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Unit currently standing on the cell, if any.
    #[must_use]
    pub const fn occupant(&self) -> Option<UnitId> {
        self.occupant
    }

    /// Reports whether the cell is free for traversal.
    #[must_use]
    pub const fn is_free(&self) -> bool {
        self.occupant.is_none()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Index:{}, X:{}, Y:{}, Unit:",
            self.index,
            self.coords.x(),
            self.coords.y()
        )?;
        match self.occupant {
            Some(unit) => write!(f, "{unit}"),
            None => f.write_str("none"),
        }
    }
}

/// Fixed-size two dimensional grid of cells.
#[derive(Clone, Debug, Default)]
pub struct Grid {
    cells: Vec<Cell>,
    size_x: u32,
    size_y: u32,
    topology: Topology,
    free_cells: FreeCellPool,
}

impl Grid {
    /// Creates and initialises a grid with the provided dimensions.
    #[must_use]
    pub fn new(size_x: u32, size_y: u32, topology: Topology) -> Self {
        let mut grid = Self::default();
        grid.init(size_x, size_y, topology);
        grid
    }

    /// Allocates `size_x * size_y` cells in row-major order.
    ///
    /// Re-initialising discards all occupancy and any pending spawning phase.
    pub fn init(&mut self, size_x: u32, size_y: u32, topology: Topology) {
        let width = usize::try_from(size_x).unwrap_or(0);
        let height = usize::try_from(size_y).unwrap_or(0);
        let capacity = width.checked_mul(height).unwrap_or(0);

        self.size_x = size_x;
        self.size_y = size_y;
        self.topology = topology;
        self.free_cells.clear();
        self.cells.clear();
        self.cells.reserve(capacity);

        for row in 0..size_y {
            for column in 0..size_x {
                let index = self.cells.len();
                self.cells.push(Cell {
                    coords: CellCoord::new(column as i32, row as i32),
                    index,
                    occupant: None,
                });
            }
        }
    }

    /// Number of columns.
    #[must_use]
    pub const fn size_x(&self) -> u32 {
        self.size_x
    }

    /// Number of rows.
    #[must_use]
    pub const fn size_y(&self) -> u32 {
        self.size_y
    }

    /// Adjacency pattern fixed at initialisation.
    #[must_use]
    pub const fn topology(&self) -> Topology {
        self.topology
    }

    /// All cells in index order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Reports whether the coordinates lie inside the grid.
    #[must_use]
    pub fn is_on_grid(&self, coords: CellCoord) -> bool {
        coords.x() >= 0
            && coords.y() >= 0
            && (coords.x() as u32) < self.size_x
            && (coords.y() as u32) < self.size_y
    }

    /// Converts coordinates into the linear cell index.
    pub fn index_of(&self, coords: CellCoord) -> Result<usize, GridError> {
        self.require(coords)?;
        let width = self.size_x as usize;
        Ok(coords.y() as usize * width + coords.x() as usize)
    }

    /// Converts a linear cell index back into coordinates.
    pub fn coords_of(&self, index: usize) -> Result<CellCoord, GridError> {
        self.at_index(index).map(Cell::coords)
    }

    /// Returns the cell at the provided coordinates.
    pub fn at(&self, coords: CellCoord) -> Result<&Cell, GridError> {
        let index = self.index_of(coords)?;
        Ok(&self.cells[index])
    }

    /// Returns the cell at the provided coordinates for mutation.
    ///
    /// [`Cell`] exposes no setters; occupancy only changes through
    /// [`Grid::occupy`] and [`Grid::vacate`].
    pub fn at_mut(&mut self, coords: CellCoord) -> Result<&mut Cell, GridError> {
        let index = self.index_of(coords)?;
        Ok(&mut self.cells[index])
    }

    /// Returns the cell stored at the provided linear index.
    pub fn at_index(&self, index: usize) -> Result<&Cell, GridError> {
        if self.cells.is_empty() {
            return Err(GridError::Uninitialized);
        }
        self.cells.get(index).ok_or(GridError::IndexOutOfBounds {
            index,
            len: self.cells.len(),
        })
    }

    /// Enumerates the on-grid neighbors of a cell in offset-table order.
    ///
    /// The returned cells are borrowed snapshots; mutate occupancy through
    /// [`Grid::occupy`] and [`Grid::vacate`].
    pub fn neighbors(
        &self,
        coords: CellCoord,
    ) -> Result<impl Iterator<Item = &Cell> + '_, GridError> {
        self.require(coords)?;
        Ok(neighbor_offsets(self.topology)
            .iter()
            .filter_map(move |&(dx, dy)| {
                let neighbor = coords.offset(dx, dy);
                self.index_of(neighbor).ok().map(|index| &self.cells[index])
            }))
    }

    /// Returns the unit standing on the provided cell, if any.
    pub fn occupant(&self, coords: CellCoord) -> Result<Option<UnitId>, GridError> {
        self.at(coords).map(Cell::occupant)
    }

    /// Places `unit` onto the cell; refuses cells held by a different unit.
    pub fn occupy(&mut self, coords: CellCoord, unit: UnitId) -> Result<(), GridError> {
        let cell = self.at_mut(coords)?;
        match cell.occupant {
            Some(occupant) if occupant != unit => Err(GridError::Occupied { coords, occupant }),
            _ => {
                cell.occupant = Some(unit);
                Ok(())
            }
        }
    }

    /// Clears the cell, returning the unit that stood there.
    pub fn vacate(&mut self, coords: CellCoord) -> Result<Option<UnitId>, GridError> {
        Ok(self.at_mut(coords)?.occupant.take())
    }

    /// Snapshots every cell into the free-cell pool.
    ///
    /// Must bracket any batch placement together with
    /// [`Grid::end_spawning_phase`].
    pub fn begin_spawning_phase(&mut self) {
        self.free_cells.refill(self.cells.len());
    }

    /// Clears the free-cell pool.
    pub fn end_spawning_phase(&mut self) {
        self.free_cells.clear();
    }

    /// Number of cells still available in the current spawning phase.
    #[must_use]
    pub fn free_cell_count(&self) -> usize {
        self.free_cells.len()
    }

    /// Removes and returns a uniformly random entry from the free-cell pool.
    ///
    /// Returns `None` once the pool is exhausted or outside a spawning phase.
    /// Entries are drawn without replacement even when nothing was placed on
    /// a previously drawn cell.
    pub fn pick_random_free_cell<R>(&mut self, rng: &mut R) -> Option<Cell>
    where
        R: Rng + ?Sized,
    {
        let index = self.free_cells.draw(rng)?;
        let cell = *self.cells.get(index)?;
        if let Some(occupant) = cell.occupant {
            tracing::debug!(cell = %cell.coords, %occupant, "drew an occupied cell from the free pool");
        }
        Some(cell)
    }

    /// Logs every cell at debug level.
    pub fn debug_dump(&self) {
        for cell in &self.cells {
            tracing::debug!("{cell}");
        }
    }

    fn require(&self, coords: CellCoord) -> Result<(), GridError> {
        if self.cells.is_empty() {
            return Err(GridError::Uninitialized);
        }
        if !self.is_on_grid(coords) {
            return Err(GridError::OutOfBounds {
                coords,
                size_x: self.size_x,
                size_y: self.size_y,
            });
        }
        Ok(())
    }
}

impl Index<CellCoord> for Grid {
    type Output = Cell;

    fn index(&self, coords: CellCoord) -> &Self::Output {
        match self.at(coords) {
            Ok(cell) => cell,
            Err(error) => panic!("{error}"),
        }
    }
}

impl Index<usize> for Grid {
    type Output = Cell;

    fn index(&self, index: usize) -> &Self::Output {
        match self.at_index(index) {
            Ok(cell) => cell,
            Err(error) => panic!("{error}"),
        }
    }
}
