//! Per-search bookkeeping: the record arena and the versioned open set.

use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap},
};

use grid_skirmish_core::CellCoord;

/// Progress of a record through the search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum VisitStatus {
    Unvisited,
    Discovered,
    Visited,
}

/// Search state attached to one grid cell.
#[derive(Clone, Copy, Debug)]
pub(crate) struct NodeRecord {
    pub(crate) coords: CellCoord,
    pub(crate) heuristic: u64,
    pub(crate) cost_so_far: u64,
    pub(crate) estimated_total_cost: u64,
    pub(crate) parent: Option<usize>,
    pub(crate) status: VisitStatus,
    version: u32,
}

/// Records owned by a single search, addressed by arena slot.
#[derive(Debug, Default)]
pub(crate) struct RecordArena {
    records: Vec<NodeRecord>,
    by_cell: HashMap<usize, usize>,
}

impl RecordArena {
    pub(crate) fn slot_for_cell(&self, cell_index: usize) -> Option<usize> {
        self.by_cell.get(&cell_index).copied()
    }

    pub(crate) fn get(&self, slot: usize) -> &NodeRecord {
        &self.records[slot]
    }

    /// Adds an unvisited record for a cell that has not been seen yet.
    pub(crate) fn insert(&mut self, cell_index: usize, coords: CellCoord, heuristic: u64) -> usize {
        let slot = self.records.len();
        self.records.push(NodeRecord {
            coords,
            heuristic,
            cost_so_far: 0,
            estimated_total_cost: heuristic,
            parent: None,
            status: VisitStatus::Unvisited,
            version: 0,
        });
        let _ = self.by_cell.insert(cell_index, slot);
        slot
    }

    /// Marks the record discovered through `parent` at the provided cost.
    ///
    /// Returns `true` when the record was not already awaiting expansion.
    /// Every call invalidates open-set entries pushed for earlier states.
    pub(crate) fn discover(&mut self, slot: usize, cost_so_far: u64, parent: Option<usize>) -> bool {
        let record = &mut self.records[slot];
        let newly_open = record.status != VisitStatus::Discovered;
        record.cost_so_far = cost_so_far;
        record.estimated_total_cost = cost_so_far.saturating_add(record.heuristic);
        record.parent = parent;
        record.status = VisitStatus::Discovered;
        record.version = record.version.wrapping_add(1);
        newly_open
    }

    pub(crate) fn mark_visited(&mut self, slot: usize) {
        self.records[slot].status = VisitStatus::Visited;
    }

    pub(crate) fn is_current(&self, entry: &OpenEntry) -> bool {
        self.records[entry.slot].version == entry.version
    }

    /// Walks parent links from `slot` back to the root, root first.
    pub(crate) fn path_to(&self, slot: usize) -> Vec<CellCoord> {
        let mut path = Vec::new();
        let mut cursor = Some(slot);
        while let Some(current) = cursor {
            let record = &self.records[current];
            path.push(record.coords);
            cursor = record.parent;
        }
        path.reverse();
        path
    }
}

/// Heap entry describing a record as it looked when it was pushed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct OpenEntry {
    pub(crate) slot: usize,
    discovered: bool,
    estimated_total_cost: u64,
    sequence: u64,
    version: u32,
}

impl Ord for OpenEntry {
    // BinaryHeap pops the greatest entry: discovered first, then the cheapest
    // estimate, then the newest insertion.
    fn cmp(&self, other: &Self) -> Ordering {
        self.discovered
            .cmp(&other.discovered)
            .then_with(|| other.estimated_total_cost.cmp(&self.estimated_total_cost))
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority structure records are inserted into and never removed from.
///
/// Changing a record's state pushes a fresh entry; entries describing an
/// outdated version are skipped by the caller.
#[derive(Debug, Default)]
pub(crate) struct OpenSet {
    heap: BinaryHeap<OpenEntry>,
    next_sequence: u64,
}

impl OpenSet {
    pub(crate) fn push(&mut self, slot: usize, record: &NodeRecord) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(OpenEntry {
            slot,
            discovered: record.status == VisitStatus::Discovered,
            estimated_total_cost: record.estimated_total_cost,
            sequence,
            version: record.version,
        });
    }

    pub(crate) fn pop(&mut self) -> Option<OpenEntry> {
        self.heap.pop()
    }
}

/// Detects the same record being popped twice in a row without progress.
#[derive(Debug, Default)]
pub(crate) struct StallGuard {
    previous: Option<usize>,
}

impl StallGuard {
    /// Records a pop and reports whether the search should give up.
    pub(crate) fn stalled(&mut self, slot: usize, progressed: bool) -> bool {
        let repeated = self.previous.replace(slot) == Some(slot);
        repeated && !progressed
    }
}
