//! Transient pool of candidate cells drawn from during a spawning phase.

use rand::Rng;

/// Cell indices still available for placement in the current spawning phase.
///
/// Draws are without replacement for the whole phase: a drawn index never
/// comes back until the pool is refilled, whether or not a unit was placed.
#[derive(Clone, Debug, Default)]
pub(crate) struct FreeCellPool {
    indices: Vec<usize>,
}

impl FreeCellPool {
    pub(crate) fn refill(&mut self, cell_count: usize) {
        self.indices.clear();
        self.indices.extend(0..cell_count);
    }

    pub(crate) fn clear(&mut self) {
        self.indices.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.indices.len()
    }

    /// Removes one index chosen uniformly at random.
    ///
    /// Remaining indices keep their relative order so a given RNG stream
    /// always yields the same sequence.
    pub(crate) fn draw<R>(&mut self, rng: &mut R) -> Option<usize>
    where
        R: Rng + ?Sized,
    {
        if self.indices.is_empty() {
            return None;
        }
        let slot = rng.gen_range(0..self.indices.len());
        Some(self.indices.remove(slot))
    }
}
