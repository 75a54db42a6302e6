//! Per-cell energy deposits and the per-event hit index.

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cell::CellId;

/// Reconstructed energy deposit in a single cell.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HitRecord {
    /// Cell the energy was read out from.
    pub cell: CellId,
    /// Deposited energy (GeV).
    pub energy: f64,
}

impl HitRecord {
    /// Creates a new hit record.
    #[inline]
    #[must_use]
    pub fn new(cell: CellId, energy: f64) -> Self {
        Self { cell, energy }
    }
}

/// Lookup of one region's hits for one event, keyed by cell.
///
/// The index is built once and never mutated; a new index is created for
/// every event. If a cell appears more than once the first record wins.
#[derive(Debug, Clone, Default)]
pub struct HitIndex {
    hits: Vec<HitRecord>,
    by_cell: HashMap<CellId, usize>,
}

impl HitIndex {
    /// Builds an index over the given hits.
    #[must_use]
    pub fn new(hits: Vec<HitRecord>) -> Self {
        let mut by_cell = HashMap::with_capacity(hits.len());
        for (idx, hit) in hits.iter().enumerate() {
            by_cell.entry(hit.cell).or_insert(idx);
        }
        Self { hits, by_cell }
    }

    /// Returns the hit recorded in `cell`, if any.
    #[inline]
    #[must_use]
    pub fn lookup(&self, cell: &CellId) -> Option<&HitRecord> {
        self.by_cell.get(cell).map(|&idx| &self.hits[idx])
    }

    /// Sums the energy recorded in the given cells. Cells without a hit
    /// contribute nothing.
    pub fn energy_sum<'a, I>(&self, cells: I) -> f64
    where
        I: IntoIterator<Item = &'a CellId>,
    {
        cells
            .into_iter()
            .filter_map(|cell| self.lookup(cell))
            .map(|hit| hit.energy)
            .sum()
    }

    /// Returns the number of hits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Returns true if no hits were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Returns an iterator over the hits in input order.
    pub fn iter(&self) -> impl Iterator<Item = &HitRecord> {
        self.hits.iter()
    }
}

impl FromIterator<HitRecord> for HitIndex {
    fn from_iter<I: IntoIterator<Item = HitRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
