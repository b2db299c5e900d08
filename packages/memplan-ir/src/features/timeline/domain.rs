//! Timeline views derived from a parsed module

use std::collections::BTreeMap;

use serde::Serialize;

use crate::shared::models::{Instant, ValueId};

/// Total live bytes per covered instant
///
/// Only instants inside at least one live range appear. `times` and `sizes`
/// are the same data as parallel ascending sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SizeOverTime {
    #[serde(skip)]
    totals: BTreeMap<Instant, u64>,
    times: Vec<Instant>,
    sizes: Vec<u64>,
}

impl SizeOverTime {
    pub fn from_totals(totals: BTreeMap<Instant, u64>) -> Self {
        let times = totals.keys().copied().collect();
        let sizes = totals.values().copied().collect();
        Self {
            totals,
            times,
            sizes,
        }
    }

    pub fn totals(&self) -> &BTreeMap<Instant, u64> {
        &self.totals
    }

    pub fn times(&self) -> &[Instant] {
        &self.times
    }

    pub fn sizes(&self) -> &[u64] {
        &self.sizes
    }

    pub fn total_at(&self, instant: Instant) -> Option<u64> {
        self.totals.get(&instant).copied()
    }

    /// Highest total and the first instant it occurs at
    pub fn max(&self) -> Option<(Instant, u64)> {
        self.times
            .iter()
            .zip(&self.sizes)
            .fold(None, |best: Option<(Instant, u64)>, (&t, &s)| match best {
                Some((_, best_size)) if best_size >= s => best,
                _ => Some((t, s)),
            })
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Derived timeline of one module, computed once when parsing finishes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Timeline {
    pub size_over_time: SizeOverTime,
    /// Instants (not indices) of the significant local maxima, ascending
    pub allocation_peaks: Vec<Instant>,
    /// Largest sequence index of any value, 0 when none is set
    pub largest_sequence_value: u64,
}

/// The values alive at one peak, largest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeakSnapshot {
    pub instant: Instant,
    pub total_bytes: u64,
    pub values: Vec<ValueId>,
    /// Subset of `values` above the module's large-array threshold
    pub large_values: Vec<ValueId>,
}
