//! Timeline analyzer: live ranges → bytes over time → peaks
//!
//! Total bytes per instant are accumulated with a sweep line: each live
//! range `[lo, hi]` contributes `+size` at `lo` and `-size` at `hi + 1`.
//! Instants between consecutive boundaries share one total, so only
//! boundaries are sorted (O(n log n)); the output still lists every covered
//! instant.

use std::collections::BTreeMap;

use tracing::debug;

use super::domain::{SizeOverTime, Timeline};
use super::peaks::find_peaks;
use crate::config::PeakConfig;
use crate::shared::models::{Instant, Value};

#[derive(Debug, Clone, Copy, Default)]
struct Boundary {
    added: u64,
    removed: u64,
    opened: usize,
    closed: usize,
}

/// Stateless analyzer; the timeline is a pure function of the values
#[derive(Debug, Clone, Copy, Default)]
pub struct TimelineAnalyzer {
    peaks: PeakConfig,
}

impl TimelineAnalyzer {
    pub fn new(peaks: PeakConfig) -> Self {
        Self { peaks }
    }

    pub fn analyze<'a>(&self, values: impl IntoIterator<Item = &'a Value> + Clone) -> Timeline {
        let size_over_time = Self::size_over_time(values.clone());
        let allocation_peaks = find_peaks(size_over_time.sizes(), self.peaks.prominence_ratio)
            .into_iter()
            .map(|index| size_over_time.times()[index])
            .collect::<Vec<_>>();
        let largest_sequence_value = values
            .into_iter()
            .filter_map(|v| v.sequence)
            .max()
            .unwrap_or(0);

        debug!(
            "timeline: {} instants, {} peaks, largest sequence {}",
            size_over_time.len(),
            allocation_peaks.len(),
            largest_sequence_value
        );

        Timeline {
            size_over_time,
            allocation_peaks,
            largest_sequence_value,
        }
    }

    /// Sum of live sizes at every instant covered by some live range
    pub fn size_over_time<'a>(values: impl IntoIterator<Item = &'a Value>) -> SizeOverTime {
        let mut boundaries: BTreeMap<Instant, Boundary> = BTreeMap::new();
        for value in values {
            let Some(range) = value.live_range else {
                continue;
            };
            let open = boundaries.entry(range.start()).or_default();
            open.added += value.size;
            open.opened += 1;

            let close = boundaries.entry(range.end_exclusive()).or_default();
            close.removed += value.size;
            close.closed += 1;
        }

        let mut totals = BTreeMap::new();
        let mut live_bytes: u64 = 0;
        let mut live_count: usize = 0;
        let mut iter = boundaries.into_iter().peekable();
        while let Some((instant, boundary)) = iter.next() {
            live_bytes = live_bytes + boundary.added - boundary.removed;
            live_count = live_count + boundary.opened - boundary.closed;
            if live_count == 0 {
                continue;
            }
            let Some(&(next, _)) = iter.peek() else {
                break;
            };
            for t in instant..next {
                totals.insert(t, live_bytes);
            }
        }

        SizeOverTime::from_totals(totals)
    }
}
