//! Per-module aggregate of allocations, values and derived timeline
//!
//! `ModuleStats` is only built by the report parser. Once the parse
//! finishes, the builder is frozen: the timeline is computed eagerly and the
//! aggregate exposes read-only accessors from then on.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::allocation::{Allocation, AllocationId};
use super::value::{Instant, LiveRange, Value, ValueDetailed, ValueId};
use crate::config::PeakConfig;
use crate::features::report_parsing::ReportErrorKind;
use crate::features::timeline::{PeakSnapshot, SizeOverTime, Timeline, TimelineAnalyzer};

/// Module id and name as encoded in the dump file name
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleIdentity {
    pub id: u64,
    pub name: String,
}

impl ModuleIdentity {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Values sharing one `(allocation, size, offset)` slot over the program
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BufferSlot {
    pub alloc_id: AllocationId,
    pub size: u64,
    pub offset: u64,
    pub values: Vec<ValueId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleStats {
    identity: ModuleIdentity,
    allocations: BTreeMap<AllocationId, Arc<Allocation>>,
    values: BTreeMap<ValueId, Value>,
    used_values: BTreeSet<ValueId>,
    value_name_to_id: BTreeMap<String, ValueId>,
    value_id_to_name: BTreeMap<ValueId, String>,
    total_allocation: u64,
    /// Values strictly larger than this many bytes count as large arrays
    large_array_threshold: u64,
    timeline: Timeline,
}

impl ModuleStats {
    pub fn identity(&self) -> &ModuleIdentity {
        &self.identity
    }

    pub fn id(&self) -> u64 {
        self.identity.id
    }

    pub fn name(&self) -> &str {
        &self.identity.name
    }

    pub fn allocations(&self) -> &BTreeMap<AllocationId, Arc<Allocation>> {
        &self.allocations
    }

    pub fn values(&self) -> &BTreeMap<ValueId, Value> {
        &self.values
    }

    pub fn value(&self, id: ValueId) -> Option<&Value> {
        self.values.get(&id)
    }

    pub fn value_by_name(&self, name: &str) -> Option<&Value> {
        self.value_name_to_id
            .get(name)
            .and_then(|id| self.values.get(id))
    }

    pub fn value_name_to_id(&self) -> &BTreeMap<String, ValueId> {
        &self.value_name_to_id
    }

    pub fn value_id_to_name(&self) -> &BTreeMap<ValueId, String> {
        &self.value_id_to_name
    }

    pub fn used_value_ids(&self) -> &BTreeSet<ValueId> {
        &self.used_values
    }

    /// Detailed records from the "Used values:" section, by id
    pub fn used_values(&self) -> impl Iterator<Item = &ValueDetailed> {
        self.used_values
            .iter()
            .filter_map(|id| self.values.get(id)?.value_detailed.as_ref())
    }

    /// Sum of all allocation sizes
    pub fn total_allocation(&self) -> u64 {
        self.total_allocation
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn size_over_time(&self) -> &SizeOverTime {
        &self.timeline.size_over_time
    }

    pub fn allocation_peaks(&self) -> &[Instant] {
        &self.timeline.allocation_peaks
    }

    pub fn largest_sequence_value(&self) -> u64 {
        self.timeline.largest_sequence_value
    }

    /// Values alive at `instant`, largest first (ties by id)
    pub fn values_at(&self, instant: Instant) -> Vec<&Value> {
        let mut alive: Vec<&Value> = self
            .values
            .values()
            .filter(|v| v.alive_at(instant))
            .collect();
        alive.sort_by(|a, b| b.size.cmp(&a.size).then(a.id.cmp(&b.id)));
        alive
    }

    /// Live values at `instant`, with the large arrays among them
    pub fn snapshot_at(&self, instant: Instant) -> PeakSnapshot {
        let alive = self.values_at(instant);
        PeakSnapshot {
            instant,
            total_bytes: self.size_over_time().total_at(instant).unwrap_or(0),
            values: alive.iter().map(|v| v.id).collect(),
            large_values: alive
                .iter()
                .filter(|v| v.is_large_array(self.large_array_threshold))
                .map(|v| v.id)
                .collect(),
        }
    }

    pub fn peak_snapshots(&self) -> Vec<PeakSnapshot> {
        self.timeline
            .allocation_peaks
            .iter()
            .map(|&instant| self.snapshot_at(instant))
            .collect()
    }

    /// Snapshot at the global maximum of the timeline (first instant on ties)
    ///
    /// Unlike `peak_snapshots`, this ignores prominence: a module whose curve
    /// only rises still has a main peak.
    pub fn main_peak(&self) -> Option<PeakSnapshot> {
        let (instant, _) = self.size_over_time().max()?;
        Some(self.snapshot_at(instant))
    }

    /// The `n` largest values, largest first (ties by id)
    pub fn largest_values(&self, n: usize) -> Vec<&Value> {
        let mut ordered: Vec<&Value> = self.values.values().collect();
        ordered.sort_by(|a, b| b.size.cmp(&a.size).then(a.id.cmp(&b.id)));
        ordered.truncate(n);
        ordered
    }

    pub fn large_array_threshold(&self) -> u64 {
        self.large_array_threshold
    }

    /// Values above the configured large-array threshold
    pub fn large_arrays(&self) -> impl Iterator<Item = &Value> {
        self.large_values(self.large_array_threshold)
    }

    pub fn large_values(&self, threshold: u64) -> impl Iterator<Item = &Value> {
        self.values.values().filter(move |v| v.is_large_array(threshold))
    }

    /// Values grouped by the buffer slot they occupy, largest slot first
    ///
    /// A slot with several values shows the buffer assigner reusing memory
    /// across the program.
    pub fn buffer_reuse_groups(&self) -> Vec<BufferSlot> {
        let mut slots: BTreeMap<(AllocationId, u64, u64), Vec<ValueId>> = BTreeMap::new();
        for value in self.values.values() {
            slots
                .entry((value.allocation.alloc_id, value.size, value.offset))
                .or_default()
                .push(value.id);
        }

        let mut groups: Vec<BufferSlot> = slots
            .into_iter()
            .map(|((alloc_id, size, offset), values)| BufferSlot {
                alloc_id,
                size,
                offset,
                values,
            })
            .collect();
        groups.sort_by(|a, b| b.size.cmp(&a.size));
        groups
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Mutable aggregate used while a single report is being parsed
#[derive(Debug, Default)]
pub(crate) struct ModuleStatsBuilder {
    identity: ModuleIdentity,
    allocations: BTreeMap<AllocationId, Arc<Allocation>>,
    values: BTreeMap<ValueId, Value>,
    used_values: BTreeSet<ValueId>,
    value_name_to_id: BTreeMap<String, ValueId>,
    value_id_to_name: BTreeMap<ValueId, String>,
}

impl ModuleStatsBuilder {
    pub(crate) fn new(identity: ModuleIdentity) -> Self {
        Self {
            identity,
            ..Self::default()
        }
    }

    pub(crate) fn add_allocation(&mut self, allocation: Allocation) -> Arc<Allocation> {
        let allocation = Arc::new(allocation);
        self.allocations
            .insert(allocation.alloc_id, Arc::clone(&allocation));
        allocation
    }

    pub(crate) fn add_value(&mut self, value: Value) -> Result<(), ReportErrorKind> {
        if self.values.contains_key(&value.id) {
            return Err(ReportErrorKind::DuplicateValueId(value.id));
        }
        if self.value_name_to_id.contains_key(&value.name) {
            return Err(ReportErrorKind::DuplicateValueName(value.name));
        }
        self.value_name_to_id.insert(value.name.clone(), value.id);
        self.value_id_to_name.insert(value.id, value.name.clone());
        self.values.insert(value.id, value);
        Ok(())
    }

    /// Attach a used-value record to its declared value.
    ///
    /// Returns `true` when an earlier record for the same id was replaced.
    pub(crate) fn attach_detail(&mut self, detail: ValueDetailed) -> Result<bool, ReportErrorKind> {
        let id = detail.id;
        let value = self
            .values
            .get_mut(&id)
            .ok_or(ReportErrorKind::UnknownUsedValue(id))?;
        let replaced = value.value_detailed.replace(detail).is_some();
        self.used_values.insert(id);
        Ok(replaced)
    }

    pub(crate) fn detail_mut(&mut self, id: ValueId) -> Option<&mut ValueDetailed> {
        self.values.get_mut(&id)?.value_detailed.as_mut()
    }

    pub(crate) fn resolve(&self, name: &str) -> Option<ValueId> {
        self.value_name_to_id.get(name).copied()
    }

    pub(crate) fn set_live_range(&mut self, id: ValueId, range: LiveRange) {
        if let Some(value) = self.values.get_mut(&id) {
            value.live_range = Some(range);
        }
    }

    /// Returns `false` (and keeps the first index) if the sequence was already set
    pub(crate) fn set_sequence(&mut self, id: ValueId, index: u64) -> bool {
        match self.values.get_mut(&id) {
            Some(value) if value.sequence.is_none() => {
                value.sequence = Some(index);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn freeze(self, peaks: PeakConfig, large_array_threshold: u64) -> ModuleStats {
        let total_allocation = self.allocations.values().map(|a| a.total_size).sum();
        let timeline = TimelineAnalyzer::new(peaks).analyze(self.values.values());

        ModuleStats {
            identity: self.identity,
            allocations: self.allocations,
            values: self.values,
            used_values: self.used_values,
            value_name_to_id: self.value_name_to_id,
            value_id_to_name: self.value_id_to_name,
            total_allocation,
            large_array_threshold,
            timeline,
        }
    }
}
