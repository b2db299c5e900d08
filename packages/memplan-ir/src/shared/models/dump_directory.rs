//! All modules of one compiler dump directory

use std::path::PathBuf;

use serde::Serialize;

use super::module_stats::ModuleStats;

/// A module whose report could not be loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleFailure {
    pub report_path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DumpDirectory {
    pub directory: PathBuf,
    /// In discovery order (sorted by report file name)
    pub modules: Vec<ModuleStats>,
    /// Sum of every module's `total_allocation`
    pub total_size: u64,
    /// Empty unless loaded in non-strict mode
    pub failures: Vec<ModuleFailure>,
    /// Modules allocating fewer bytes are left out of `significant_modules`
    pub min_module_size: u64,
}

impl DumpDirectory {
    pub fn new(directory: impl Into<PathBuf>, modules: Vec<ModuleStats>, failures: Vec<ModuleFailure>) -> Self {
        let total_size = modules.iter().map(ModuleStats::total_allocation).sum();
        Self {
            directory: directory.into(),
            modules,
            total_size,
            failures,
            min_module_size: 0,
        }
    }

    pub fn with_min_module_size(mut self, bytes: u64) -> Self {
        self.min_module_size = bytes;
        self
    }

    /// Modules allocating at least `min_module_size` bytes, in discovery order
    pub fn significant_modules(&self) -> impl Iterator<Item = &ModuleStats> {
        self.modules
            .iter()
            .filter(move |m| m.total_allocation() >= self.min_module_size)
    }

    /// Modules whose name contains any of `names`
    pub fn modules_matching<'a, S: AsRef<str>>(&'a self, names: &'a [S]) -> impl Iterator<Item = &'a ModuleStats> {
        self.modules
            .iter()
            .filter(move |m| names.iter().any(|n| m.name().contains(n.as_ref())))
    }

    pub fn modules_larger_than(&self, bytes: u64) -> impl Iterator<Item = &ModuleStats> {
        self.modules
            .iter()
            .filter(move |m| m.total_allocation() > bytes)
    }

    /// Largest module first; equal sizes keep discovery order
    pub fn sorted_by_size(&self) -> Vec<&ModuleStats> {
        let mut sorted: Vec<&ModuleStats> = self.modules.iter().collect();
        sorted.sort_by(|a, b| b.total_allocation().cmp(&a.total_allocation()));
        sorted
    }

    pub fn find_module(&self, id: u64) -> Option<&ModuleStats> {
        self.modules.iter().find(|m| m.id() == id)
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PeakConfig;
    use crate::shared::models::{Allocation, ModuleIdentity, ModuleStatsBuilder};

    fn module(id: u64, name: &str, size: u64) -> ModuleStats {
        let mut builder = ModuleStatsBuilder::new(ModuleIdentity::new(id, name));
        builder.add_allocation(Allocation::new(0, size));
        builder.freeze(PeakConfig::default(), 1 << 20)
    }

    #[test]
    fn test_total_and_selection() {
        let dump = DumpDirectory::new(
            "dump",
            vec![
                module(1, "jit_train_step", 4096),
                module(2, "jit_eval", 1 << 20),
                module(3, "jit_train_init", 100),
            ],
            Vec::new(),
        );
        assert_eq!(dump.total_size, 4096 + (1 << 20) + 100);
        assert!(dump.is_complete());

        let train: Vec<u64> = dump.modules_matching(&["train"][..]).map(|m| m.id()).collect();
        assert_eq!(train, vec![1, 3]);

        let big: Vec<u64> = dump.modules_larger_than(4096).map(|m| m.id()).collect();
        assert_eq!(big, vec![2]);

        let order: Vec<u64> = dump.sorted_by_size().iter().map(|m| m.id()).collect();
        assert_eq!(order, vec![2, 1, 3]);

        assert_eq!(dump.find_module(3).map(|m| m.name()), Some("jit_train_init"));
        assert!(dump.find_module(9).is_none());
    }

    #[test]
    fn test_significant_modules_respect_minimum() {
        let modules = vec![module(1, "tiny", 100), module(2, "edge", 4096), module(3, "big", 1 << 20)];

        let all = DumpDirectory::new("dump", modules.clone(), Vec::new());
        assert_eq!(all.significant_modules().count(), 3);

        let dump = DumpDirectory::new("dump", modules, Vec::new()).with_min_module_size(4096);
        let ids: Vec<u64> = dump.significant_modules().map(|m| m.id()).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(dump.total_size, 100 + 4096 + (1 << 20));
    }
}
