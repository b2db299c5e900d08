//! Dump directory builder backed by a temporary directory

use std::fs;
use std::path::Path;

use tempfile::TempDir;

/// Writes memory-usage-report / buffer-assignment pairs into a temp dir
pub struct DumpDirBuilder {
    dir: TempDir,
}

impl DumpDirBuilder {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// Add a module whose buffer-assignment file contains `report`
    pub fn with_module(self, id: u64, name: &str, report: &str) -> Self {
        let stem = format!("module_{id:04}.{name}.sm_8.0_gpu_after_optimizations");
        fs::write(self.dir.path().join(format!("{stem}-memory-usage-report.txt")), "")
            .expect("write report");
        fs::write(self.dir.path().join(format!("{stem}-buffer-assignment.txt")), report)
            .expect("write buffer assignment");
        self
    }

    /// Add an arbitrary file, e.g. a report with no usable name
    pub fn with_file(self, file_name: &str, content: &str) -> Self {
        fs::write(self.dir.path().join(file_name), content).expect("write file");
        self
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn build(self) -> TempDir {
        self.dir
    }
}
