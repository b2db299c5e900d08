//! Dump directory discovery
//!
//! XLA writes several files per compiled module. The memory-usage report
//! names the module; its `buffer-assignment` sibling carries the data.
//!
//! ```text
//! module_0005.jit_step.sm_8.0_gpu_after_optimizations-memory-usage-report.txt   (discovered)
//! module_0005.jit_step.sm_8.0_gpu_after_optimizations-buffer-assignment.txt     (parsed)
//!        ^^^^ ^^^^^^^^
//!        id   name
//! ```

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use walkdir::WalkDir;

use crate::errors::{MemplanError, Result};
use crate::shared::models::ModuleIdentity;

pub const REPORT_SUFFIX: &str = "memory-usage-report.txt";
const REPORT_MARKER: &str = "memory-usage-report";
const ASSIGNMENT_MARKER: &str = "buffer-assignment";

static MODULE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^_.]*_(?P<id>\d+)\.(?P<name>[^.]+)").expect("module file name pattern is valid")
});

/// A memory-usage report and the buffer-assignment file it points to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPair {
    pub report_path: PathBuf,
    pub buffer_assignment_path: PathBuf,
}

impl ReportPair {
    pub fn from_report(report_path: impl Into<PathBuf>) -> Self {
        let report_path = report_path.into();
        let file_name = report_path
            .file_name()
            .map(|n| n.to_string_lossy().replace(REPORT_MARKER, ASSIGNMENT_MARKER))
            .unwrap_or_default();
        let buffer_assignment_path = report_path.with_file_name(file_name);
        Self {
            report_path,
            buffer_assignment_path,
        }
    }

    pub fn identity(&self) -> Result<ModuleIdentity> {
        let file_name = self
            .report_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        module_identity(&file_name).ok_or_else(|| {
            MemplanError::discovery(format!(
                "report name '{}' does not encode a module id and name",
                file_name
            ))
        })
    }
}

/// `module_0005.jit_step....` → `(5, "jit_step")`
pub fn module_identity(file_name: &str) -> Option<ModuleIdentity> {
    let caps = MODULE_NAME_RE.captures(file_name)?;
    let id = caps.name("id")?.as_str().parse().ok()?;
    let name = caps.name("name")?.as_str();
    Some(ModuleIdentity::new(id, name))
}

/// Report pairs directly inside `dir`, sorted by report file name
pub fn discover_reports(dir: &Path) -> Result<Vec<ReportPair>> {
    let mut reports = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().ends_with(REPORT_SUFFIX) {
            reports.push(entry.into_path());
        }
    }
    reports.sort();

    Ok(reports.into_iter().map(ReportPair::from_report).collect())
}
