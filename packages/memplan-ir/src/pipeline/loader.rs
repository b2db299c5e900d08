//! Dump directory loader
//!
//! Discovers report pairs, parses each module and aggregates the results
//! into a [`DumpDirectory`]. Modules are independent, so with
//! `parallel: true` they are parsed on the rayon pool; the result keeps
//! discovery order either way.

use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::discovery::{discover_reports, ReportPair};
use crate::config::AnalyzerConfig;
use crate::errors::{MemplanError, Result};
use crate::features::report_parsing::ReportParser;
use crate::shared::models::{DumpDirectory, ModuleFailure, ModuleStats};

#[derive(Debug, Clone, Default)]
pub struct DumpLoader {
    config: AnalyzerConfig,
}

impl DumpLoader {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Parse one module of a dump directory
    pub fn load_module(&self, pair: &ReportPair) -> Result<ModuleStats> {
        let identity = pair.identity()?;
        if !pair.buffer_assignment_path.is_file() {
            return Err(MemplanError::discovery(format!(
                "no buffer-assignment file next to {}",
                pair.report_path.display()
            )));
        }

        let stats = ReportParser::new(&self.config).parse_file(identity, &pair.buffer_assignment_path)?;
        debug!(
            "module {} {}: {} allocations, {} values ({} large), {} bytes",
            stats.id(),
            stats.name(),
            stats.allocations().len(),
            stats.values().len(),
            stats.large_arrays().count(),
            stats.total_allocation()
        );
        Ok(stats)
    }

    pub fn load(&self, dir: &Path) -> Result<DumpDirectory> {
        let start = Instant::now();
        let pairs = discover_reports(dir)?;
        debug!("discovered {} reports in {}", pairs.len(), dir.display());

        let results: Vec<(&ReportPair, Result<ModuleStats>)> = if self.config.parallel {
            pairs.par_iter().map(|pair| (pair, self.load_module(pair))).collect()
        } else if self.config.strict {
            let mut results = Vec::with_capacity(pairs.len());
            for pair in &pairs {
                results.push((pair, Ok(self.load_module(pair)?)));
            }
            results
        } else {
            pairs.iter().map(|pair| (pair, self.load_module(pair))).collect()
        };

        let mut modules = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for (pair, result) in results {
            match result {
                Ok(stats) => modules.push(stats),
                Err(err) if self.config.strict => return Err(err),
                Err(err) => {
                    warn!("skipping {}: {}", pair.report_path.display(), err);
                    failures.push(ModuleFailure {
                        report_path: pair.report_path.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        let dump = DumpDirectory::new(dir, modules, failures)
            .with_min_module_size(self.config.min_module_size.bytes());
        info!(
            "loaded {} modules ({} at least {}, {} failed) from {} in {:?}, {} bytes allocated",
            dump.modules.len(),
            dump.significant_modules().count(),
            self.config.min_module_size,
            dump.failures.len(),
            dir.display(),
            start.elapsed(),
            dump.total_size
        );
        Ok(dump)
    }
}

/// Load every module of `dir` with `config`
pub fn load_all_modules(dir: &Path, config: &AnalyzerConfig) -> Result<DumpDirectory> {
    DumpLoader::new(config.clone()).load(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const REPORT: &str = "allocation 0: size 64,\n value: <1 p0 @0> (size=64,offset=0): f32[16]{0}\n";

    fn write_module(dir: &Path, stem: &str, body: Option<&str>) {
        fs::write(dir.join(format!("{}-memory-usage-report.txt", stem)), "").unwrap();
        if let Some(body) = body {
            fs::write(dir.join(format!("{}-buffer-assignment.txt", stem)), body).unwrap();
        }
    }

    #[test]
    fn test_missing_buffer_assignment_is_collected() {
        let tmp = TempDir::new().unwrap();
        write_module(tmp.path(), "module_0001.a.cpu", Some(REPORT));
        write_module(tmp.path(), "module_0002.b.cpu", None);

        let config = AnalyzerConfig::default().parallel(false);
        let dump = load_all_modules(tmp.path(), &config).unwrap();
        assert_eq!(dump.modules.len(), 1);
        assert_eq!(dump.failures.len(), 1);
        assert!(dump.failures[0].reason.contains("no buffer-assignment file"));
        assert_eq!(dump.total_size, 64);
    }

    #[test]
    fn test_strict_aborts() {
        let tmp = TempDir::new().unwrap();
        write_module(tmp.path(), "module_0001.a.cpu", Some("allocation x: size 1,"));

        let config = AnalyzerConfig::default().strict(true);
        let err = load_all_modules(tmp.path(), &config).unwrap_err();
        assert!(matches!(err, MemplanError::Report { .. }));
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_all_modules(&tmp.path().join("nope"), &AnalyzerConfig::default()).unwrap_err();
        assert!(matches!(err, MemplanError::Io(_)));
    }
}
