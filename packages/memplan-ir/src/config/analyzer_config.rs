//! Analyzer configuration
//!
//! Settings that shape how dumps are loaded and how peaks are selected.
//! Defaults reproduce the behaviour engineers expect from the memory
//! analyzer: peaks must rise at least a fifth of the global maximum above
//! their surroundings, and arrays above 1 MiB count as "large".

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};
use super::io::ConfigExportV1;
use crate::shared::utils::ByteSize;

const SUPPORTED_VERSIONS: [u32; 1] = [1];

/// Peak selection settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PeakConfig {
    /// Minimum prominence as a fraction of the global maximum, in (0, 1]
    pub prominence_ratio: f64,
}

impl Default for PeakConfig {
    fn default() -> Self {
        Self {
            prominence_ratio: 0.2,
        }
    }
}

impl PeakConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        let ratio = self.prominence_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(ConfigError::range_with_hint(
                "peaks.prominence_ratio",
                ratio,
                "0 (exclusive)",
                1.0,
                "Use 0.2 to keep peaks that rise a fifth of the maximum",
            ));
        }
        Ok(())
    }
}

/// Top-level analyzer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    pub peaks: PeakConfig,

    /// Values strictly larger than this are reported as large arrays
    pub large_array_threshold: ByteSize,

    /// Modules allocating fewer bytes are left out of
    /// `DumpDirectory::significant_modules`
    pub min_module_size: ByteSize,

    /// Parse modules of a dump directory on the rayon pool
    pub parallel: bool,

    /// Abort a directory load on the first module that fails to parse
    pub strict: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            peaks: PeakConfig::default(),
            large_array_threshold: ByteSize::mib(1),
            min_module_size: ByteSize::kib(4),
            parallel: true,
            strict: false,
        }
    }
}

impl AnalyzerConfig {
    pub fn prominence_ratio(mut self, ratio: f64) -> Self {
        self.peaks.prominence_ratio = ratio;
        self
    }

    pub fn large_array_threshold(mut self, threshold: ByteSize) -> Self {
        self.large_array_threshold = threshold;
        self
    }

    pub fn min_module_size(mut self, size: ByteSize) -> Self {
        self.min_module_size = size;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.peaks.validate()
    }

    /// Load and validate a YAML v1 configuration file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate a YAML v1 document; absent fields keep defaults
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let export: ConfigExportV1 = serde_yaml::from_str(content)?;

        let version = export.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let defaults = Self::default();
        let config = Self {
            peaks: export.peaks.unwrap_or(defaults.peaks),
            large_array_threshold: export
                .large_array_threshold
                .unwrap_or(defaults.large_array_threshold),
            min_module_size: export.min_module_size.unwrap_or(defaults.min_module_size),
            parallel: export.parallel.unwrap_or(defaults.parallel),
            strict: export.strict.unwrap_or(defaults.strict),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        let export = ConfigExportV1 {
            version: Some(1),
            peaks: Some(self.peaks),
            large_array_threshold: Some(self.large_array_threshold),
            min_module_size: Some(self.min_module_size),
            parallel: Some(self.parallel),
            strict: Some(self.strict),
        };

        serde_yaml::to_string(&export).map_err(ConfigError::Yaml)
    }
}
