//! Configuration I/O (YAML loading)
//!
//! Defines the YAML schema types. Loading and validation live in
//! analyzer_config.rs.

use serde::{Deserialize, Serialize};

use super::analyzer_config::PeakConfig;
use crate::shared::utils::ByteSize;

/// YAML Schema v1
///
/// `version` is optional here so a missing field can be reported as
/// [`ConfigError::MissingVersion`](super::ConfigError::MissingVersion)
/// instead of a generic YAML error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigExportV1 {
    /// Schema version (always 1 for v1)
    pub version: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub peaks: Option<PeakConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_array_threshold: Option<ByteSize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_module_size: Option<ByteSize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
}
