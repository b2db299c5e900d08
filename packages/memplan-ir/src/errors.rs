//! Error types for memplan-ir
//!
//! Provides unified error handling across the crate.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::features::report_parsing::ReportParseError;

/// Main error type for memplan-ir operations
#[derive(Debug, Error)]
pub enum MemplanError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A buffer-assignment report failed to parse
    #[error("Failed to parse {}: {source}", path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: ReportParseError,
    },

    /// Dump directory layout error (missing companion file, bad file name)
    #[error("Discovery error: {0}")]
    Discovery(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl MemplanError {
    /// Attach the offending file to a report parse error
    pub fn report(path: impl Into<PathBuf>, source: ReportParseError) -> Self {
        MemplanError::Report {
            path: path.into(),
            source,
        }
    }

    /// Create a discovery error
    pub fn discovery(msg: impl Into<String>) -> Self {
        MemplanError::Discovery(msg.into())
    }
}

/// Result type alias for memplan operations
pub type Result<T> = std::result::Result<T, MemplanError>;
