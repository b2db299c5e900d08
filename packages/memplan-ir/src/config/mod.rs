//! Configuration system
//!
//! Two levels of control:
//! - Level 1: `AnalyzerConfig::default()` plus builder overrides
//! - Level 2: a versioned YAML file
//!
//! # Examples
//!
//! ```rust,ignore
//! use memplan_ir::config::AnalyzerConfig;
//!
//! let config = AnalyzerConfig::default().prominence_ratio(0.1).strict(true);
//! let config = AnalyzerConfig::from_yaml("memplan.yaml")?;
//! ```

pub mod analyzer_config;
pub mod error;
pub mod io;

pub use analyzer_config::{AnalyzerConfig, PeakConfig};
pub use error::{ConfigError, ConfigResult};
pub use io::ConfigExportV1;
