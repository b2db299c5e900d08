//! Buffer-assignment report parsing
//!
//! # Architecture
//!
//! ```text
//! *.buffer-assignment.txt
//!         │ lines (trimmed)
//!         ▼
//! ParseMode state machine ──► line_grammar (cursor scanners)
//!         │                          │
//!         ▼                          ▼
//! ModuleStatsBuilder ◄──── Allocation / Value / ValueDetailed
//!         │ freeze
//!         ▼
//! ModuleStats (+ Timeline)
//! ```

pub mod domain;
pub mod error;
pub mod infrastructure;

pub use domain::{ParseContext, ParseMode, Transition, UsesMode};
pub use error::{ReportErrorKind, ReportParseError};
pub use infrastructure::ReportParser;
