//! Dump directory discovery and loading
//!
//! ```text
//! dump dir ──► discover_reports ──► [ReportPair] ──► DumpLoader (rayon)
//!                                                        │
//!                                                        ▼
//!                                         DumpDirectory { modules, failures }
//! ```

pub mod discovery;
pub mod loader;

pub use discovery::{discover_reports, module_identity, ReportPair};
pub use loader::{load_all_modules, DumpLoader};
