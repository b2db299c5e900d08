//! Entity data model shared by parsing, analysis and loading

pub mod allocation;
pub mod dump_directory;
pub mod module_stats;
pub mod value;

pub use allocation::{Allocation, AllocationId};
pub use dump_directory::{DumpDirectory, ModuleFailure};
pub(crate) use module_stats::ModuleStatsBuilder;
pub use module_stats::{BufferSlot, ModuleIdentity, ModuleStats};
pub use value::{Instant, LiveRange, SourceLocation, UseSite, Value, ValueDetailed, ValueId};
