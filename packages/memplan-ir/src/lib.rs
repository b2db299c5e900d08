/*
 * memplan-ir - XLA buffer-assignment analysis
 *
 * Feature-First Layout:
 * - shared/      : Entity model (Allocation, Value, ModuleStats, DumpDirectory)
 * - features/    : instruction descriptors, report parsing, timeline
 * - pipeline/    : Dump directory discovery and loading
 * - config/      : Versioned YAML analyzer configuration
 *
 * Parsing is single-threaded per module; modules load in parallel with Rayon.
 */

pub mod config;
pub mod errors;
pub mod features;
pub mod pipeline;
pub mod shared;

pub use config::AnalyzerConfig;
pub use errors::{MemplanError, Result};
pub use features::instruction::{parse_instruction, InstructionDescriptor, MetadataValue};
pub use features::report_parsing::{ReportErrorKind, ReportParseError, ReportParser};
pub use features::timeline::{PeakSnapshot, SizeOverTime, Timeline, TimelineAnalyzer};
pub use pipeline::{load_all_modules, DumpLoader};
pub use shared::models::{
    Allocation, DumpDirectory, LiveRange, ModuleFailure, ModuleIdentity, ModuleStats, Value,
    ValueDetailed,
};
pub use shared::utils::{format_bytes, ByteSize};
