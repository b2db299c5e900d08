//! Report parse errors
//!
//! Every variant here is fatal for the module being parsed. Tolerated gaps
//! (unknown sequence names, unparsable instructions) never reach this type.

use thiserror::Error;

use crate::shared::models::ValueId;

/// Why a report line aborted the parse
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportErrorKind {
    #[error("malformed allocation header: {0}")]
    MalformedAllocationHeader(String),

    #[error("malformed allocation value: {0}")]
    MalformedValue(String),

    #[error("value declared before any allocation header")]
    ValueOutsideAllocation,

    #[error("duplicate value id {0}")]
    DuplicateValueId(ValueId),

    #[error("duplicate value name '{0}'")]
    DuplicateValueName(String),

    #[error("used value {0} was never declared in an allocation")]
    UnknownUsedValue(ValueId),

    #[error("'{0}' line appears before any used value header")]
    NoCurrentUsedValue(String),

    #[error("malformed buffer live range: {0}")]
    MalformedLiveRange(String),

    #[error("live range of '{name}' ends before it starts ({start}-{end})")]
    InvertedLiveRange { name: String, start: u64, end: u64 },

    #[error("live range of '{name}' ends at {end}, past the last representable instant")]
    LiveRangeOutOfBounds { name: String, end: u64 },

    #[error("buffer live range names unknown value '{0}'")]
    UnresolvedLiveRangeName(String),
}

/// A fatal parse failure at a 1-based line number
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct ReportParseError {
    pub line: usize,
    pub kind: ReportErrorKind,
}

impl ReportParseError {
    pub fn new(line: usize, kind: ReportErrorKind) -> Self {
        Self { line, kind }
    }
}
