//! Logical buffers and their per-use details
//!
//! A [`Value`] is created from its `value:` declaration inside an allocation
//! block. The used-values section later attaches a [`ValueDetailed`], and the
//! HloLiveRange section attaches a [`LiveRange`] and a sequence index.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::allocation::Allocation;
use crate::features::instruction::InstructionDescriptor;
use crate::shared::utils::format_bytes;

pub type ValueId = u64;

/// Discrete execution instant of the scheduled program
pub type Instant = u64;

/// Inclusive span of instants during which a buffer must stay valid
///
/// `end` is always below [`Instant::MAX`], so `end + 1` and
/// [`instant_count`](Self::instant_count) never overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LiveRange {
    start: Instant,
    end: Instant,
}

impl LiveRange {
    /// `None` when `start > end` or `end == Instant::MAX`
    pub fn new(start: Instant, end: Instant) -> Option<Self> {
        (start <= end && end < Instant::MAX).then_some(Self { start, end })
    }

    pub fn start(&self) -> Instant {
        self.start
    }

    pub fn end(&self) -> Instant {
        self.end
    }

    /// First instant after the range
    pub fn end_exclusive(&self) -> Instant {
        self.end + 1
    }

    pub fn contains(&self, instant: Instant) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// Number of instants covered (always at least 1)
    pub fn instant_count(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// `source_file:source_line` taken from instruction metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: i64,
}

impl SourceLocation {
    /// `<file name>:<line>` without the directory part
    pub fn short(&self) -> String {
        let file_name = self.file.rsplit('/').next().unwrap_or(&self.file);
        format!("{}:{}", file_name, self.line)
    }
}

/// One entry of a value's `uses:` list, e.g. `add.1, operand 0`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UseSite<'a> {
    /// Instruction that consumes the value
    pub user: &'a str,
    /// Last word after the first comma (the operand number)
    pub operand: Option<&'a str>,
}

impl<'a> UseSite<'a> {
    pub fn parse(raw: &'a str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match raw.split_once(',') {
            Some((user, operand)) => Some(Self {
                user: user.trim(),
                operand: operand.split_whitespace().last(),
            }),
            None => Some(Self {
                user: raw,
                operand: None,
            }),
        }
    }
}

/// Details recorded for a value in the "Used values:" section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueDetailed {
    pub id: ValueId,
    pub name: String,
    pub opt_name: Option<String>,
    pub at: u64,
    pub uses: Vec<String>,
    pub positions: Vec<String>,
    pub instruction: Option<InstructionDescriptor>,
}

impl ValueDetailed {
    pub fn new(id: ValueId, name: impl Into<String>, opt_name: Option<String>, at: u64) -> Self {
        Self {
            id,
            name: name.into(),
            opt_name,
            at,
            uses: Vec::new(),
            positions: Vec::new(),
            instruction: None,
        }
    }

    pub fn op_name(&self) -> Option<&str> {
        self.instruction.as_ref()?.op_name()
    }

    /// Present only when both `source_file` and `source_line` are in the metadata
    pub fn source(&self) -> Option<SourceLocation> {
        let instruction = self.instruction.as_ref()?;
        Some(SourceLocation {
            file: instruction.source_file()?.to_string(),
            line: instruction.source_line()?,
        })
    }

    pub fn short_source(&self) -> Option<String> {
        self.source().map(|source| source.short())
    }

    pub fn use_sites(&self) -> impl Iterator<Item = UseSite<'_>> {
        self.uses.iter().filter_map(|raw| UseSite::parse(raw))
    }
}

/// One logical buffer placed inside an allocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Value {
    pub id: ValueId,
    pub name: String,
    pub opt_name: Option<String>,
    pub at: u64,
    pub size: u64,
    /// Byte offset within `allocation`
    pub offset: u64,
    /// Element type, shape and layout, e.g. `f32[1024,3]{1,0}`
    pub array_info: String,
    pub allocation: Arc<Allocation>,
    pub value_detailed: Option<ValueDetailed>,
    pub live_range: Option<LiveRange>,
    pub sequence: Option<u64>,
}

impl Value {
    pub fn is_large_array(&self, threshold: u64) -> bool {
        self.size > threshold
    }

    pub fn pretty_size(&self) -> String {
        format_bytes(self.size)
    }

    /// `array_info` up to the layout braces: `f32[8,3]{1,0}` → `f32[8,3]`
    pub fn array_info_without_layout(&self) -> &str {
        self.array_info
            .split('{')
            .next()
            .unwrap_or(&self.array_info)
    }

    pub fn alive_at(&self, instant: Instant) -> bool {
        self.live_range.map_or(false, |range| range.contains(instant))
    }

    pub fn op_name(&self) -> Option<&str> {
        self.value_detailed.as_ref()?.op_name()
    }
}
