//! Parser state: section modes and the per-file context record
//!
//! A buffer-assignment report is a sequence of sections, always in this
//! order:
//!
//! ```text
//! allocation 0: size 1024, ...         ┐
//!  value: <1 p0 @0> (size=...): ...     ┘ Allocations
//! Used values:                          ┐
//! <1 p0 @0>                             │ UsedValues
//!  positions: / uses: / from instruction┘
//! HloLiveRange (max 12):                ─ HloLiveRange
//!   InstructionSequence:                ─ InstructionSequence  (`0:p0`)
//!   BufferLiveRange:                    ─ BufferLiveRange      (`p0{}:0-12`)
//!   Live ranges at 7 (peak):            ─ LiveRangesPeak
//! ```
//!
//! Modes only move forward. A header naming the current or an earlier mode
//! is consumed without effect.

use std::sync::Arc;

use crate::shared::models::{Allocation, ValueId};

/// Section of the report the parser is in, in file order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ParseMode {
    #[default]
    Allocations,
    UsedValues,
    HloLiveRange,
    InstructionSequence,
    BufferLiveRange,
    LiveRangesPeak,
}

/// Effect of one line on the section mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Not a section header; the current mode handles the line
    Data,
    /// Header of a later section
    Enter(ParseMode),
    /// Header of the current or an earlier section
    Stale(ParseMode),
}

impl ParseMode {
    /// Mode introduced by `line` when it is a section header
    pub fn from_header(line: &str) -> Option<Self> {
        if line.starts_with("Used values:") {
            Some(ParseMode::UsedValues)
        } else if line.starts_with("HloLiveRange") {
            Some(ParseMode::HloLiveRange)
        } else if line.starts_with("InstructionSequence") {
            Some(ParseMode::InstructionSequence)
        } else if line.starts_with("BufferLiveRange") {
            Some(ParseMode::BufferLiveRange)
        } else if line.starts_with("Live ranges at") {
            Some(ParseMode::LiveRangesPeak)
        } else {
            None
        }
    }

    pub fn transition(self, line: &str) -> Transition {
        match Self::from_header(line) {
            None => Transition::Data,
            Some(next) if next > self => Transition::Enter(next),
            Some(next) => Transition::Stale(next),
        }
    }

    /// Sections whose lines carry nothing the model needs
    pub fn is_ignored(self) -> bool {
        matches!(self, ParseMode::HloLiveRange | ParseMode::LiveRangesPeak)
    }
}

/// List that plain lines of a used value are appended to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UsesMode {
    #[default]
    None,
    Positions,
    Uses,
}

/// Mutable cursor state threaded through one report parse
#[derive(Debug, Clone, Default)]
pub struct ParseContext {
    pub mode: ParseMode,
    pub uses_mode: UsesMode,
    /// Allocation that `value:` lines are placed in
    pub current_allocation: Option<Arc<Allocation>>,
    /// Used value that sub-section lines belong to
    pub current_used: Option<ValueId>,
}

impl ParseContext {
    pub fn enter(&mut self, mode: ParseMode) {
        debug_assert!(mode > self.mode);
        self.mode = mode;
    }

    pub fn open_allocation(&mut self, allocation: Arc<Allocation>) {
        self.current_allocation = Some(allocation);
    }

    pub fn open_used_value(&mut self, id: ValueId) {
        self.current_used = Some(id);
        self.uses_mode = UsesMode::None;
    }
}
