//! Buffer-assignment report parser
//!
//! One forward pass over the report. Each trimmed line first goes through
//! the section state machine (see [`ParseMode`]); data lines are then handled
//! by the active section. Any structural error aborts the whole module: the
//! builder is dropped and only the [`ReportParseError`] is returned.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use super::line_grammar::{
    parse_allocation_header, parse_live_range_entry, parse_sequence_entry, parse_used_header,
    parse_value_decl, strip_braces,
};
use crate::config::{AnalyzerConfig, PeakConfig};
use crate::errors::{MemplanError, Result};
use crate::features::instruction::parse_instruction;
use crate::features::report_parsing::domain::{ParseContext, ParseMode, Transition, UsesMode};
use crate::features::report_parsing::error::{ReportErrorKind, ReportParseError};
use crate::shared::models::{
    Allocation, LiveRange, ModuleIdentity, ModuleStats, ModuleStatsBuilder, Value, ValueDetailed,
};

type StepResult = std::result::Result<(), ReportErrorKind>;

/// Parses one report into a frozen [`ModuleStats`]
#[derive(Debug, Clone, Copy)]
pub struct ReportParser {
    peaks: PeakConfig,
    large_array_threshold: u64,
}

impl Default for ReportParser {
    fn default() -> Self {
        Self::new(&AnalyzerConfig::default())
    }
}

impl ReportParser {
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self {
            peaks: config.peaks,
            large_array_threshold: config.large_array_threshold.bytes(),
        }
    }

    pub fn parse_file(&self, identity: ModuleIdentity, path: &Path) -> Result<ModuleStats> {
        let text = fs::read_to_string(path)?;
        self.parse_str(identity, &text)
            .map_err(|source| MemplanError::report(path, source))
    }

    pub fn parse_str(
        &self,
        identity: ModuleIdentity,
        text: &str,
    ) -> std::result::Result<ModuleStats, ReportParseError> {
        self.parse_lines(identity, text.lines())
    }

    pub fn parse_lines<'a>(
        &self,
        identity: ModuleIdentity,
        lines: impl IntoIterator<Item = &'a str>,
    ) -> std::result::Result<ModuleStats, ReportParseError> {
        let mut state = ReportState::new(identity);
        for (index, raw) in lines.into_iter().enumerate() {
            state
                .step(raw.trim())
                .map_err(|kind| ReportParseError::new(index + 1, kind))?;
        }
        Ok(state.stats.freeze(self.peaks, self.large_array_threshold))
    }
}

struct ReportState {
    ctx: ParseContext,
    stats: ModuleStatsBuilder,
}

impl ReportState {
    fn new(identity: ModuleIdentity) -> Self {
        Self {
            ctx: ParseContext::default(),
            stats: ModuleStatsBuilder::new(identity),
        }
    }

    fn step(&mut self, line: &str) -> StepResult {
        if line.is_empty() {
            return Ok(());
        }

        match self.ctx.mode.transition(line) {
            Transition::Enter(mode) => {
                debug!("entering {:?}", mode);
                self.ctx.enter(mode);
                return Ok(());
            }
            Transition::Stale(mode) => {
                debug!("ignoring stale {:?} header while in {:?}", mode, self.ctx.mode);
                return Ok(());
            }
            Transition::Data => {}
        }

        match self.ctx.mode {
            ParseMode::Allocations => self.allocation_line(line),
            ParseMode::UsedValues => self.used_value_line(line),
            ParseMode::InstructionSequence => {
                self.sequence_line(line);
                Ok(())
            }
            ParseMode::BufferLiveRange => self.live_range_line(line),
            mode => {
                debug_assert!(mode.is_ignored());
                Ok(())
            }
        }
    }

    fn allocation_line(&mut self, line: &str) -> StepResult {
        if line.starts_with("allocation") {
            let header = parse_allocation_header(line)
                .ok_or_else(|| ReportErrorKind::MalformedAllocationHeader(line.to_string()))?;
            let allocation = self
                .stats
                .add_allocation(Allocation::new(header.alloc_id, header.total_size));
            self.ctx.open_allocation(allocation);
        } else if line.starts_with("value") {
            let decl = parse_value_decl(line)
                .ok_or_else(|| ReportErrorKind::MalformedValue(line.to_string()))?;
            let allocation = self
                .ctx
                .current_allocation
                .as_ref()
                .ok_or(ReportErrorKind::ValueOutsideAllocation)?;
            self.stats.add_value(Value {
                id: decl.id,
                name: decl.name.to_string(),
                opt_name: decl.opt_name.map(str::to_string),
                at: decl.at,
                size: decl.size,
                offset: decl.offset,
                array_info: decl.array_info.to_string(),
                allocation: Arc::clone(allocation),
                value_detailed: None,
                live_range: None,
                sequence: None,
            })?;
        }
        Ok(())
    }

    fn used_value_line(&mut self, line: &str) -> StepResult {
        if let Some(header) = parse_used_header(line) {
            let detail = ValueDetailed::new(
                header.id,
                header.name,
                header.opt_name.map(str::to_string),
                header.at,
            );
            if self.stats.attach_detail(detail)? {
                warn!("used value {} listed twice, keeping the later record", header.id);
            }
            self.ctx.open_used_value(header.id);
            return Ok(());
        }

        if line.starts_with("positions") {
            self.current_detail(line)?;
            self.ctx.uses_mode = UsesMode::Positions;
            return Ok(());
        }
        if line.starts_with("uses") {
            self.current_detail(line)?;
            self.ctx.uses_mode = UsesMode::Uses;
            return Ok(());
        }
        if line.starts_with("from instruction") {
            let instruction = line
                .split_once(':')
                .and_then(|(_, raw)| parse_instruction(raw.trim()));
            if instruction.is_none() {
                debug!("no instruction descriptor in '{}'", line);
            }
            self.current_detail(line)?.instruction = instruction;
            return Ok(());
        }

        match self.ctx.uses_mode {
            UsesMode::None => Ok(()),
            UsesMode::Positions => {
                self.current_detail(line)?.positions.push(line.to_string());
                Ok(())
            }
            UsesMode::Uses => {
                self.current_detail(line)?.uses.push(line.to_string());
                Ok(())
            }
        }
    }

    fn current_detail(&mut self, line: &str) -> std::result::Result<&mut ValueDetailed, ReportErrorKind> {
        let detail = match self.ctx.current_used {
            Some(id) => self.stats.detail_mut(id),
            None => None,
        };
        detail.ok_or_else(|| ReportErrorKind::NoCurrentUsedValue(line.to_string()))
    }

    fn sequence_line(&mut self, line: &str) {
        let Some(entry) = parse_sequence_entry(line) else {
            debug!("skipping malformed sequence line '{}'", line);
            return;
        };
        let Some(id) = self.stats.resolve(entry.name) else {
            debug!("sequence entry '{}' names no value", entry.name);
            return;
        };
        if !self.stats.set_sequence(id, entry.index) {
            warn!(
                "value '{}' appears again in the instruction sequence at {}, keeping the first index",
                entry.name, entry.index
            );
        }
    }

    fn live_range_line(&mut self, line: &str) -> StepResult {
        let entry = parse_live_range_entry(line)
            .ok_or_else(|| ReportErrorKind::MalformedLiveRange(line.to_string()))?;
        let id = self
            .stats
            .resolve(entry.name)
            .or_else(|| self.stats.resolve(strip_braces(entry.name)))
            .ok_or_else(|| ReportErrorKind::UnresolvedLiveRangeName(entry.name.to_string()))?;
        if entry.end == u64::MAX {
            return Err(ReportErrorKind::LiveRangeOutOfBounds {
                name: entry.name.to_string(),
                end: entry.end,
            });
        }
        let range = LiveRange::new(entry.start, entry.end).ok_or_else(|| {
            ReportErrorKind::InvertedLiveRange {
                name: entry.name.to_string(),
                start: entry.start,
                end: entry.end,
            }
        })?;
        self.stats.set_live_range(id, range);
        Ok(())
    }
}
