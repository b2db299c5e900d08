//! Instruction descriptor parser
//!
//! # Grammar
//!
//! ```text
//! line      := var ws* '=' ws* dtype ws+ op '(' operands ')' tail
//! var       := '%' [^ws '=']+
//! dtype     := shortest text (may be empty) for which the rest matches
//! op        := word                       (word = [alphanumeric _]+)
//! operands  := [^')']*                    (split on ',', trimmed, empties dropped)
//! tail      := <end> | ws* ',' ws* rest
//! rest      := attr (',' attr)* with an optional  metadata={ ... }  block
//! ```
//!
//! The metadata block runs from the first `metadata={` to the last `}` of
//! `rest`. Inside it, `key="text"` and `key=digits` pairs are collected in
//! encounter order. Whatever remains of `rest` is split on commas into
//! `key=value` attributes; fragments without `=` are dropped.
//!
//! The parser never fails loudly: a line outside the grammar yields `None`.

use super::domain::{Attributes, InstructionDescriptor, Metadata, MetadataValue};

const METADATA_OPEN: &str = "metadata={";

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Parse one instruction line, or `None` when it does not fit the grammar
pub fn parse_instruction(line: &str) -> Option<InstructionDescriptor> {
    let line = line.trim();
    if !line.starts_with('%') {
        return None;
    }

    let var_end = line
        .find(|c: char| c.is_whitespace() || c == '=')
        .unwrap_or(line.len());
    if var_end <= 1 {
        return None;
    }
    let var = &line[..var_end];

    let body = line[var_end..].trim_start().strip_prefix('=')?;
    let call = find_call(body)?;

    Some(InstructionDescriptor {
        var: var.to_string(),
        dtype: body[..call.op_start].trim().to_string(),
        op: call.op.to_string(),
        operands: call
            .operands
            .split(',')
            .map(str::trim)
            .filter(|operand| !operand.is_empty())
            .map(str::to_string)
            .collect(),
        attrs: parse_attrs(call.rest),
        metadata: call.rest.map(parse_metadata).unwrap_or_default(),
    })
}

struct Call<'a> {
    op_start: usize,
    op: &'a str,
    operands: &'a str,
    rest: Option<&'a str>,
}

/// Leftmost `ws word '(' [^)]* ')' tail` in `body`, which gives the shortest dtype
fn find_call(body: &str) -> Option<Call<'_>> {
    let mut prev: Option<char> = None;
    for (start, c) in body.char_indices() {
        let after_ws = prev.map_or(false, char::is_whitespace);
        prev = Some(c);
        if !after_ws || !is_word_char(c) {
            continue;
        }
        if let Some(call) = call_at(body, start) {
            return Some(call);
        }
    }
    None
}

fn call_at(body: &str, start: usize) -> Option<Call<'_>> {
    let tail = &body[start..];
    let op_len = tail.find(|c: char| !is_word_char(c))?;
    let after_op = tail[op_len..].strip_prefix('(')?;
    let close = after_op.find(')')?;
    let after_call = after_op[close + 1..].trim();

    let rest = if after_call.is_empty() {
        None
    } else {
        Some(after_call.strip_prefix(',')?.trim_start())
    };

    Some(Call {
        op_start: start,
        op: &tail[..op_len],
        operands: &after_op[..close],
        rest,
    })
}

/// Byte range of `metadata={...}` inside `rest`, braces included
fn metadata_span(rest: &str) -> Option<(usize, usize)> {
    let start = rest.find(METADATA_OPEN)?;
    let close = rest.rfind('}')?;
    if close < start + METADATA_OPEN.len() {
        return None;
    }
    Some((start, close + 1))
}

fn parse_metadata(rest: &str) -> Metadata {
    let mut metadata = Metadata::default();
    let Some((start, end)) = metadata_span(rest) else {
        return metadata;
    };
    let content = &rest[start + METADATA_OPEN.len()..end - 1];

    let mut pos = 0;
    while pos < content.len() {
        match metadata_pair_at(&content[pos..]) {
            Some((key, value, consumed)) => {
                metadata.insert(key, value);
                pos += consumed;
            }
            None => {
                pos += content[pos..].chars().next().map_or(1, char::len_utf8);
            }
        }
    }
    metadata
}

/// Match `word=("..."|digits)` at the start of `s`, returning the bytes consumed
fn metadata_pair_at(s: &str) -> Option<(&str, MetadataValue, usize)> {
    let key_len = s.find(|c: char| !is_word_char(c))?;
    if key_len == 0 {
        return None;
    }
    let after_eq = s[key_len..].strip_prefix('=')?;
    let value_start = key_len + 1;

    if let Some(quoted) = after_eq.strip_prefix('"') {
        let close = quoted.find('"')?;
        let text = &quoted[..close];
        return Some((
            &s[..key_len],
            MetadataValue::Str(text.to_string()),
            value_start + close + 2,
        ));
    }

    let digits_len = after_eq
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(after_eq.len());
    if digits_len == 0 {
        return None;
    }
    let digits = &after_eq[..digits_len];
    let value = digits
        .parse::<i64>()
        .map(MetadataValue::Int)
        .unwrap_or_else(|_| MetadataValue::Str(digits.to_string()));
    Some((&s[..key_len], value, value_start + digits_len))
}

fn parse_attrs(rest: Option<&str>) -> Attributes {
    let mut attrs = Attributes::default();
    let Some(rest) = rest else {
        return attrs;
    };

    let remaining = match metadata_span(rest) {
        Some((start, end)) => format!("{}{}", &rest[..start], &rest[end..]),
        None => rest.to_string(),
    };

    let remaining = remaining.trim_matches(|c| c == ' ' || c == ',');
    if remaining.is_empty() {
        return attrs;
    }
    for entry in remaining.split(',') {
        if let Some((key, value)) = entry.split_once('=') {
            attrs.insert(key.trim(), value.trim().to_string());
        }
    }
    attrs
}
