//! Byte size parsing and formatting
//!
//! Sizes in configuration files may be written as plain integers or as
//! `<number><unit>` strings (`4K`, `1.5G`, `512mb`). Units are binary
//! multiples and case-insensitive.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

const KIB: u64 = 1024;

/// Size in bytes, accepting human-readable suffixes on input
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "ByteSizeRepr", into = "u64")]
pub struct ByteSize(pub u64);

impl ByteSize {
    pub const fn bytes(self) -> u64 {
        self.0
    }

    pub const fn kib(n: u64) -> Self {
        Self(n * KIB)
    }

    pub const fn mib(n: u64) -> Self {
        Self(n * KIB * KIB)
    }
}

impl From<ByteSize> for u64 {
    fn from(size: ByteSize) -> u64 {
        size.0
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_bytes(self.0))
    }
}

fn unit_multiplier(unit: &str) -> Option<u64> {
    let power = match unit {
        "" | "B" => 0,
        "K" | "KB" => 1,
        "M" | "MB" => 2,
        "G" | "GB" => 3,
        "T" | "TB" => 4,
        _ => return None,
    };
    Some(KIB.pow(power))
}

impl FromStr for ByteSize {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_uppercase();
        let split = normalized
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(normalized.len());
        let (number, unit) = normalized.split_at(split);

        let number: f64 = number
            .parse()
            .map_err(|_| ConfigError::invalid_byte_size(value, "expected a number"))?;
        let multiplier = unit_multiplier(unit.trim())
            .ok_or_else(|| ConfigError::invalid_byte_size(value, format!("unknown unit '{}'", unit.trim())))?;

        Ok(ByteSize((number * multiplier as f64) as u64))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ByteSizeRepr {
    Bytes(u64),
    Text(String),
}

impl TryFrom<ByteSizeRepr> for ByteSize {
    type Error = ConfigError;

    fn try_from(repr: ByteSizeRepr) -> Result<Self, Self::Error> {
        match repr {
            ByteSizeRepr::Bytes(n) => Ok(ByteSize(n)),
            ByteSizeRepr::Text(s) => s.parse(),
        }
    }
}

/// Format a byte count with binary units (`512 B`, `1.5 KiB`, `2.0 GiB`)
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["KiB", "MiB", "GiB", "TiB", "PiB"];

    if bytes < KIB {
        return format!("{} B", bytes);
    }

    let mut scaled = bytes as f64 / KIB as f64;
    let mut unit = 0;
    while scaled >= KIB as f64 && unit < UNITS.len() - 1 {
        scaled /= KIB as f64;
        unit += 1;
    }
    format!("{:.1} {}", scaled, UNITS[unit])
}
