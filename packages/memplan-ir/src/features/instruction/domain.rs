//! Instruction descriptor model
//!
//! Structured form of one HLO instruction as printed after
//! `from instruction:` in the used-values section.

use serde::{Deserialize, Serialize, Serializer};

/// A metadata value: unquoted integers stay numeric, everything else is the
/// content of a double-quoted string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Int(i64),
    Str(String),
}

impl MetadataValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::Str(s) => Some(s),
            MetadataValue::Int(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            MetadataValue::Int(n) => Some(*n),
            MetadataValue::Str(_) => None,
        }
    }
}

/// Insertion-ordered key/value list; re-inserting a key overwrites it in place
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> OrderedMap<V> {
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

pub type Attributes = OrderedMap<String>;
pub type Metadata = OrderedMap<MetadataValue>;

/// One parsed `%var = <type> op(operands), attrs..., metadata={...}` line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstructionDescriptor {
    /// Result variable including the leading `%`
    pub var: String,
    /// Result type text, e.g. `f32[8]{0}` or `(f32[2]{0}, s32[])`
    pub dtype: String,
    pub op: String,
    pub operands: Vec<String>,
    pub attrs: Attributes,
    pub metadata: Metadata,
}

impl InstructionDescriptor {
    pub fn op_name(&self) -> Option<&str> {
        self.metadata.get("op_name").and_then(MetadataValue::as_str)
    }

    pub fn source_file(&self) -> Option<&str> {
        self.metadata.get("source_file").and_then(MetadataValue::as_str)
    }

    pub fn source_line(&self) -> Option<i64> {
        self.metadata.get("source_line").and_then(MetadataValue::as_int)
    }
}
