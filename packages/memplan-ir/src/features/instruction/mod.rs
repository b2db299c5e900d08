//! Instruction descriptors embedded in buffer-assignment reports

pub mod domain;
pub mod parser;

pub use domain::{Attributes, InstructionDescriptor, Metadata, MetadataValue, OrderedMap};
pub use parser::parse_instruction;
