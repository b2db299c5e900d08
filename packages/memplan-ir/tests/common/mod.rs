//! Common test utilities for memplan-ir
//!
//! Shared report fixtures and a builder for on-disk dump directories.

#![allow(dead_code)]

mod builders;
mod fixtures;

pub use builders::*;
pub use fixtures::*;
