//! Shared helpers

pub mod byte_size;

pub use byte_size::{format_bytes, ByteSize};
