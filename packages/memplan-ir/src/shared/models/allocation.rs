//! Allocations: physical regions reserved by the buffer assigner

use serde::{Deserialize, Serialize};

pub type AllocationId = u64;

/// One `allocation <id>: size <n>, ...` block of a buffer-assignment report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Allocation {
    pub alloc_id: AllocationId,
    pub total_size: u64,
}

impl Allocation {
    pub fn new(alloc_id: AllocationId, total_size: u64) -> Self {
        Self {
            alloc_id,
            total_size,
        }
    }
}
