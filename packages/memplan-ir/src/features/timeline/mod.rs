//! Memory usage over time and peak detection
//!
//! # Architecture
//!
//! ```text
//! values with live ranges ──► SizeOverTime (sweep line)
//!                                  │
//!                                  ▼
//!                             find_peaks (prominence ≥ ratio × max)
//!                                  │
//!                                  ▼
//!                   Timeline { size_over_time, allocation_peaks, ... }
//! ```

pub mod analyzer;
pub mod domain;
pub mod peaks;

pub use analyzer::TimelineAnalyzer;
pub use domain::{PeakSnapshot, SizeOverTime, Timeline};
pub use peaks::{find_peaks, local_maxima, prominence};
