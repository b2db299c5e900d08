//! Prominence-filtered peak detection
//!
//! # Algorithm
//!
//! ```text
//! local maximum at i:  x[i-1] < x[i] = ... = x[j] > x[j+1]   (0 < i, j < n-1)
//!                      a plateau i..=j reports its first index i
//!
//! prominence(i) = x[i] - max(min(left flank), min(right flank))
//!     left flank:  x[k..=i] for the largest k whose samples are all <= x[i]
//!     right flank: x[i..=k] for the largest k whose samples are all <= x[i]
//! ```
//!
//! A peak is kept when `prominence >= ratio * max(x)`, which drops wiggles
//! that are small relative to the whole curve.
//!
//! # Complexity
//! O(n * p) for p local maxima; flanks stop at the first higher sample.

/// Indices of local maxima, plateaus resolved to their first index
pub fn local_maxima(x: &[u64]) -> Vec<usize> {
    let mut peaks = Vec::new();
    if x.len() < 3 {
        return peaks;
    }

    let last = x.len() - 1;
    let mut i = 1;
    while i < last {
        if x[i - 1] < x[i] {
            let mut ahead = i + 1;
            while ahead < last && x[ahead] == x[i] {
                ahead += 1;
            }
            if x[ahead] < x[i] {
                peaks.push(i);
                i = ahead;
                continue;
            }
        }
        i += 1;
    }
    peaks
}

/// Height of `x[peak]` above the higher of its two flanking minima
pub fn prominence(x: &[u64], peak: usize) -> u64 {
    let height = x[peak];
    let left_base = x[..=peak]
        .iter()
        .rev()
        .take_while(|&&v| v <= height)
        .min()
        .copied()
        .unwrap_or(height);
    let right_base = x[peak..]
        .iter()
        .take_while(|&&v| v <= height)
        .min()
        .copied()
        .unwrap_or(height);
    height - left_base.max(right_base)
}

/// Indices of local maxima whose prominence is at least `ratio * max(x)`
pub fn find_peaks(x: &[u64], ratio: f64) -> Vec<usize> {
    let Some(&global_max) = x.iter().max() else {
        return Vec::new();
    };
    let min_prominence = global_max as f64 * ratio;

    local_maxima(x)
        .into_iter()
        .filter(|&peak| prominence(x, peak) as f64 >= min_prominence)
        .collect()
}
