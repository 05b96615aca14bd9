//! Transform-length selection.
//!
//! FFT backends run fastest on lengths that factor into small primes. For a
//! target interval the selector picks, among the powers of 2, 3, 5 and 7
//! nearest to `round(sampling_rate * interval)`, the one closest to that
//! target. Every tie resolves toward the lower length.

use log::debug;

use crate::error::StftError;

/// Bases whose powers are considered as frame lengths.
pub const BASES: [usize; 4] = [2, 3, 5, 7];

/// Largest target, in samples, the selector accepts (about six minutes at
/// 44.1 kHz).
pub const MAX_TARGET_SAMPLES: usize = 1 << 24;

/// Pick the frame length for `target_interval` seconds at `sampling_rate` Hz.
///
/// Fails with [`StftError::InvalidInterval`] unless the interval is a
/// positive finite number spanning at most [`MAX_TARGET_SAMPLES`] samples.
/// Targets that round below one sample use 1.
pub fn select_frame_length(target_interval: f64, sampling_rate: u32) -> Result<usize, StftError> {
    if !(target_interval > 0.0 && target_interval.is_finite()) {
        return Err(StftError::InvalidInterval(target_interval));
    }
    let target = target_samples(target_interval, sampling_rate);
    if target > MAX_TARGET_SAMPLES {
        return Err(StftError::InvalidInterval(target_interval));
    }
    let mut candidates = BASES.map(|base| closest_power(target, base));
    candidates.sort_unstable();
    let n = closest_in_sorted(&candidates, target).unwrap_or(1);
    debug!("target {target} samples, candidates {candidates:?}, selected {n}");
    Ok(n)
}

/// Raw sample count for the interval, never below one.
pub fn target_samples(target_interval: f64, sampling_rate: u32) -> usize {
    let raw = (f64::from(sampling_rate) * target_interval).round();
    if raw < 1.0 {
        1
    } else if raw >= usize::MAX as f64 {
        usize::MAX
    } else {
        raw as usize
    }
}

/// The power of `base` nearest to `target`, the lower one on a tie.
///
/// `base` must be at least 2 and `target` at least 1.
pub fn closest_power(target: usize, base: usize) -> usize {
    debug_assert!(base >= 2);
    let target = target.max(1);
    // Largest power not above the target.
    let mut below = 1usize;
    while let Some(next) = below.checked_mul(base) {
        if next > target {
            break;
        }
        below = next;
    }
    if below == target {
        return below;
    }
    match below.checked_mul(base) {
        Some(above) if above - target < target - below => above,
        _ => below,
    }
}

/// The element of ascending `sorted` nearest to `target`.
///
/// Uses the predecessor and successor found by binary search; a tie picks
/// the predecessor, and a target outside the list picks the existing bound.
/// Returns `None` for an empty list.
pub fn closest_in_sorted(sorted: &[usize], target: usize) -> Option<usize> {
    let split = sorted.partition_point(|&v| v <= target);
    let below = split.checked_sub(1).map(|i| sorted[i]);
    let above = sorted.get(split).copied();
    match (below, above) {
        (Some(b), Some(a)) => Some(if a - target < target - b { a } else { b }),
        (Some(b), None) => Some(b),
        (None, a) => a,
    }
}
