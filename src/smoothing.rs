//! Count weighted smoothing of binned statistics.
//!
//! Each output bin is a weighted mean of the bins within `half_width` levels of it. The weight of
//! a bin is its record count times a triangular kernel that is 1 at the center and falls off
//! linearly to `1 / (half_width + 1)` at the edges of the window. Bins with no records therefore
//! do not contribute, and a window with no records at all has no value.
use itertools::izip;
use optional::{none, some, Optioned};

/// The triangular kernel for a window of half width `w`, with `2w + 1` weights.
///
/// `smooth` computes these weights as it goes and never builds the whole kernel, so it works
/// with any half width.
///
/// # Panics
///
/// If `2w + 1` weights can't be allocated.
///
/// # Examples
///
/// ```rust
/// use omf_profile::smoothing::triangular_kernel;
///
/// assert_eq!(triangular_kernel(0), vec![1.0]);
/// assert_eq!(triangular_kernel(1), vec![0.5, 1.0, 0.5]);
/// ```
pub fn triangular_kernel(half_width: usize) -> Vec<f64> {
    let w = half_width as f64;
    (0..=2 * half_width)
        .map(|j| (w + 1.0 - (j as f64 - w).abs()) / (w + 1.0))
        .collect()
}

// Weight of a bin `offset` levels from the center of a window of half width `w`.
#[inline]
fn kernel_weight(offset: usize, half_width: usize) -> f64 {
    let w = half_width as f64;
    (w + 1.0 - offset as f64) / (w + 1.0)
}

/// Smooth `vals` using the record `counts` of each bin as weights.
///
/// Output bins whose window contains no records are missing.
///
/// # Examples
///
/// ```rust
/// use omf_profile::smoothing::smooth;
///
/// let smoothed = smooth(&[1, 0, 0, 0, 1], &[2.0, 0.0, 0.0, 0.0, 4.0], 1);
///
/// assert_eq!(smoothed[0].into_option(), Some(2.0));
/// assert_eq!(smoothed[1].into_option(), Some(2.0));
/// assert!(smoothed[2].is_none());
/// assert_eq!(smoothed[4].into_option(), Some(4.0));
/// ```
pub fn smooth(counts: &[u32], vals: &[f64], half_width: usize) -> Vec<Optioned<f64>> {
    debug_assert_eq!(counts.len(), vals.len());

    let len = counts.len().min(vals.len());

    (0..len)
        .map(|i| {
            // Window of bins [first, last] clipped to the profile.
            let first = i.saturating_sub(half_width);
            let last = i.saturating_add(half_width).min(len - 1);

            let (weighted_sum, weight) = izip!(
                first..=last,
                &counts[first..=last],
                &vals[first..=last]
            )
            .filter(|&(_, &count, _)| count > 0)
            .fold((0.0, 0.0), |(sum, weight), (k, &count, &val)| {
                let offset = if k > i { k - i } else { i - k };
                let wt = f64::from(count) * kernel_weight(offset, half_width);
                (sum + val * wt, weight + wt)
            });

            if weight > 0.0 {
                some(weighted_sum / weight)
            } else {
                none()
            }
        })
        .collect()
}
