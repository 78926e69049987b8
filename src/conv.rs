//! Strided convolution kernels behind the 1D and 2D transforms.
//!
//! Analysis correlates a padded signal with the time-reversed decomposition
//! filters at stride 2; synthesis is the matching transposed convolution:
//! upsample by two, convolve with the reconstruction filters in natural
//! order, and sum the two channels. Cropping the synthesis output back to
//! the un-padded region is left to the callers, which know the coefficient
//! lengths of the neighboring levels.

use crate::error::WaveletError;
use crate::mode::{pad, BoundaryMode};
use crate::num::Sample;

/// Per-side padding that keeps boundary coefficients complete for a filter
/// of `filter_len` taps.
pub(crate) fn pad_amount(filter_len: usize) -> usize {
    (2 * filter_len).saturating_sub(3) / 2
}

/// Coefficient count produced by one analysis level on a signal of `len`
/// samples with a `filter_len`-tap filter.
pub(crate) fn coeff_len(len: usize, filter_len: usize) -> usize {
    (len + filter_len - 1) / 2
}

pub(crate) fn reversed<T: Copy>(filter: &[T]) -> Vec<T> {
    filter.iter().rev().copied().collect()
}

/// Valid stride-2 correlation of `padded` with an already reversed filter.
pub(crate) fn correlate_stride2<T: Sample>(padded: &[T], filter_rev: &[T]) -> Vec<T> {
    let taps = filter_rev.len();
    let out_len = (padded.len() - taps) / 2 + 1;
    let mut out = Vec::with_capacity(out_len);
    for i in 0..out_len {
        let window = &padded[2 * i..2 * i + taps];
        let mut acc = T::zero();
        for (x, f) in window.iter().zip(filter_rev) {
            acc = x.mul_add(*f, acc);
        }
        out.push(acc);
    }
    out
}

/// One analysis level for a single row: pad once, split into the low-pass
/// and high-pass halves. Odd rows get one extra sample of padding on the
/// right so the stride-2 windows cover the last sample.
pub(crate) fn analysis_pair<T: Sample>(
    row: &[T],
    dec_lo_rev: &[T],
    dec_hi_rev: &[T],
    mode: BoundaryMode,
) -> Result<(Vec<T>, Vec<T>), WaveletError> {
    let padl = pad_amount(dec_lo_rev.len());
    let padr = padl + (row.len() % 2);
    let padded = pad(row, padl, padr, mode)?;
    let lo = correlate_stride2(&padded, dec_lo_rev);
    let hi = correlate_stride2(&padded, dec_hi_rev);
    Ok((lo, hi))
}

/// Runs `f` over every batch index, in parallel when the `parallel` feature
/// is enabled, collecting the first error if any row fails.
#[cfg(feature = "parallel")]
pub(crate) fn try_map_batch<R, F>(count: usize, f: F) -> Result<Vec<R>, WaveletError>
where
    R: Send,
    F: Fn(usize) -> Result<R, WaveletError> + Sync + Send,
{
    use rayon::prelude::*;
    (0..count).into_par_iter().map(f).collect()
}

#[cfg(not(feature = "parallel"))]
pub(crate) fn try_map_batch<R, F>(count: usize, f: F) -> Result<Vec<R>, WaveletError>
where
    F: Fn(usize) -> Result<R, WaveletError>,
{
    (0..count).map(f).collect()
}

/// Transposed-convolution synthesis of one level, without cropping. The
/// output has `2 * len - 2 + taps` samples; the caller strips the padding.
pub(crate) fn upsample_conv_sum<T: Sample>(
    approx: &[T],
    detail: &[T],
    rec_lo: &[T],
    rec_hi: &[T],
) -> Vec<T> {
    debug_assert_eq!(approx.len(), detail.len());
    let taps = rec_lo.len();
    let len = approx.len();
    let mut out = vec![T::zero(); 2 * len + taps - 2];
    for i in 0..len {
        let base = 2 * i;
        for k in 0..taps {
            let acc = approx[i].mul_add(rec_lo[k], detail[i] * rec_hi[k]);
            out[base + k] = out[base + k] + acc;
        }
    }
    out
}
