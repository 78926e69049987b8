//! 1D fast wavelet transform module
//! Batched single- and multi-level analysis and synthesis by strided
//! convolution. Signals are `(batch, time)` arrays; selecting
//! [`BoundaryMode::Boundary`] routes every call through the orthogonal
//! boundary-matrix path instead of padded convolution.

use log::debug;
use ndarray::Array2;

use crate::conv::{analysis_pair, pad_amount, reversed, try_map_batch, upsample_conv_sum};
use crate::error::WaveletError;
use crate::matrix;
use crate::mode::BoundaryMode;
use crate::num::Sample;
use crate::wavelet::Wavelet;

/// Maximum useful decomposition depth for `data_len` samples under a filter
/// of `filter_len` taps: the coarsest approximation keeps at least one full
/// filter window. Returns 0 when no level is possible.
pub fn dwt_max_level(data_len: usize, filter_len: usize) -> usize {
    if filter_len <= 1 {
        return 0;
    }
    let mut n = data_len / (filter_len - 1);
    let mut level = 0;
    while n > 1 {
        n >>= 1;
        level += 1;
    }
    level
}

pub(crate) fn check_input<T: Sample>(data: &Array2<T>) -> Result<(), WaveletError> {
    if data.nrows() == 0 || data.ncols() == 0 {
        return Err(WaveletError::EmptyInput);
    }
    Ok(())
}

// Explicit depths past the computable maximum are errors; the automatic
// depth never goes below one level even for very short signals.
pub(crate) fn resolve_level(
    len: usize,
    filter_len: usize,
    requested: Option<usize>,
) -> Result<usize, WaveletError> {
    let max = dwt_max_level(len, filter_len);
    match requested {
        Some(level) if level > max => Err(WaveletError::InvalidLevels { requested: level, max }),
        Some(level) => Ok(level),
        None => Ok(max.max(1)),
    }
}

pub(crate) fn to_rows<T: Sample>(data: &Array2<T>) -> Vec<Vec<T>> {
    data.outer_iter().map(|row| row.to_vec()).collect()
}

pub(crate) fn rows_to_array<T: Sample>(rows: &[Vec<T>]) -> Array2<T> {
    let batch = rows.len();
    let len = rows.first().map_or(0, Vec::len);
    let mut out = Array2::zeros((batch, len));
    for (mut dst, src) in out.outer_iter_mut().zip(rows) {
        for (d, s) in dst.iter_mut().zip(src) {
            *d = *s;
        }
    }
    out
}

/// One analysis level: splits `(batch, time)` signals into approximation
/// and detail halves of length `(time + taps - 1) / 2` each.
pub fn dwt<T: Sample>(
    data: &Array2<T>,
    wavelet: &Wavelet<T>,
    mode: BoundaryMode,
) -> Result<(Array2<T>, Array2<T>), WaveletError> {
    check_input(data)?;
    if mode == BoundaryMode::Boundary {
        return matrix::matrix_dwt(data, wavelet);
    }
    let dec_lo_rev = reversed(wavelet.dec_lo());
    let dec_hi_rev = reversed(wavelet.dec_hi());
    let rows = to_rows(data);
    let pairs = try_map_batch(rows.len(), |i| {
        analysis_pair(&rows[i], &dec_lo_rev, &dec_hi_rev, mode)
    })?;
    let (lo, hi): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
    Ok((rows_to_array(&lo), rows_to_array(&hi)))
}

/// One synthesis level. For signals whose length was even on the matching
/// forward level this is an exact inverse; odd lengths come back one sample
/// long and the caller truncates.
pub fn idwt<T: Sample>(
    approx: &Array2<T>,
    detail: &Array2<T>,
    wavelet: &Wavelet<T>,
    mode: BoundaryMode,
) -> Result<Array2<T>, WaveletError> {
    check_input(approx)?;
    check_input(detail)?;
    if approx.dim() != detail.dim() {
        return Err(WaveletError::MismatchedLengths);
    }
    if mode == BoundaryMode::Boundary {
        return matrix::matrix_idwt(approx, detail, wavelet);
    }
    let taps = wavelet.filter_length();
    let padl = pad_amount(taps);
    synthesis_level(&to_rows(approx), &to_rows(detail), wavelet, padl, padl)
        .map(|rows| rows_to_array(&rows))
}

fn synthesis_level<T: Sample>(
    approx: &[Vec<T>],
    detail: &[Vec<T>],
    wavelet: &Wavelet<T>,
    padl: usize,
    padr: usize,
) -> Result<Vec<Vec<T>>, WaveletError> {
    let taps = wavelet.filter_length();
    let len = approx.first().map_or(0, Vec::len);
    let full_len = 2 * len + taps - 2;
    if full_len < padl + padr + 1 {
        return Err(WaveletError::MismatchedLengths);
    }
    let rec_lo = wavelet.rec_lo().to_vec();
    let rec_hi = wavelet.rec_hi().to_vec();
    try_map_batch(approx.len(), |i| {
        let full = upsample_conv_sum(&approx[i], &detail[i], &rec_lo, &rec_hi);
        Ok(full[padl..full.len() - padr].to_vec())
    })
}

/// Multi-level analysis. `level: None` picks the automatic depth from
/// [`dwt_max_level`] (at least one level); explicit depths beyond the
/// maximum fail with [`WaveletError::InvalidLevels`]. Returns
/// `[approx_k, detail_k, ..., detail_1]`, coarsest first.
pub fn wavedec<T: Sample>(
    data: &Array2<T>,
    wavelet: &Wavelet<T>,
    mode: BoundaryMode,
    level: Option<usize>,
) -> Result<Vec<Array2<T>>, WaveletError> {
    check_input(data)?;
    if mode == BoundaryMode::Boundary {
        return matrix::matrix_wavedec(data, wavelet, level);
    }
    let taps = wavelet.filter_length();
    let level = resolve_level(data.ncols(), taps, level)?;
    debug!(
        "wavedec: {} levels over {} samples, {} taps, mode {}",
        level,
        data.ncols(),
        taps,
        mode
    );
    let mut details: Vec<Array2<T>> = Vec::with_capacity(level);
    let mut approx = data.clone();
    for _ in 0..level {
        let (a, d) = dwt(&approx, wavelet, mode)?;
        details.push(d);
        approx = a;
    }
    let mut coeffs = Vec::with_capacity(level + 1);
    coeffs.push(approx);
    coeffs.extend(details.into_iter().rev());
    Ok(coeffs)
}

/// Multi-level synthesis, folding the coefficient list coarsest-to-finest.
/// When the original length was not a multiple of `2^levels` the output
/// carries one trailing sample of residual padding per odd level; truncate
/// to the known length if exactness is required.
pub fn waverec<T: Sample>(
    coeffs: &[Array2<T>],
    wavelet: &Wavelet<T>,
    mode: BoundaryMode,
) -> Result<Array2<T>, WaveletError> {
    let first = coeffs.first().ok_or(WaveletError::EmptyInput)?;
    if mode == BoundaryMode::Boundary {
        return matrix::matrix_waverec(coeffs, wavelet);
    }
    check_input(first)?;
    let batch = first.nrows();
    if coeffs.iter().any(|c| c.nrows() != batch) {
        return Err(WaveletError::MismatchedLengths);
    }
    if coeffs.len() == 1 {
        return Ok(first.clone());
    }
    debug!("waverec: {} coefficient arrays, batch {}", coeffs.len(), batch);
    let padl = pad_amount(wavelet.filter_length());
    let mut approx = to_rows(first);
    for (pos, detail) in coeffs[1..].iter().enumerate() {
        let len = approx.first().map_or(0, Vec::len);
        if detail.ncols() != len {
            return Err(WaveletError::MismatchedLengths);
        }
        let mut padr = padl;
        // Levels above the coarsest may have absorbed one extra right pad on
        // the forward pass; the length of the next finer detail says so.
        if pos + 2 < coeffs.len() {
            let full_len = 2 * len + wavelet.filter_length() - 2;
            let next_len = coeffs[pos + 2].ncols();
            if next_len + padl + padr != full_len {
                padr += 1;
                if next_len + padl + padr != full_len {
                    return Err(WaveletError::MismatchedLengths);
                }
            }
        }
        approx = synthesis_level(&approx, &to_rows(detail), wavelet, padl, padr)?;
    }
    Ok(rows_to_array(&approx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn ripples_bank() -> Wavelet<f64> {
        Wavelet::from_filters(
            "unscaled-haar",
            vec![0.5, 0.5],
            vec![-0.5, 0.5],
            vec![0.5, 0.5],
            vec![0.5, -0.5],
        )
        .unwrap()
    }

    #[test]
    fn max_level_bounds() {
        assert_eq!(dwt_max_level(8, 2), 3);
        assert_eq!(dwt_max_level(7, 2), 2);
        assert_eq!(dwt_max_level(16, 4), 2);
        assert_eq!(dwt_max_level(63, 4), 4);
        assert_eq!(dwt_max_level(1, 2), 0);
        assert_eq!(dwt_max_level(0, 2), 0);
        assert_eq!(dwt_max_level(8, 1), 0);
    }

    #[test]
    fn three_level_average_difference_fixture() {
        // Page-7 example from "Ripples in Mathematics": averages and halved
        // differences of [56, 40, 8, 24, 48, 48, 40, 16].
        let data = array![[56.0, 40.0, 8.0, 24.0, 48.0, 48.0, 40.0, 16.0]];
        let coeffs = wavedec(&data, &ripples_bank(), BoundaryMode::Zero, Some(3)).unwrap();
        assert_eq!(coeffs.len(), 4);
        assert_eq!(coeffs[0], array![[35.0]]);
        assert_eq!(coeffs[1], array![[-3.0]]);
        assert_eq!(coeffs[2], array![[16.0, 10.0]]);
        assert_eq!(coeffs[3], array![[8.0, -8.0, 0.0, 12.0]]);
    }

    #[test]
    fn single_level_haar_shapes_and_values() {
        let w: Wavelet<f64> = Wavelet::parse("haar").unwrap();
        let data = array![[1.0, 2.0, 3.0, 4.0]];
        let (a, d) = dwt(&data, &w, BoundaryMode::Reflect).unwrap();
        assert_eq!(a.dim(), (1, 2));
        let s = core::f64::consts::FRAC_1_SQRT_2;
        assert!((a[[0, 0]] - 3.0 * s).abs() < 1e-12);
        assert!((a[[0, 1]] - 7.0 * s).abs() < 1e-12);
        assert!((d[[0, 0]] + s).abs() < 1e-12);
        assert!((d[[0, 1]] + s).abs() < 1e-12);
        let rec = idwt(&a, &d, &w, BoundaryMode::Reflect).unwrap();
        for (x, y) in rec.iter().zip(data.iter()) {
            assert!((x - y).abs() < 1e-12, "{} vs {}", x, y);
        }
    }

    #[test]
    fn roundtrip_even_length_batch() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut data = Array2::zeros((3, 32));
        for x in data.iter_mut() {
            *x = rng.gen_range(-1.0..1.0);
        }
        for name in ["db2", "db4", "sym5", "coif2"] {
            let w: Wavelet<f64> = Wavelet::parse(name).unwrap();
            for mode in [
                BoundaryMode::Zero,
                BoundaryMode::Constant,
                BoundaryMode::Reflect,
                BoundaryMode::Periodic,
            ] {
                let coeffs = wavedec(&data, &w, mode, None).unwrap();
                let rec = waverec(&coeffs, &w, mode).unwrap();
                assert_eq!(rec.nrows(), 3);
                for (x, y) in rec.iter().zip(data.iter()) {
                    assert!((x - y).abs() < 1e-8, "{}: {} vs {}", name, x, y);
                }
            }
        }
    }

    #[test]
    fn roundtrip_odd_length_truncates() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut data = Array2::zeros((2, 15));
        for x in data.iter_mut() {
            *x = rng.gen_range(-1.0..1.0);
        }
        let w: Wavelet<f64> = Wavelet::parse("db2").unwrap();
        let coeffs = wavedec(&data, &w, BoundaryMode::Reflect, Some(2)).unwrap();
        assert_eq!(coeffs[0].ncols(), 6);
        assert_eq!(coeffs[1].ncols(), 6);
        assert_eq!(coeffs[2].ncols(), 9);
        let rec = waverec(&coeffs, &w, BoundaryMode::Reflect).unwrap();
        // One residual sample of padding for the odd original length.
        assert_eq!(rec.ncols(), 16);
        for b in 0..2 {
            for t in 0..15 {
                let (x, y) = (rec[[b, t]], data[[b, t]]);
                assert!((x - y).abs() < 1e-10, "{} vs {}", x, y);
            }
        }
    }

    #[test]
    fn auto_level_counts() {
        let data = Array2::<f64>::ones((1, 32));
        let w = Wavelet::parse("haar").unwrap();
        let coeffs = wavedec(&data, &w, BoundaryMode::Reflect, None).unwrap();
        assert_eq!(coeffs.len(), 6);
        // Short signals still get one level.
        let tiny = Array2::<f64>::ones((1, 4));
        let db8 = Wavelet::parse("db8").unwrap();
        let coeffs = wavedec(&tiny, &db8, BoundaryMode::Reflect, None).unwrap();
        assert_eq!(coeffs.len(), 2);
    }

    #[test]
    fn requested_level_out_of_range() {
        let data = Array2::<f64>::ones((1, 8));
        let w = Wavelet::parse("haar").unwrap();
        match wavedec(&data, &w, BoundaryMode::Reflect, Some(4)) {
            Err(WaveletError::InvalidLevels { requested, max }) => {
                assert_eq!((requested, max), (4, 3));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn empty_inputs_rejected() {
        let w: Wavelet<f64> = Wavelet::parse("haar").unwrap();
        let no_samples = Array2::<f64>::zeros((1, 0));
        match dwt(&no_samples, &w, BoundaryMode::Zero) {
            Err(WaveletError::EmptyInput) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        let no_batch = Array2::<f64>::zeros((0, 8));
        match wavedec(&no_batch, &w, BoundaryMode::Zero, None) {
            Err(WaveletError::EmptyInput) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        match waverec::<f64>(&[], &w, BoundaryMode::Zero) {
            Err(WaveletError::EmptyInput) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn waverec_rejects_inconsistent_stacks() {
        let w: Wavelet<f64> = Wavelet::parse("haar").unwrap();
        // Batch mismatch between levels.
        let coeffs = vec![Array2::<f64>::ones((1, 2)), Array2::<f64>::ones((2, 2))];
        match waverec(&coeffs, &w, BoundaryMode::Zero) {
            Err(WaveletError::MismatchedLengths) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        // Approximation and detail lengths must agree.
        let coeffs = vec![Array2::<f64>::ones((1, 2)), Array2::<f64>::ones((1, 3))];
        match waverec(&coeffs, &w, BoundaryMode::Zero) {
            Err(WaveletError::MismatchedLengths) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn waverec_rejects_inconsistent_deep_stacks() {
        // Past the coarsest level the next finer length vets the crop; a
        // length no right-pad correction can explain is an error.
        let w: Wavelet<f64> = Wavelet::parse("haar").unwrap();
        let coeffs = vec![
            Array2::<f64>::ones((1, 2)),
            Array2::<f64>::ones((1, 2)),
            Array2::<f64>::ones((1, 8)),
        ];
        match waverec(&coeffs, &w, BoundaryMode::Zero) {
            Err(WaveletError::MismatchedLengths) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        // Arrays shorter than the overhang of a 16-tap filter.
        let w: Wavelet<f64> = Wavelet::parse("db8").unwrap();
        let coeffs = vec![Array2::<f64>::ones((1, 2)); 3];
        match waverec(&coeffs, &w, BoundaryMode::Zero) {
            Err(WaveletError::MismatchedLengths) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn waverec_of_lone_approximation_is_identity() {
        let w: Wavelet<f64> = Wavelet::parse("db3").unwrap();
        let a = array![[1.0, 2.0, 3.0]];
        let rec = waverec(&[a.clone()], &w, BoundaryMode::Reflect).unwrap();
        assert_eq!(rec, a);
    }
}

#[cfg(all(feature = "internal-tests", test))]
mod coverage_tests {
    use super::*;
    use ndarray::Array2;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_wavedec_waverec_roundtrip(
            len in 8usize..64,
            name in proptest::sample::select(vec!["haar", "db2", "db4", "sym4"]),
            ref signal in proptest::collection::vec(-1000.0f64..1000.0, 64),
        ) {
            let wavelet: Wavelet<f64> = Wavelet::parse(name).unwrap();
            let mut data = Array2::zeros((1, len));
            for (i, x) in signal.iter().take(len).enumerate() {
                data[[0, i]] = *x;
            }
            let coeffs = wavedec(&data, &wavelet, BoundaryMode::Reflect, None).unwrap();
            let rec = waverec(&coeffs, &wavelet, BoundaryMode::Reflect).unwrap();
            // rec may carry surplus padding samples; the prefix must match.
            for (x, y) in rec.iter().zip(data.iter()) {
                prop_assert!((x - y).abs() < 1e-6 * (1.0 + y.abs()), "{} vs {}", x, y);
            }
        }

        #[test]
        fn prop_coefficient_lengths(
            len in 1usize..200,
            name in proptest::sample::select(vec!["haar", "db2", "db8", "coif2"]),
        ) {
            let wavelet: Wavelet<f64> = Wavelet::parse(name).unwrap();
            let data = Array2::<f64>::ones((1, len));
            let (a, d) = dwt(&data, &wavelet, BoundaryMode::Periodic).unwrap();
            let expect = (len + wavelet.filter_length() - 1) / 2;
            prop_assert_eq!(a.ncols(), expect);
            prop_assert_eq!(d.ncols(), expect);
        }
    }
}
