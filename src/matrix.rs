//! Boundary-matrix transform module
//! Exact orthogonal realization of the DWT for [`BoundaryMode::Boundary`]:
//! instead of padding, each level applies a square analysis operator whose
//! interior rows are the shifted decomposition filters and whose truncated
//! edge rows are re-orthonormalized with modified Gram-Schmidt. Synthesis is
//! the transpose, so reconstruction at the boundaries is lossless without
//! any padding. Requires an orthogonal wavelet and even signal lengths.
//!
//! [`BoundaryMode::Boundary`]: crate::mode::BoundaryMode::Boundary

use log::{debug, trace};
use ndarray::{s, Array2, Array3, Axis};

use crate::conv::reversed;
use crate::dwt::{check_input, resolve_level};
use crate::dwt2::{Coeffs2, DetailBands};
use crate::error::WaveletError;
use crate::num::Sample;
use crate::wavelet::Wavelet;

fn require_orthogonal<T: Sample>(wavelet: &Wavelet<T>) -> Result<(), WaveletError> {
    if wavelet.is_orthogonal() {
        Ok(())
    } else {
        Err(WaveletError::InvalidFilterBank(
            "boundary transform requires an orthogonal wavelet".to_string(),
        ))
    }
}

fn require_even(len: usize) -> Result<(), WaveletError> {
    if len % 2 != 0 {
        return Err(WaveletError::OddInputLength { len });
    }
    Ok(())
}

// Orthonormalizes the candidate rows in `order`, earlier rows first. Rows
// that were already orthonormal stay put up to rounding; truncated edge
// rows rotate into the remaining subspace.
fn gram_schmidt_rows<T: Sample>(a: &mut Array2<T>, order: &[usize]) -> Result<(), WaveletError> {
    let cols = a.ncols();
    let mut done: Vec<usize> = Vec::with_capacity(order.len());
    for &r in order {
        for &p in &done {
            let mut dot = T::zero();
            for c in 0..cols {
                dot = a[[r, c]].mul_add(a[[p, c]], dot);
            }
            for c in 0..cols {
                let adj = dot * a[[p, c]];
                a[[r, c]] = a[[r, c]] - adj;
            }
        }
        let mut norm = T::zero();
        for c in 0..cols {
            norm = a[[r, c]].mul_add(a[[r, c]], norm);
        }
        let norm = norm.sqrt();
        if norm < T::from_f64(1e-8) {
            return Err(WaveletError::InvalidFilterBank(
                "boundary rows are linearly dependent".to_string(),
            ));
        }
        for c in 0..cols {
            a[[r, c]] = a[[r, c]] / norm;
        }
        done.push(r);
    }
    Ok(())
}

/// Builds the orthogonal analysis operator for an even signal length: the
/// low-pass functionals occupy rows `0..n/2`, the high-pass rows `n/2..n`,
/// each placed at column offset `2i` and truncated at the right edge.
pub(crate) fn analysis_operator<T: Sample>(
    wavelet: &Wavelet<T>,
    n: usize,
) -> Result<Array2<T>, WaveletError> {
    require_even(n)?;
    let taps = wavelet.filter_length();
    // Below one filter span the truncated rows stop being independent.
    if n < taps {
        return Err(WaveletError::InvalidLevels { requested: 1, max: 0 });
    }
    let dec_lo_rev = reversed(wavelet.dec_lo());
    let dec_hi_rev = reversed(wavelet.dec_hi());
    let half = n / 2;
    let mut a = Array2::zeros((n, n));
    for i in 0..half {
        for k in 0..taps {
            let col = 2 * i + k;
            if col < n {
                a[[i, col]] = dec_lo_rev[k];
                a[[half + i, col]] = dec_hi_rev[k];
            }
        }
    }
    // Interior rows first so Gram-Schmidt leaves them untouched; the
    // truncated edge rows then fill out the orthogonal complement.
    let mut order: Vec<usize> = Vec::with_capacity(n);
    for i in 0..half {
        if 2 * i + taps <= n {
            order.push(i);
            order.push(half + i);
        }
    }
    for i in 0..half {
        if 2 * i + taps > n {
            order.push(i);
            order.push(half + i);
        }
    }
    gram_schmidt_rows(&mut a, &order)?;
    trace!("boundary operator {}x{} for {}", n, n, wavelet.name());
    Ok(a)
}

/// One analysis level through the boundary operator.
pub fn matrix_dwt<T: Sample>(
    data: &Array2<T>,
    wavelet: &Wavelet<T>,
) -> Result<(Array2<T>, Array2<T>), WaveletError> {
    check_input(data)?;
    require_orthogonal(wavelet)?;
    let n = data.ncols();
    let a = analysis_operator(wavelet, n)?;
    let y = data.dot(&a.t());
    let half = n / 2;
    Ok((y.slice(s![.., ..half]).to_owned(), y.slice(s![.., half..]).to_owned()))
}

/// Inverse of [`matrix_dwt`]: applies the transposed operator, which is
/// exact for every input thanks to orthogonality.
pub fn matrix_idwt<T: Sample>(
    approx: &Array2<T>,
    detail: &Array2<T>,
    wavelet: &Wavelet<T>,
) -> Result<Array2<T>, WaveletError> {
    check_input(approx)?;
    require_orthogonal(wavelet)?;
    if approx.dim() != detail.dim() {
        return Err(WaveletError::MismatchedLengths);
    }
    let half = approx.ncols();
    let n = 2 * half;
    let a = analysis_operator(wavelet, n)?;
    let mut y = Array2::zeros((approx.nrows(), n));
    y.slice_mut(s![.., ..half]).assign(approx);
    y.slice_mut(s![.., half..]).assign(detail);
    Ok(y.dot(&a))
}

/// Multi-level boundary analysis. Every level needs an even input length:
/// explicit depths fail with [`WaveletError::OddInputLength`] when a level
/// would see an odd length, automatic depth stops early instead.
pub fn matrix_wavedec<T: Sample>(
    data: &Array2<T>,
    wavelet: &Wavelet<T>,
    level: Option<usize>,
) -> Result<Vec<Array2<T>>, WaveletError> {
    check_input(data)?;
    require_orthogonal(wavelet)?;
    let n = data.ncols();
    require_even(n)?;
    let requested = resolve_level(n, wavelet.filter_length(), level)?;
    let explicit = level.is_some();
    debug!("matrix_wavedec: up to {} levels over {} samples", requested, n);
    let mut details: Vec<Array2<T>> = Vec::with_capacity(requested);
    let mut approx = data.clone();
    for _ in 0..requested {
        let len = approx.ncols();
        if len % 2 != 0 {
            if explicit {
                return Err(WaveletError::OddInputLength { len });
            }
            break;
        }
        if len < wavelet.filter_length() {
            break;
        }
        let (a, d) = matrix_dwt(&approx, wavelet)?;
        details.push(d);
        approx = a;
    }
    let mut coeffs = Vec::with_capacity(details.len() + 1);
    coeffs.push(approx);
    coeffs.extend(details.into_iter().rev());
    Ok(coeffs)
}

/// Multi-level boundary synthesis, coarsest first. Lengths double exactly
/// at every level, so no truncation is ever needed.
pub fn matrix_waverec<T: Sample>(
    coeffs: &[Array2<T>],
    wavelet: &Wavelet<T>,
) -> Result<Array2<T>, WaveletError> {
    let first = coeffs.first().ok_or(WaveletError::EmptyInput)?;
    check_input(first)?;
    require_orthogonal(wavelet)?;
    let batch = first.nrows();
    if coeffs.iter().any(|c| c.nrows() != batch) {
        return Err(WaveletError::MismatchedLengths);
    }
    let mut approx = first.clone();
    for detail in &coeffs[1..] {
        if detail.ncols() != approx.ncols() {
            return Err(WaveletError::MismatchedLengths);
        }
        approx = matrix_idwt(&approx, detail, wavelet)?;
    }
    Ok(approx)
}

// 2D blocks: the height operator acts from the left, the transposed width
// operator from the right, then the four quadrants are the subbands.

/// One 2D analysis level: `A_h X A_w^T` per image, split into quadrants.
pub fn matrix_dwt2<T: Sample>(
    data: &Array3<T>,
    wavelet: &Wavelet<T>,
) -> Result<(Array3<T>, DetailBands<T>), WaveletError> {
    let (batch, height, width) = data.dim();
    if batch == 0 || height == 0 || width == 0 {
        return Err(WaveletError::EmptyInput);
    }
    require_orthogonal(wavelet)?;
    let ah = analysis_operator(wavelet, height)?;
    let aw = analysis_operator(wavelet, width)?;
    let (hh, hw) = (height / 2, width / 2);
    let mut a = Array3::zeros((batch, hh, hw));
    let mut h = Array3::zeros((batch, hh, hw));
    let mut v = Array3::zeros((batch, hh, hw));
    let mut d = Array3::zeros((batch, hh, hw));
    for b in 0..batch {
        let img = data.index_axis(Axis(0), b);
        let y = ah.dot(&img).dot(&aw.t());
        a.index_axis_mut(Axis(0), b).assign(&y.slice(s![..hh, ..hw]));
        v.index_axis_mut(Axis(0), b).assign(&y.slice(s![..hh, hw..]));
        h.index_axis_mut(Axis(0), b).assign(&y.slice(s![hh.., ..hw]));
        d.index_axis_mut(Axis(0), b).assign(&y.slice(s![hh.., hw..]));
    }
    Ok((a, DetailBands { h, v, d }))
}

/// Inverse of [`matrix_dwt2`].
pub fn matrix_idwt2<T: Sample>(
    approx: &Array3<T>,
    bands: &DetailBands<T>,
    wavelet: &Wavelet<T>,
) -> Result<Array3<T>, WaveletError> {
    let (batch, hh, hw) = approx.dim();
    if batch == 0 || hh == 0 || hw == 0 {
        return Err(WaveletError::EmptyInput);
    }
    require_orthogonal(wavelet)?;
    if approx.dim() != bands.h.dim()
        || approx.dim() != bands.v.dim()
        || approx.dim() != bands.d.dim()
    {
        return Err(WaveletError::MismatchedLengths);
    }
    let (height, width) = (2 * hh, 2 * hw);
    let ah = analysis_operator(wavelet, height)?;
    let aw = analysis_operator(wavelet, width)?;
    let mut out = Array3::zeros((batch, height, width));
    let mut y = Array2::zeros((height, width));
    for b in 0..batch {
        y.slice_mut(s![..hh, ..hw]).assign(&approx.index_axis(Axis(0), b));
        y.slice_mut(s![..hh, hw..]).assign(&bands.v.index_axis(Axis(0), b));
        y.slice_mut(s![hh.., ..hw]).assign(&bands.h.index_axis(Axis(0), b));
        y.slice_mut(s![hh.., hw..]).assign(&bands.d.index_axis(Axis(0), b));
        let x = ah.t().dot(&y).dot(&aw);
        out.index_axis_mut(Axis(0), b).assign(&x);
    }
    Ok(out)
}

/// Multi-level 2D boundary analysis with the same evenness contract as
/// [`matrix_wavedec`], applied to both axes.
pub fn matrix_wavedec2<T: Sample>(
    data: &Array3<T>,
    wavelet: &Wavelet<T>,
    level: Option<usize>,
) -> Result<Coeffs2<T>, WaveletError> {
    let (batch, height, width) = data.dim();
    if batch == 0 || height == 0 || width == 0 {
        return Err(WaveletError::EmptyInput);
    }
    require_orthogonal(wavelet)?;
    require_even(height)?;
    require_even(width)?;
    let requested = resolve_level(height.min(width), wavelet.filter_length(), level)?;
    let explicit = level.is_some();
    debug!("matrix_wavedec2: up to {} levels over {}x{} images", requested, height, width);
    let mut details = Vec::with_capacity(requested);
    let mut approx = data.clone();
    for _ in 0..requested {
        let (_, ch, cw) = approx.dim();
        if ch % 2 != 0 || cw % 2 != 0 {
            if explicit {
                let len = if ch % 2 != 0 { ch } else { cw };
                return Err(WaveletError::OddInputLength { len });
            }
            break;
        }
        if ch < wavelet.filter_length() || cw < wavelet.filter_length() {
            break;
        }
        let (a, bands) = matrix_dwt2(&approx, wavelet)?;
        details.push(bands);
        approx = a;
    }
    details.reverse();
    Ok(Coeffs2 { approx, details })
}

/// Multi-level 2D boundary synthesis.
pub fn matrix_waverec2<T: Sample>(
    coeffs: &Coeffs2<T>,
    wavelet: &Wavelet<T>,
) -> Result<Array3<T>, WaveletError> {
    let (batch, _, _) = coeffs.approx.dim();
    if batch == 0 {
        return Err(WaveletError::EmptyInput);
    }
    require_orthogonal(wavelet)?;
    let mut approx = coeffs.approx.clone();
    for bands in &coeffs.details {
        approx = matrix_idwt2(&approx, bands, wavelet)?;
    }
    Ok(approx)
}
