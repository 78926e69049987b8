//! # wavetree - Fast wavelet transforms for Rust
//!
//! A discrete wavelet transform library featuring batched 1D and 2D
//! decompositions, boundary-matrix transforms, and wavelet packet trees.
//! Modeled on the conventions of the classic Python wavelet toolkits.
//!
//! ## Features
//!
//! - **Batched transforms**: every operation maps over a leading batch axis
//! - **Single and multi level**: `dwt`/`idwt` plus `wavedec`/`waverec`
//! - **Separable 2D transforms** with per-level detail bands
//! - **Signal extension modes**: zero, constant, reflect, periodic
//! - **Boundary filter matrices** for padding-free orthogonal transforms
//! - **Wavelet packet trees** in one and two dimensions
//! - **Generic precision**: `f32` and `f64` via the [`Sample`] trait
//!
//! ## Cargo Features
//!
//! - `parallel`: process batch entries in parallel with Rayon
//! - `internal-tests`: enable property-based internal test suites
//!
//! ## Example
//!
//! ```
//! use ndarray::Array2;
//! use wavetree::{wavedec, waverec, BoundaryMode, Wavelet};
//!
//! let data = Array2::<f64>::ones((1, 32));
//! let wavelet = Wavelet::parse("db2").unwrap();
//! let coeffs = wavedec(&data, &wavelet, BoundaryMode::Reflect, Some(3)).unwrap();
//! let rec = waverec(&coeffs, &wavelet, BoundaryMode::Reflect).unwrap();
//! assert_eq!(rec.dim(), data.dim());
//! ```
//!
//! ## License
//!
//! Licensed under either of
//! - Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or https://www.apache.org/licenses/LICENSE-2.0)
//! - MIT license ([LICENSE-MIT](LICENSE-MIT) or https://opensource.org/licenses/MIT)
//!
//! at your option.

/// Error type shared by every transform in the crate.
pub mod error;

/// Signal extension modes
///
/// Padding strategies applied before convolution, plus the marker for the
/// boundary-matrix path.
pub mod mode;

/// Scalar abstraction over `f32` and `f64`.
pub mod num;

/// Wavelet filter banks
///
/// Built-in orthogonal families (Haar, Daubechies, symlets, coiflets) and
/// construction from custom four-filter banks.
pub mod wavelet;

mod conv;

/// One-dimensional transforms
///
/// Single-level analysis and synthesis plus the multi-level
/// `wavedec`/`waverec` pair over batched signals.
pub mod dwt;

/// Two-dimensional transforms
///
/// Separable single and multi level image decompositions with
/// horizontal/vertical/diagonal detail bands.
pub mod dwt2;

/// Boundary filter matrices
///
/// Sparse orthogonal analysis operators with Gram-Schmidt corrected edge
/// rows; exact-length transforms without padding.
pub mod matrix;

/// Wavelet packet trees
///
/// Recursive decomposition of all subbands with path-string access and
/// frequency orderings.
pub mod packet;

pub use dwt::{dwt, dwt_max_level, idwt, wavedec, waverec};
pub use dwt2::{dwt2, idwt2, wavedec2, waverec2, Coeffs2, DetailBands};
pub use error::WaveletError;
pub use matrix::{
    matrix_dwt, matrix_dwt2, matrix_idwt, matrix_idwt2, matrix_wavedec, matrix_wavedec2,
    matrix_waverec, matrix_waverec2,
};
pub use mode::BoundaryMode;
pub use num::Sample;
pub use packet::{get_freq_order, get_graycode_order, WaveletPacket, WaveletPacket2};
pub use wavelet::{FilterBank, Wavelet};

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, Array3};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_batch(seed: u64, rows: usize, cols: usize) -> Array2<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut data = Array2::zeros((rows, cols));
        for x in data.iter_mut() {
            *x = rng.gen_range(-1.0..1.0);
        }
        data
    }

    #[test]
    fn default_mode_is_reflect() {
        let data = random_batch(1, 1, 32);
        let w: Wavelet<f64> = Wavelet::parse("db3").unwrap();
        let (a, d) = dwt(&data, &w, BoundaryMode::default()).unwrap();
        let (a2, d2) = dwt(&data, &w, BoundaryMode::Reflect).unwrap();
        assert_eq!(a, a2);
        assert_eq!(d, d2);
    }

    #[test]
    fn boundary_mode_dispatches_to_matrix_path() {
        let data = random_batch(2, 2, 16);
        let w: Wavelet<f64> = Wavelet::parse("db2").unwrap();
        let (a, d) = dwt(&data, &w, BoundaryMode::Boundary).unwrap();
        let (ma, md) = matrix_dwt(&data, &w).unwrap();
        assert_eq!(a, ma);
        assert_eq!(d, md);
    }

    #[test]
    fn f32_roundtrip() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut data = Array2::<f32>::zeros((2, 32));
        for x in data.iter_mut() {
            *x = rng.gen_range(-1.0..1.0);
        }
        let w: Wavelet<f32> = Wavelet::parse("sym4").unwrap();
        let coeffs = wavedec(&data, &w, BoundaryMode::Periodic, Some(2)).unwrap();
        let rec = waverec(&coeffs, &w, BoundaryMode::Periodic).unwrap();
        for (x, y) in rec.iter().zip(data.iter()) {
            assert!((x - y).abs() < 1e-4, "{} vs {}", x, y);
        }
    }

    #[test]
    fn surface_end_to_end_2d() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut data = Array3::<f64>::zeros((1, 16, 16));
        for x in data.iter_mut() {
            *x = rng.gen_range(-1.0..1.0);
        }
        let w: Wavelet<f64> = Wavelet::parse("coif1").unwrap();
        let coeffs = wavedec2(&data, &w, BoundaryMode::Constant, None).unwrap();
        assert_eq!(coeffs.levels(), dwt_max_level(16, w.filter_length()));
        let rec = waverec2(&coeffs, &w, BoundaryMode::Constant).unwrap();
        for (x, y) in rec.iter().zip(data.iter()) {
            assert!((x - y).abs() < 1e-8, "{} vs {}", x, y);
        }
    }

    #[test]
    fn packet_surface_reachable_from_root() {
        let data = random_batch(23, 1, 16);
        let w: Wavelet<f64> = Wavelet::parse("haar").unwrap();
        let wp = WaveletPacket::new(&data, w, BoundaryMode::Zero, Some(2)).unwrap();
        assert_eq!(wp.get_level(2).unwrap().len(), 4);
        assert_eq!(get_graycode_order(2), vec!["aa", "ad", "dd", "da"]);
        assert_eq!(get_freq_order(1).len(), 2);
    }
}
