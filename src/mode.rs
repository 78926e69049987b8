//! Signal extension policy module
//! Maps symbolic padding-mode names onto concrete edge-extension rules and
//! pads 1D slices ahead of the strided convolutions.

use core::str::FromStr;

use crate::error::WaveletError;
use crate::num::Sample;

/// How a signal is extended past its edges before filtering.
///
/// `Boundary` is not a padding rule: it routes the transform through the
/// orthogonal boundary-matrix path instead of padding at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryMode {
    /// Pad with zeros.
    Zero,
    /// Repeat the edge sample.
    Constant,
    /// Mirror without repeating the edge sample.
    #[default]
    Reflect,
    /// Wrap around periodically.
    Periodic,
    /// Use boundary-adapted orthogonal matrices instead of padding.
    Boundary,
}

impl BoundaryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundaryMode::Zero => "zero",
            BoundaryMode::Constant => "constant",
            BoundaryMode::Reflect => "reflect",
            BoundaryMode::Periodic => "periodic",
            BoundaryMode::Boundary => "boundary",
        }
    }
}

impl FromStr for BoundaryMode {
    type Err = WaveletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zero" => Ok(BoundaryMode::Zero),
            "constant" => Ok(BoundaryMode::Constant),
            "reflect" => Ok(BoundaryMode::Reflect),
            "periodic" => Ok(BoundaryMode::Periodic),
            "boundary" => Ok(BoundaryMode::Boundary),
            other => Err(WaveletError::InvalidPaddingMode(other.to_string())),
        }
    }
}

impl core::fmt::Display for BoundaryMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Triangle-wave index for mirrored extension. The period is 2n-2 because the
// edge samples are not repeated.
fn reflect_index(i: isize, n: isize) -> usize {
    if n == 1 {
        return 0;
    }
    let period = 2 * (n - 1);
    let mut k = i.rem_euclid(period);
    if k >= n {
        k = period - k;
    }
    k as usize
}

/// Extend `data` by `padl` samples on the left and `padr` on the right.
///
/// Fails on empty input and on [`BoundaryMode::Boundary`], which has no
/// padding interpretation.
pub fn pad<T: Sample>(
    data: &[T],
    padl: usize,
    padr: usize,
    mode: BoundaryMode,
) -> Result<Vec<T>, WaveletError> {
    if data.is_empty() {
        return Err(WaveletError::EmptyInput);
    }
    let n = data.len();
    let mut out = Vec::with_capacity(padl + n + padr);
    match mode {
        BoundaryMode::Zero => {
            out.resize(padl, T::zero());
            out.extend_from_slice(data);
            out.resize(padl + n + padr, T::zero());
        }
        BoundaryMode::Constant => {
            out.resize(padl, data[0]);
            out.extend_from_slice(data);
            out.resize(padl + n + padr, data[n - 1]);
        }
        BoundaryMode::Reflect => {
            let ni = n as isize;
            for i in -(padl as isize)..(n + padr) as isize {
                out.push(data[reflect_index(i, ni)]);
            }
        }
        BoundaryMode::Periodic => {
            let ni = n as isize;
            for i in -(padl as isize)..(n + padr) as isize {
                out.push(data[i.rem_euclid(ni) as usize]);
            }
        }
        BoundaryMode::Boundary => {
            return Err(WaveletError::InvalidPaddingMode(
                "boundary is not a padding mode".to_string(),
            ));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_mode_names() {
        assert_eq!("zero".parse::<BoundaryMode>().unwrap(), BoundaryMode::Zero);
        assert_eq!("reflect".parse::<BoundaryMode>().unwrap(), BoundaryMode::Reflect);
        assert_eq!(BoundaryMode::default(), BoundaryMode::Reflect);
        match "wrap".parse::<BoundaryMode>() {
            Err(WaveletError::InvalidPaddingMode(name)) => assert_eq!(name, "wrap"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn pad_zero_and_constant() {
        let data = [1.0, 2.0, 3.0, 4.0];
        let z = pad(&data, 2, 3, BoundaryMode::Zero).unwrap();
        assert_eq!(z, vec![0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 0.0, 0.0, 0.0]);
        let c = pad(&data, 2, 3, BoundaryMode::Constant).unwrap();
        assert_eq!(c, vec![1.0, 1.0, 1.0, 2.0, 3.0, 4.0, 4.0, 4.0, 4.0]);
    }

    #[test]
    fn pad_reflect_and_periodic() {
        let data = [1.0, 2.0, 3.0, 4.0];
        let r = pad(&data, 2, 3, BoundaryMode::Reflect).unwrap();
        assert_eq!(r, vec![3.0, 2.0, 1.0, 2.0, 3.0, 4.0, 3.0, 2.0, 1.0]);
        let p = pad(&data, 2, 3, BoundaryMode::Periodic).unwrap();
        assert_eq!(p, vec![3.0, 4.0, 1.0, 2.0, 3.0, 4.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn pad_single_sample_reflect() {
        let r = pad(&[5.0], 2, 2, BoundaryMode::Reflect).unwrap();
        assert_eq!(r, vec![5.0; 5]);
    }

    #[test]
    fn pad_rejects_empty_and_boundary() {
        match pad::<f64>(&[], 1, 1, BoundaryMode::Zero) {
            Err(WaveletError::EmptyInput) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        match pad(&[1.0, 2.0], 1, 1, BoundaryMode::Boundary) {
            Err(WaveletError::InvalidPaddingMode(_)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
