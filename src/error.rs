//! Error type shared by the convolution, boundary-matrix, and packet APIs.

/// Errors reported by wavelet analysis and synthesis routines.
#[derive(Debug, Clone, PartialEq)]
pub enum WaveletError {
    /// A signal-extension mode string did not match any supported mode.
    InvalidPaddingMode(String),
    /// A wavelet name did not match any built-in filter bank.
    UnknownWavelet(String),
    /// A filter bank failed validation, e.g. mismatched filter lengths or a
    /// bank that is not orthogonal where orthogonality is required.
    InvalidFilterBank(String),
    /// A decomposition depth exceeded what the signal and filter support.
    InvalidLevels { requested: usize, max: usize },
    /// A packet-tree path contained an unknown symbol or was deeper than the
    /// decomposition.
    InvalidPath(String),
    /// A packet tree was queried before any signal was transformed into it.
    TreeNotBuilt,
    /// An input signal had no samples.
    EmptyInput,
    /// Coefficient arrays passed to synthesis had inconsistent shapes.
    MismatchedLengths,
    /// The boundary-matrix transform requires an even signal length.
    OddInputLength { len: usize },
}

impl core::fmt::Display for WaveletError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            WaveletError::InvalidPaddingMode(mode) => {
                write!(f, "unknown padding mode: {mode:?}")
            }
            WaveletError::UnknownWavelet(name) => {
                write!(f, "unknown wavelet: {name:?}")
            }
            WaveletError::InvalidFilterBank(reason) => {
                write!(f, "invalid filter bank: {reason}")
            }
            WaveletError::InvalidLevels { requested, max } => {
                write!(f, "requested {requested} levels but only {max} are possible")
            }
            WaveletError::InvalidPath(path) => {
                write!(f, "invalid packet path: {path:?}")
            }
            WaveletError::TreeNotBuilt => {
                write!(f, "packet tree holds no coefficients; call transform first")
            }
            WaveletError::EmptyInput => write!(f, "input is empty"),
            WaveletError::MismatchedLengths => {
                write!(f, "coefficient arrays have mismatched shapes")
            }
            WaveletError::OddInputLength { len } => {
                write!(f, "boundary transform needs an even length, got {len}")
            }
        }
    }
}

impl std::error::Error for WaveletError {}
