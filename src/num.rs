use ndarray::NdFloat;

// Minimal scalar trait shared by every transform in the crate. `NdFloat`
// brings the arithmetic, ordering, and `ScalarOperand` bounds that the
// ndarray-based kernels need; the constructor below covers the places where
// filter taps and tolerances enter generic code.
pub trait Sample: NdFloat {
    fn from_f64(x: f64) -> Self;
}

impl Sample for f32 {
    fn from_f64(x: f64) -> Self {
        x as f32
    }
}

impl Sample for f64 {
    fn from_f64(x: f64) -> Self {
        x
    }
}
