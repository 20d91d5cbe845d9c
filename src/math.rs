//! Shared numerical primitives anchored on `nalgebra`.

use nalgebra::Vector2;

/// Primary scalar type used across the crate.
pub type Scalar = f64;
/// Convenient alias for two-dimensional real vectors (loop-plane coordinates).
pub type R2 = Vector2<Scalar>;
/// Primary complex scalar type used for impedances.
pub type CScalar = num_complex::Complex<Scalar>;

/// Computes the RMS magnitude of a sinusoidal waveform with peak value `peak`.
#[must_use]
pub fn sinusoid_rms(peak: Scalar) -> Scalar {
    peak / Scalar::sqrt(2.0)
}

/// Folds `value` into `[0, period)` with at most one addition or subtraction of `period`.
///
/// Values already inside the range are returned untouched, so repeated folding never
/// drifts. A result that rounds up to `period` itself is reported as `0.0`.
#[must_use]
pub fn wrap_once(value: Scalar, period: Scalar) -> Scalar {
    let folded = if value >= period {
        value - period
    } else if value < 0.0 {
        value + period
    } else {
        return value;
    };
    if folded >= period || folded < 0.0 {
        0.0
    } else {
        folded
    }
}
