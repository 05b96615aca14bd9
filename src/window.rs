//! Window functions applied to each frame before the transform.

use core::f64::consts::PI;
use core::fmt;
use core::str::FromStr;

use log::error;

use crate::num::Float;

/// Per-sample weighting applied to a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowFunction {
    /// Identity weighting.
    Rectangular,
    /// Raised cosine, zero at both frame edges.
    #[default]
    Hann,
}

impl WindowFunction {
    /// Weight `value`, the sample at `index` of a frame of `length` samples.
    ///
    /// `index` must lie in `0..=length` and, for Hann, `length` must be
    /// non-zero. Out-of-range arguments indicate a framing bug: the call logs
    /// an error and returns `0.0`.
    pub fn apply<T: Float>(self, value: T, index: usize, length: usize) -> T {
        if index > length || (length == 0 && self != WindowFunction::Rectangular) {
            error!("invalid window function args: index {index}, length {length}");
            return T::zero();
        }
        match self {
            WindowFunction::Rectangular => value,
            WindowFunction::Hann => value * T::from_f64(hann_weight(index, length)),
        }
    }

    /// Weights for every index of a `len`-sample frame.
    pub fn coefficients(self, len: usize) -> Vec<f64> {
        (0..len).map(|i| self.apply(1.0f64, i, len)).collect()
    }
}

#[inline]
fn hann_weight(index: usize, length: usize) -> f64 {
    0.5 * (1.0 - (2.0 * PI * index as f64 / length as f64).cos())
}

impl fmt::Display for WindowFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowFunction::Rectangular => f.write_str("rectangular"),
            WindowFunction::Hann => f.write_str("hann"),
        }
    }
}

/// Error returned when parsing an unknown window name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownWindow(pub String);

impl fmt::Display for UnknownWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown window `{}` (expected rect or hann)", self.0)
    }
}

impl std::error::Error for UnknownWindow {}

impl FromStr for WindowFunction {
    type Err = UnknownWindow;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rect" | "rectangular" | "none" => Ok(WindowFunction::Rectangular),
            "hann" | "hanning" => Ok(WindowFunction::Hann),
            _ => Err(UnknownWindow(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hann_peaks_at_centre() {
        let w = WindowFunction::Hann.coefficients(8);
        assert_eq!(w.len(), 8);
        assert!(w[0].abs() < 1e-12);
        assert!((w[4] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn hann_is_symmetric() {
        let n = 16;
        let w = WindowFunction::Hann.coefficients(n);
        for i in 1..n {
            assert!((w[i] - w[n - i]).abs() < 1e-12);
        }
    }

    #[test]
    fn rectangular_coefficients_are_ones() {
        assert_eq!(WindowFunction::Rectangular.coefficients(3), vec![1.0; 3]);
        assert!(WindowFunction::Rectangular.coefficients(0).is_empty());
    }

    #[test]
    fn precomputed_weights_match_apply() {
        let n = 12;
        let w = WindowFunction::Hann.coefficients(n);
        for (i, c) in w.iter().enumerate() {
            let v = 0.37f64;
            assert_eq!(v * c, WindowFunction::Hann.apply(v, i, n));
        }
    }

    #[test]
    fn parses_names() {
        assert_eq!("HANN".parse(), Ok(WindowFunction::Hann));
        assert_eq!("rect".parse(), Ok(WindowFunction::Rectangular));
        assert!("kaiser".parse::<WindowFunction>().is_err());
        assert_eq!(WindowFunction::Rectangular.to_string(), "rectangular");
    }
}
