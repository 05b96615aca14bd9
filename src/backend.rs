//! FFT backend seam.
//!
//! The STFT engine only needs a forward real-to-complex transform of a fixed
//! length. [`RealFftBackend`] hands out such plans from `realfft`; plans are
//! cached by length inside the planner, so engines sharing a backend share
//! plans of the same size.

use std::fmt;
use std::sync::Arc;

use log::debug;
use realfft::num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};

use crate::error::StftError;

/// A forward real-to-complex plan for one transform length.
///
/// Cloning shares the underlying plan.
#[derive(Clone)]
pub struct ForwardPlan {
    len: usize,
    fft: Arc<dyn RealToComplex<f64>>,
}

impl ForwardPlan {
    /// Transform length N.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of complex bins produced: `N / 2 + 1`.
    pub fn bins(&self) -> usize {
        self.len / 2 + 1
    }

    pub fn make_input_vec(&self) -> Vec<f64> {
        self.fft.make_input_vec()
    }

    pub fn make_output_vec(&self) -> Vec<Complex<f64>> {
        self.fft.make_output_vec()
    }

    pub fn make_scratch_vec(&self) -> Vec<Complex<f64>> {
        self.fft.make_scratch_vec()
    }

    /// Run the transform. `input` is used as scratch space and left unspecified.
    pub fn execute(
        &self,
        input: &mut [f64],
        output: &mut [Complex<f64>],
        scratch: &mut [Complex<f64>],
    ) -> Result<(), StftError> {
        self.fft
            .process_with_scratch(input, output, scratch)
            .map_err(StftError::from)
    }
}

impl fmt::Debug for ForwardPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForwardPlan").field("len", &self.len).finish()
    }
}

/// Plan factory backed by `realfft`.
pub struct RealFftBackend {
    planner: RealFftPlanner<f64>,
}

impl Default for RealFftBackend {
    fn default() -> Self {
        Self {
            planner: RealFftPlanner::new(),
        }
    }
}

impl RealFftBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan a forward transform of `len` real samples.
    pub fn plan(&mut self, len: usize) -> ForwardPlan {
        debug!("planning real-to-complex transform of length {len}");
        ForwardPlan {
            len,
            fft: self.planner.plan_fft_forward(len),
        }
    }
}

impl fmt::Debug for RealFftBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RealFftBackend").finish_non_exhaustive()
    }
}
