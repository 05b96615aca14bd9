//! Short-Time Fourier Transform (STFT) spectrogram engine.
//!
//! A [`Transformer`] picks its frame length once from the configured target
//! interval, acquires a forward FFT plan of that length and then turns any
//! number of signals into ordered `(frequency, power)` points:
//!
//! ```
//! use twofold::stft::{TransformConfig, Transformer};
//! use twofold::window::WindowFunction;
//!
//! let config = TransformConfig::default()
//!     .with_target_interval(0.01)
//!     .with_window(WindowFunction::Rectangular);
//! let mut t = Transformer::new(config, 800).unwrap();
//! assert_eq!(t.frame_len(), 8);
//! let spec = t.transform(&[1.0; 8]).unwrap();
//! assert_eq!(spec.frame_count(), 1);
//! assert_eq!(spec.points()[0].power, 64.0);
//! ```

use log::{debug, trace};
use realfft::num_complex::Complex;

use crate::backend::{ForwardPlan, RealFftBackend};
use crate::error::StftError;
use crate::frame::select_frame_length;
use crate::num::Float;
use crate::wave::AudioBuffer;
use crate::window::WindowFunction;

/// Largest overlap fraction the engine will use.
pub const MAX_OVERLAP: f64 = 0.5;

/// Engine configuration.
///
/// `overlap` may hold any value; it is clamped into `[0, 0.5]` whenever a
/// transform runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformConfig {
    /// Desired frame duration in seconds.
    pub target_interval: f64,
    /// Fraction of each frame shared with the next one.
    pub overlap: f64,
    pub window: WindowFunction,
    /// Report `10 * log10(power)` instead of linear power.
    pub db_scale: bool,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            target_interval: 0.3,
            overlap: 0.0,
            window: WindowFunction::Hann,
            db_scale: false,
        }
    }
}

impl TransformConfig {
    pub fn with_target_interval(mut self, seconds: f64) -> Self {
        self.target_interval = seconds;
        self
    }

    pub fn with_overlap(mut self, overlap: f64) -> Self {
        self.overlap = overlap;
        self
    }

    pub fn with_window(mut self, window: WindowFunction) -> Self {
        self.window = window;
        self
    }

    pub fn with_db_scale(mut self, db_scale: bool) -> Self {
        self.db_scale = db_scale;
        self
    }

    /// Overlap clamped into `[0, MAX_OVERLAP]`. NaN counts as no overlap.
    pub fn effective_overlap(&self) -> f64 {
        if self.overlap.is_nan() {
            0.0
        } else {
            self.overlap.clamp(0.0, MAX_OVERLAP)
        }
    }
}

/// One spectrogram sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralPoint {
    /// Bin centre frequency in Hz.
    pub frequency: f64,
    /// `re² + im²`, or its decibel value when `db_scale` is set.
    /// Zero power in decibels is `f64::NEG_INFINITY`.
    pub power: f64,
}

/// Transform output: `frame_len` points per frame, frames in temporal order.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    frame_len: usize,
    points: Vec<SpectralPoint>,
}

impl Spectrogram {
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    pub fn frame_count(&self) -> usize {
        self.points.len() / self.frame_len
    }

    pub fn points(&self) -> &[SpectralPoint] {
        &self.points
    }

    pub fn into_points(self) -> Vec<SpectralPoint> {
        self.points
    }

    /// Iterate frames, each `frame_len` points in ascending bin order.
    pub fn frames(&self) -> impl Iterator<Item = &[SpectralPoint]> {
        self.points.chunks_exact(self.frame_len)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// STFT engine with a frame length and FFT plan fixed at construction.
///
/// Work buffers are owned by the engine, so `transform` takes `&mut self`;
/// threads that transform concurrently each need their own engine. Clones
/// share the plan but not the buffers.
#[derive(Debug, Clone)]
pub struct Transformer {
    config: TransformConfig,
    sampling_rate: u32,
    frame_len: usize,
    plan: ForwardPlan,
    window: Vec<f64>,
    input: Vec<f64>,
    spectrum: Vec<Complex<f64>>,
    scratch: Vec<Complex<f64>>,
}

impl Transformer {
    /// Build an engine with a private FFT planner.
    pub fn new(config: TransformConfig, sampling_rate: u32) -> Result<Self, StftError> {
        Self::with_backend(config, sampling_rate, &mut RealFftBackend::new())
    }

    /// Build an engine whose plan comes from a shared backend.
    pub fn with_backend(
        config: TransformConfig,
        sampling_rate: u32,
        backend: &mut RealFftBackend,
    ) -> Result<Self, StftError> {
        if sampling_rate == 0 {
            return Err(StftError::InvalidSamplingRate);
        }
        let frame_len = select_frame_length(config.target_interval, sampling_rate)?;
        let plan = backend.plan(frame_len);
        Ok(Self {
            config,
            sampling_rate,
            frame_len,
            window: config.window.coefficients(frame_len),
            input: plan.make_input_vec(),
            spectrum: plan.make_output_vec(),
            scratch: plan.make_scratch_vec(),
            plan,
        })
    }

    /// Frame length N.
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    pub fn sampling_rate(&self) -> u32 {
        self.sampling_rate
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Samples between consecutive frame starts: `N - floor(overlap * N)`.
    pub fn step(&self) -> usize {
        let overlap = (self.config.effective_overlap() * self.frame_len as f64).floor() as usize;
        self.frame_len - overlap
    }

    /// Frames produced for a signal of `signal_len` samples.
    pub fn frame_count(&self, signal_len: usize) -> usize {
        signal_len.div_ceil(self.step())
    }

    /// Centre frequency of bin `k` in Hz.
    pub fn bin_frequency(&self, k: usize) -> f64 {
        f64::from(self.sampling_rate) / self.frame_len as f64 * k as f64
    }

    /// Transform `signal` into a new [`Spectrogram`].
    pub fn transform(&mut self, signal: &[f64]) -> Result<Spectrogram, StftError> {
        let mut points = Vec::new();
        self.transform_into(signal, &mut points)?;
        Ok(Spectrogram {
            frame_len: self.frame_len,
            points,
        })
    }

    /// Clear `out` and fill it with the spectrogram of `signal`.
    ///
    /// The signal is zero-padded as a whole to a multiple of N. Frames start
    /// at `0, step, 2 * step, ...` while the start lies inside the original
    /// signal; samples past the padded end read as zero.
    pub fn transform_into(
        &mut self,
        signal: &[f64],
        out: &mut Vec<SpectralPoint>,
    ) -> Result<(), StftError> {
        out.clear();
        let n = self.frame_len;
        let step = self.step();
        let frames = self.frame_count(signal.len());
        out.reserve(frames * n);

        for start in (0..signal.len()).step_by(step) {
            // Zeros past the signal end stand in for the whole-signal padding.
            for (j, slot) in self.input.iter_mut().enumerate() {
                let sample = signal.get(start + j).copied().unwrap_or(0.0);
                *slot = sample * self.window[j];
            }
            self.plan
                .execute(&mut self.input, &mut self.spectrum, &mut self.scratch)?;
            self.emit_frame(out);
        }
        trace!("transformed {} samples into {frames} frame(s) of {n}", signal.len());
        Ok(())
    }

    /// Append N points for the current spectrum. Bins above N/2 mirror
    /// their conjugate partner, which has the same power.
    fn emit_frame(&self, out: &mut Vec<SpectralPoint>) {
        let n = self.frame_len;
        for k in 0..n {
            let c = if k < self.spectrum.len() {
                self.spectrum[k]
            } else {
                self.spectrum[n - k]
            };
            let mut power = c.re * c.re + c.im * c.im;
            if self.config.db_scale {
                power = 10.0 * power.log10();
            }
            out.push(SpectralPoint {
                frequency: self.bin_frequency(k),
                power,
            });
        }
    }
}

/// One spectrogram per channel of `audio`, in channel order.
///
/// Every channel is transformed by its own copy of one engine; copies share
/// the FFT plan. With the `parallel` feature the channels run on rayon's
/// thread pool. Configuration errors surface even for a buffer without
/// channels.
pub fn transform_channels<T: Float>(
    config: TransformConfig,
    audio: &AudioBuffer<T>,
) -> Result<Vec<Spectrogram>, StftError> {
    let engine = Transformer::new(config, audio.sample_rate())?;
    let signals: Vec<Vec<f64>> = audio
        .channels_iter()
        .map(|channel| channel.iter().map(|&s| s.to_f64()).collect())
        .collect();
    debug!(
        "transforming {} channel(s) with frame length {}",
        signals.len(),
        engine.frame_len()
    );

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        signals
            .par_iter()
            .map_init(|| engine.clone(), |engine, signal| engine.transform(signal))
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        let mut engine = engine;
        signals.iter().map(|signal| engine.transform(signal)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::PI;

    fn rect(interval: f64) -> TransformConfig {
        TransformConfig::default()
            .with_target_interval(interval)
            .with_window(WindowFunction::Rectangular)
    }

    #[test]
    fn overlap_is_clamped() {
        let c = TransformConfig::default();
        assert_eq!(c.with_overlap(0.9).effective_overlap(), 0.5);
        assert_eq!(c.with_overlap(-3.0).effective_overlap(), 0.0);
        assert_eq!(c.with_overlap(f64::NAN).effective_overlap(), 0.0);
        assert_eq!(c.with_overlap(0.25).effective_overlap(), 0.25);
    }

    #[test]
    fn step_uses_floored_overlap() {
        let t = Transformer::new(rect(1.0).with_overlap(0.3), 8).unwrap();
        assert_eq!(t.frame_len(), 8);
        // floor(0.3 * 8) = 2
        assert_eq!(t.step(), 6);
        let t = Transformer::new(rect(1.0).with_overlap(0.75), 8).unwrap();
        assert_eq!(t.step(), 4);
    }

    #[test]
    fn rejects_zero_sampling_rate() {
        assert!(matches!(
            Transformer::new(TransformConfig::default(), 0),
            Err(StftError::InvalidSamplingRate)
        ));
    }

    #[test]
    fn rejects_invalid_interval() {
        assert!(matches!(
            Transformer::new(rect(0.0), 8000),
            Err(StftError::InvalidInterval(_))
        ));
    }

    #[test]
    fn empty_signal_yields_nothing() {
        let mut t = Transformer::new(rect(1.0), 8).unwrap();
        let spec = t.transform(&[]).unwrap();
        assert!(spec.is_empty());
        assert_eq!(spec.frame_count(), 0);
    }

    #[test]
    fn sinusoid_peaks_at_its_bin() {
        let n = 16;
        let mut t = Transformer::new(rect(1.0), n as u32).unwrap();
        assert_eq!(t.frame_len(), n);
        let signal: Vec<f64> = (0..n)
            .map(|i| (2.0 * PI * 3.0 * i as f64 / n as f64).cos())
            .collect();
        let spec = t.transform(&signal).unwrap();
        let frame = spec.frames().next().unwrap();
        let peak = frame
            .iter()
            .take(n / 2 + 1)
            .enumerate()
            .max_by(|a, b| a.1.power.partial_cmp(&b.1.power).unwrap())
            .unwrap()
            .0;
        assert_eq!(peak, 3);
        assert_eq!(frame[3].frequency, 3.0);
        // Mirror bin carries the same power.
        assert!((frame[n - 3].power - frame[3].power).abs() < 1e-9);
    }

    #[test]
    fn db_scale_of_silence_is_negative_infinity() {
        let mut t = Transformer::new(rect(1.0).with_db_scale(true), 8).unwrap();
        let spec = t.transform(&[0.0; 8]).unwrap();
        assert!(spec
            .points()
            .iter()
            .all(|p| p.power == f64::NEG_INFINITY));
    }

    #[test]
    fn engine_is_reusable_across_signals() {
        let mut t = Transformer::new(rect(1.0), 4).unwrap();
        let mut out = Vec::new();
        t.transform_into(&[1.0; 4], &mut out).unwrap();
        assert_eq!(out.len(), 4);
        t.transform_into(&[1.0; 9], &mut out).unwrap();
        assert_eq!(out.len(), 12);
        assert_eq!(out[0].power, 16.0);
        // Last frame holds one sample followed by padding.
        assert_eq!(out[8].power, 1.0);
    }
}
