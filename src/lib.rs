//! # twofold - WAVE decoding and STFT spectrograms
//!
//! Decode RIFF/WAVE audio into normalized per-channel samples and turn those
//! samples into Short-Time Fourier Transform spectrograms.
//!
//! ## Features
//!
//! - **WAVE decoding**: 8/16/24/32-bit integer PCM and 32-bit IEEE float,
//!   mono through 128 channels, with header consistency checks
//! - **Frame-length selection**: transform lengths drawn from powers of
//!   2, 3, 5 and 7 so the FFT stays fast
//! - **STFT engine**: Hann or rectangular windows, overlap up to 50%,
//!   linear or decibel power
//! - **Multi-channel processing**, parallel with the `parallel` feature
//!
//! ## Cargo Features
//!
//! - `parallel`: transform channels concurrently with Rayon
//!
//! ## Example
//!
//! ```no_run
//! use twofold::{transform_channels, AudioBuffer, TransformConfig};
//!
//! let audio = AudioBuffer::<f64>::open("speech.wav")?;
//! let config = TransformConfig::default().with_overlap(0.5);
//! for (channel, spec) in transform_channels(config, &audio)?.iter().enumerate() {
//!     println!("channel {channel}: {} frames of {}", spec.frame_count(), spec.frame_len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod backend;
pub mod error;
pub mod frame;
pub mod num;
pub mod stft;
pub mod wave;
pub mod window;

pub use error::{AudioError, StftError};
pub use frame::select_frame_length;
pub use num::Float;
pub use stft::{transform_channels, SpectralPoint, Spectrogram, TransformConfig, Transformer};
pub use wave::{decode_wave, AudioBuffer, AudioFormat, SampleFormat};
pub use window::WindowFunction;
