//! RIFF/WAVE container decoding.
//!
//! [`decode_wave`] walks the chunk list of an in-memory buffer, validates the
//! `fmt ` header and decodes the `data` chunk into one normalized sample
//! sequence per channel. [`AudioBuffer`] wraps the result together with the
//! header metadata and offers path- and extension-based loading.
//!
//! ```no_run
//! use twofold::wave::AudioBuffer;
//!
//! let audio = AudioBuffer::<f64>::open("speech.wav").unwrap();
//! println!("{} Hz, {:.2} s", audio.sample_rate(), audio.duration_secs());
//! let left = audio.channel(0).unwrap();
//! # let _ = left;
//! ```

mod buffer;
pub mod decode;
mod format;
pub mod reader;

pub use buffer::AudioBuffer;
pub use decode::{decode_wave, WaveHeader, MAX_CHANNELS, MIN_CHANNELS};
pub use format::{AudioFormat, ContainerKind, SampleFormat};
