//! Decoded audio and its load/reset lifecycle.

use std::fs;
use std::path::Path;

use log::{debug, warn};

use super::decode::decode_wave;
use super::format::{AudioFormat, ContainerKind, SampleFormat};
use crate::error::AudioError;
use crate::num::Float;

/// Per-channel normalized samples plus the header metadata they came from.
///
/// A buffer starts [`AudioFormat::NotLoaded`]. A successful load replaces
/// its whole state; a failed load leaves a previously loaded buffer exactly
/// as it was and marks an empty buffer [`AudioFormat::Error`].
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer<T: Float = f32> {
    pub(super) format: AudioFormat,
    pub(super) sample_format: SampleFormat,
    pub(super) channels: u16,
    pub(super) sample_rate: u32,
    pub(super) byte_rate: u32,
    pub(super) block_alignment: u16,
    pub(super) bit_depth: u16,
    pub(super) filesize: u32,
    pub(super) samples: Vec<Vec<T>>,
}

impl<T: Float> Default for AudioBuffer<T> {
    fn default() -> Self {
        Self {
            format: AudioFormat::NotLoaded,
            sample_format: SampleFormat::default(),
            channels: 0,
            sample_rate: 0,
            byte_rate: 0,
            block_alignment: 0,
            bit_depth: 0,
            filesize: 0,
            samples: Vec::new(),
        }
    }
}

impl<T: Float> AudioBuffer<T> {
    /// Create an empty, unloaded buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a file, choosing the container from its extension.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, AudioError> {
        let mut buffer = Self::new();
        buffer.load_file(path)?;
        Ok(buffer)
    }

    /// Decode an in-memory RIFF/WAVE buffer.
    pub fn from_wave_bytes(bytes: &[u8]) -> Result<Self, AudioError> {
        decode_wave(bytes)
    }

    /// Load a file, choosing the container from its extension.
    ///
    /// Fails with [`AudioError::UnsupportedContainer`] when the extension is
    /// missing or unknown.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), AudioError> {
        let path = path.as_ref();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ContainerKind::from_extension(ext) {
            Some(kind) => self.load_file_as(path, kind),
            None => {
                warn!("{} is not of a supported type", path.display());
                self.commit(Err(AudioError::UnsupportedContainer(ext.to_string())))
            }
        }
    }

    /// Load a file as the given container regardless of its extension.
    pub fn load_file_as<P: AsRef<Path>>(
        &mut self,
        path: P,
        kind: ContainerKind,
    ) -> Result<(), AudioError> {
        let path = path.as_ref();
        debug!("reading {}", path.display());
        match fs::read(path) {
            Ok(bytes) => self.load_bytes(&bytes, kind),
            Err(e) => {
                warn!("cannot read {}: {e}", path.display());
                self.commit(Err(AudioError::Io(e)))
            }
        }
    }

    /// Decode `bytes` as the given container.
    pub fn load_bytes(&mut self, bytes: &[u8], kind: ContainerKind) -> Result<(), AudioError> {
        let decoded = match kind {
            ContainerKind::Wave => decode_wave(bytes),
        };
        self.commit(decoded)
    }

    fn commit(&mut self, decoded: Result<Self, AudioError>) -> Result<(), AudioError> {
        match decoded {
            Ok(buffer) => {
                *self = buffer;
                Ok(())
            }
            Err(e) => {
                if self.format == AudioFormat::NotLoaded {
                    self.format = AudioFormat::Error;
                }
                Err(e)
            }
        }
    }

    /// Return to the empty, unloaded state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// All channels merged frame by frame (`L R L R ...` for stereo).
    ///
    /// Fails with [`AudioError::InconsistentChannelLengths`] rather than
    /// merging channels of unequal length.
    pub fn interleaved(&self) -> Result<Vec<T>, AudioError> {
        let frames = self.equal_frames()?;
        let mut out = Vec::with_capacity(frames * self.samples.len());
        for i in 0..frames {
            out.extend(self.samples.iter().map(|channel| channel[i]));
        }
        Ok(out)
    }

    /// One channel's samples, unmodified.
    pub fn channel(&self, index: usize) -> Result<&[T], AudioError> {
        self.samples
            .get(index)
            .map(Vec::as_slice)
            .ok_or(AudioError::ChannelOutOfRange(index))
    }

    /// Iterate over every channel's samples in channel order.
    pub fn channels_iter(&self) -> impl Iterator<Item = &[T]> {
        self.samples.iter().map(Vec::as_slice)
    }

    /// Average of all channels, one value per frame.
    pub fn mixdown(&self) -> Result<Vec<T>, AudioError> {
        let frames = self.equal_frames()?;
        if self.samples.len() == 1 {
            return Ok(self.samples[0].clone());
        }
        let scale = T::from_f64(1.0 / self.samples.len() as f64);
        Ok((0..frames)
            .map(|i| {
                let sum = self
                    .samples
                    .iter()
                    .fold(T::zero(), |acc, channel| acc + channel[i]);
                sum * scale
            })
            .collect())
    }

    fn equal_frames(&self) -> Result<usize, AudioError> {
        let frames = self.frames();
        if self.samples.iter().any(|channel| channel.len() != frames) {
            warn!("refusing to merge channels of unequal length");
            return Err(AudioError::InconsistentChannelLengths);
        }
        Ok(frames)
    }

    /// Samples per channel.
    pub fn frames(&self) -> usize {
        self.samples.first().map_or(0, Vec::len)
    }

    /// Playback length in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / f64::from(self.sample_rate)
    }

    pub fn is_loaded(&self) -> bool {
        self.format == AudioFormat::Wave
    }

    pub fn is_mono(&self) -> bool {
        self.channels == 1
    }

    pub fn is_stereo(&self) -> bool {
        self.channels == 2
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    pub fn sample_format(&self) -> SampleFormat {
        self.sample_format
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn byte_rate(&self) -> u32 {
        self.byte_rate
    }

    pub fn block_alignment(&self) -> u16 {
        self.block_alignment
    }

    pub fn bit_depth(&self) -> u16 {
        self.bit_depth
    }

    /// Total file size as declared by the RIFF header.
    pub fn filesize(&self) -> u32 {
        self.filesize
    }
}
