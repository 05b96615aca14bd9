//! Error types for container decoding and spectral analysis.

use std::{error::Error, fmt, io};

/// Errors raised while loading or decoding a RIFF/WAVE container.
#[derive(Debug)]
pub enum AudioError {
    /// The file extension does not map to a supported container.
    UnsupportedContainer(String),
    /// The file is missing, unreadable or was only partially read.
    Io(io::Error),
    /// The buffer does not start with the `RIFF` / `WAVE` tags.
    MalformedContainer,
    /// A required chunk (`fmt ` or `data`) is absent.
    MissingChunk(&'static str),
    /// A chunk header or declared chunk length runs past the buffer end.
    TruncatedBuffer,
    /// The format tag is not PCM, IEEE float or extensible.
    UnsupportedFormat(u16),
    /// Channel count outside `1..=128`.
    InvalidChannelCount(u16),
    /// Byte rate or block alignment disagree with the other header fields.
    InconsistentHeader {
        byte_rate: u32,
        expected_byte_rate: u64,
        block_alignment: u16,
        expected_block_alignment: u32,
    },
    /// Bit depth other than 8, 16, 24 or 32.
    UnsupportedBitDepth(u16),
    /// The data chunk holds fewer bytes than its sample count requires.
    TruncatedSamples,
    /// Channel sequences differ in length and cannot be interleaved.
    InconsistentChannelLengths,
    /// A channel index past the decoded channel count was requested.
    ChannelOutOfRange(usize),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::UnsupportedContainer(ext) => {
                write!(f, "unsupported container `{ext}` (supported: wav)")
            }
            AudioError::Io(e) => write!(f, "i/o error: {e}"),
            AudioError::MalformedContainer => write!(f, "missing RIFF/WAVE tags"),
            AudioError::MissingChunk(tag) => write!(f, "missing `{tag}` chunk"),
            AudioError::TruncatedBuffer => write!(f, "chunk runs past the end of the buffer"),
            AudioError::UnsupportedFormat(tag) => {
                write!(f, "unsupported sample format tag {tag:#06x}")
            }
            AudioError::InvalidChannelCount(n) => {
                write!(f, "invalid channel count {n} (expected 1..=128)")
            }
            AudioError::InconsistentHeader {
                byte_rate,
                expected_byte_rate,
                block_alignment,
                expected_block_alignment,
            } => write!(
                f,
                "inconsistent header: byte rate {byte_rate} (expected {expected_byte_rate}), \
                 block alignment {block_alignment} (expected {expected_block_alignment})"
            ),
            AudioError::UnsupportedBitDepth(bits) => write!(f, "unsupported bit depth {bits}"),
            AudioError::TruncatedSamples => {
                write!(f, "data chunk declares more samples than the buffer holds")
            }
            AudioError::InconsistentChannelLengths => {
                write!(f, "channel sample sequences differ in length")
            }
            AudioError::ChannelOutOfRange(c) => write!(f, "channel {c} out of range"),
        }
    }
}

impl Error for AudioError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AudioError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for AudioError {
    fn from(e: io::Error) -> Self {
        AudioError::Io(e)
    }
}

/// Errors raised while configuring or running the STFT engine.
#[derive(Debug)]
pub enum StftError {
    /// The target frame interval was not a positive finite number of seconds.
    InvalidInterval(f64),
    /// The sampling rate was zero.
    InvalidSamplingRate,
    /// The FFT backend rejected a call.
    Backend(realfft::FftError),
}

impl fmt::Display for StftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StftError::InvalidInterval(s) => {
                write!(f, "target interval must be greater than zero, got {s}")
            }
            StftError::InvalidSamplingRate => write!(f, "sampling rate must be greater than zero"),
            StftError::Backend(e) => write!(f, "fft backend error: {e}"),
        }
    }
}

impl Error for StftError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StftError::Backend(e) => Some(e),
            _ => None,
        }
    }
}

impl From<realfft::FftError> for StftError {
    fn from(e: realfft::FftError) -> Self {
        StftError::Backend(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_chain_their_source() {
        let err = AudioError::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn header_errors_name_both_values() {
        let err = AudioError::InconsistentHeader {
            byte_rate: 1,
            expected_byte_rate: 2,
            block_alignment: 3,
            expected_block_alignment: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains("byte rate 1 (expected 2)"));
        assert!(msg.contains("block alignment 3 (expected 4)"));
        assert!(err.source().is_none());
    }

    #[test]
    fn format_tag_is_shown_in_hex() {
        assert_eq!(
            AudioError::UnsupportedFormat(0x0006).to_string(),
            "unsupported sample format tag 0x0006"
        );
    }
}
