//! Header-level enumerations: container kind, lifecycle marker and sample format.

use core::fmt;

/// Containers the loader can dispatch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Wave,
}

impl ContainerKind {
    /// Map a file extension (without the dot) to a container, ignoring case.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "wav" | "wave" => Some(ContainerKind::Wave),
            _ => None,
        }
    }
}

/// Lifecycle of an [`AudioBuffer`](super::AudioBuffer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioFormat {
    /// Nothing decoded yet, or reset.
    #[default]
    NotLoaded,
    /// The first load attempt on this buffer failed.
    Error,
    /// Holds decoded RIFF/WAVE audio.
    Wave,
}

/// Sample encoding as declared by the `fmt ` chunk format tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleFormat {
    #[default]
    Pcm,
    IeeeFloat,
    ALaw,
    MuLaw,
    Extensible,
}

impl SampleFormat {
    pub const PCM_TAG: u16 = 0x0001;
    pub const IEEE_FLOAT_TAG: u16 = 0x0003;
    pub const ALAW_TAG: u16 = 0x0006;
    pub const MULAW_TAG: u16 = 0x0007;
    pub const EXTENSIBLE_TAG: u16 = 0xFFFE;

    pub fn from_tag(tag: u16) -> Option<Self> {
        match tag {
            Self::PCM_TAG => Some(SampleFormat::Pcm),
            Self::IEEE_FLOAT_TAG => Some(SampleFormat::IeeeFloat),
            Self::ALAW_TAG => Some(SampleFormat::ALaw),
            Self::MULAW_TAG => Some(SampleFormat::MuLaw),
            Self::EXTENSIBLE_TAG => Some(SampleFormat::Extensible),
            _ => None,
        }
    }

    pub fn tag(self) -> u16 {
        match self {
            SampleFormat::Pcm => Self::PCM_TAG,
            SampleFormat::IeeeFloat => Self::IEEE_FLOAT_TAG,
            SampleFormat::ALaw => Self::ALAW_TAG,
            SampleFormat::MuLaw => Self::MULAW_TAG,
            SampleFormat::Extensible => Self::EXTENSIBLE_TAG,
        }
    }

    /// Formats the decoder has sample bodies for.
    pub fn is_decodable(self) -> bool {
        matches!(
            self,
            SampleFormat::Pcm | SampleFormat::IeeeFloat | SampleFormat::Extensible
        )
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SampleFormat::Pcm => "PCM",
            SampleFormat::IeeeFloat => "IEEE float",
            SampleFormat::ALaw => "A-law",
            SampleFormat::MuLaw => "mu-law",
            SampleFormat::Extensible => "extensible",
        };
        f.write_str(name)
    }
}
