//! RIFF/WAVE chunk walk, header validation and per-bit-depth sample decoding.

use log::{debug, warn};

use super::format::{AudioFormat, SampleFormat};
use super::reader::ByteReader;
use super::AudioBuffer;
use crate::error::AudioError;
use crate::num::Float;

const RIFF_TAG: &[u8; 4] = b"RIFF";
const WAVE_TAG: &[u8; 4] = b"WAVE";
const FMT_TAG: &[u8; 4] = b"fmt ";
const DATA_TAG: &[u8; 4] = b"data";

/// Bytes taken by `RIFF`, the declared size and `WAVE`.
const RIFF_HEADER_LEN: usize = 12;
/// Tag plus length field preceding every chunk payload.
const CHUNK_HEADER_LEN: usize = 8;
/// Mandatory part of the `fmt ` payload.
const FMT_MIN_LEN: usize = 16;
/// `cbSize` value announcing the WAVE_FORMAT_EXTENSIBLE extension.
const EXTENSIBLE_CB_SIZE: u16 = 22;
/// Offset of the SubFormat GUID inside the `fmt ` payload.
const SUBFORMAT_OFFSET: usize = 24;

pub const MIN_CHANNELS: u16 = 1;
pub const MAX_CHANNELS: u16 = 128;

/// Location of a chunk found by [`find_chunk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// Offset of the chunk's first payload byte.
    pub payload: usize,
    /// Declared payload length.
    pub len: u32,
}

/// Fields of the `fmt ` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveHeader {
    pub format_tag: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_alignment: u16,
    pub bit_depth: u16,
    /// Format code from the extensible SubFormat GUID, when present.
    pub sub_format: Option<u16>,
}

impl WaveHeader {
    /// Whether 32-bit samples carry IEEE-754 bit patterns.
    pub fn is_float(&self) -> bool {
        let code = match self.sub_format {
            Some(code) if self.format_tag == SampleFormat::EXTENSIBLE_TAG => code,
            _ => self.format_tag,
        };
        code == SampleFormat::IEEE_FLOAT_TAG
    }

    pub fn bytes_per_sample(&self) -> usize {
        usize::from(self.bit_depth / 8)
    }

    /// Check the header in the order: format, channels, consistency, bit depth.
    pub fn validate(&self) -> Result<SampleFormat, AudioError> {
        let format = SampleFormat::from_tag(self.format_tag)
            .filter(|f| f.is_decodable())
            .ok_or(AudioError::UnsupportedFormat(self.format_tag))?;
        // An extensible header is only as decodable as its SubFormat.
        if let Some(code) = self.sub_format.filter(|_| format == SampleFormat::Extensible) {
            if code != SampleFormat::PCM_TAG && code != SampleFormat::IEEE_FLOAT_TAG {
                return Err(AudioError::UnsupportedFormat(code));
            }
        }

        if !(MIN_CHANNELS..=MAX_CHANNELS).contains(&self.channels) {
            return Err(AudioError::InvalidChannelCount(self.channels));
        }

        let channels = u64::from(self.channels);
        let expected_byte_rate = channels * u64::from(self.sample_rate) * u64::from(self.bit_depth) / 8;
        let expected_block_alignment = u32::from(self.channels) * u32::from(self.bit_depth / 8);
        if u64::from(self.byte_rate) != expected_byte_rate
            || u32::from(self.block_alignment) != expected_block_alignment
        {
            return Err(AudioError::InconsistentHeader {
                byte_rate: self.byte_rate,
                expected_byte_rate,
                block_alignment: self.block_alignment,
                expected_block_alignment,
            });
        }

        if !matches!(self.bit_depth, 8 | 16 | 24 | 32) {
            return Err(AudioError::UnsupportedBitDepth(self.bit_depth));
        }
        Ok(format)
    }
}

/// Raw sample layouts the decoder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SampleKind {
    U8,
    I16,
    I24,
    I32,
    F32,
}

impl SampleKind {
    fn for_header(header: &WaveHeader) -> Option<Self> {
        match header.bit_depth {
            8 => Some(SampleKind::U8),
            16 => Some(SampleKind::I16),
            24 => Some(SampleKind::I24),
            32 if header.is_float() => Some(SampleKind::F32),
            32 => Some(SampleKind::I32),
            _ => None,
        }
    }
}

/// Decode a complete RIFF/WAVE buffer into per-channel samples in `[-1, 1]`.
///
/// Every structural and header check runs before any sample is decoded and
/// no partially decoded buffer is ever returned.
pub fn decode_wave<T: Float>(bytes: &[u8]) -> Result<AudioBuffer<T>, AudioError> {
    decode(bytes).map_err(|e| {
        warn!("rejecting WAVE buffer of {} bytes: {e}", bytes.len());
        e
    })
}

fn decode<T: Float>(bytes: &[u8]) -> Result<AudioBuffer<T>, AudioError> {
    let riff_size = check_riff_header(bytes)?;

    let fmt = find_chunk(bytes, FMT_TAG)?;
    let data = find_chunk(bytes, DATA_TAG)?;
    debug!(
        "found fmt chunk at byte {}, data chunk at byte {}",
        fmt.payload - CHUNK_HEADER_LEN,
        data.payload - CHUNK_HEADER_LEN
    );

    let header = parse_fmt(bytes, fmt)?;
    debug!(
        "format tag {:#06x}, {} channel(s), {} Hz, {} B/s, {} B/block, {} bit",
        header.format_tag,
        header.channels,
        header.sample_rate,
        header.byte_rate,
        header.block_alignment,
        header.bit_depth
    );
    let sample_format = header.validate()?;
    let samples = decode_samples(bytes, &header, data)?;

    Ok(AudioBuffer {
        format: AudioFormat::Wave,
        sample_format,
        channels: header.channels,
        sample_rate: header.sample_rate,
        byte_rate: header.byte_rate,
        block_alignment: header.block_alignment,
        bit_depth: header.bit_depth,
        filesize: riff_size.saturating_add(CHUNK_HEADER_LEN as u32),
        samples,
    })
}

/// Verify the `RIFF` and `WAVE` tags and return the declared RIFF size.
fn check_riff_header(bytes: &[u8]) -> Result<u32, AudioError> {
    let mut r = ByteReader::new(bytes);
    let riff = r.read_tag().map_err(|_| AudioError::MalformedContainer)?;
    let size = r.read_u32_le().map_err(|_| AudioError::MalformedContainer)?;
    let wave = r.read_tag().map_err(|_| AudioError::MalformedContainer)?;
    if &riff != RIFF_TAG || &wave != WAVE_TAG {
        return Err(AudioError::MalformedContainer);
    }
    Ok(size)
}

/// Walk chunks from the end of the RIFF header until `tag` is found.
///
/// Reaching the exact end of the buffer means the chunk is missing; a partial
/// chunk header, or a declared length that jumps past the end, is a truncation.
pub fn find_chunk(bytes: &[u8], tag: &[u8; 4]) -> Result<Chunk, AudioError> {
    let mut r = ByteReader::at(bytes, RIFF_HEADER_LEN);
    loop {
        if r.is_at_end() {
            return Err(AudioError::MissingChunk(tag_name(tag)));
        }
        let id = r.read_tag().map_err(|_| AudioError::TruncatedBuffer)?;
        let len = r.read_u32_le().map_err(|_| AudioError::TruncatedBuffer)?;
        if &id == tag {
            return Ok(Chunk {
                payload: r.position(),
                len,
            });
        }
        r.skip(len as usize).map_err(|_| AudioError::TruncatedBuffer)?;
    }
}

fn tag_name(tag: &[u8; 4]) -> &'static str {
    match tag {
        FMT_TAG => "fmt ",
        DATA_TAG => "data",
        _ => "unknown",
    }
}

/// Read the `fmt ` fields. The payload must hold at least the 16 mandatory bytes.
pub fn parse_fmt(bytes: &[u8], chunk: Chunk) -> Result<WaveHeader, AudioError> {
    if (chunk.len as usize) < FMT_MIN_LEN {
        return Err(AudioError::TruncatedBuffer);
    }
    let mut r = ByteReader::at(bytes, chunk.payload);
    let truncated = |_| AudioError::TruncatedBuffer;
    let format_tag = r.read_u16_le().map_err(truncated)?;
    let channels = r.read_u16_le().map_err(truncated)?;
    let sample_rate = r.read_u32_le().map_err(truncated)?;
    let byte_rate = r.read_u32_le().map_err(truncated)?;
    let block_alignment = r.read_u16_le().map_err(truncated)?;
    let bit_depth = r.read_u16_le().map_err(truncated)?;

    let sub_format = if format_tag == SampleFormat::EXTENSIBLE_TAG {
        read_sub_format(bytes, chunk)
    } else {
        None
    };

    Ok(WaveHeader {
        format_tag,
        channels,
        sample_rate,
        byte_rate,
        block_alignment,
        bit_depth,
        sub_format,
    })
}

/// First two bytes of the SubFormat GUID, if the extension is fully present.
fn read_sub_format(bytes: &[u8], chunk: Chunk) -> Option<u16> {
    if (chunk.len as usize) < SUBFORMAT_OFFSET + 2 {
        return None;
    }
    let mut r = ByteReader::at(bytes, chunk.payload + FMT_MIN_LEN);
    let cb_size = r.read_u16_le().ok()?;
    if cb_size < EXTENSIBLE_CB_SIZE {
        return None;
    }
    r.seek(chunk.payload + SUBFORMAT_OFFSET);
    r.read_u16_le().ok()
}

fn decode_samples<T: Float>(
    bytes: &[u8],
    header: &WaveHeader,
    data: Chunk,
) -> Result<Vec<Vec<T>>, AudioError> {
    let kind =
        SampleKind::for_header(header).ok_or(AudioError::UnsupportedBitDepth(header.bit_depth))?;
    let channels = usize::from(header.channels);
    let frame_bytes = channels * header.bytes_per_sample();
    let frames = data.len as usize / frame_bytes;

    let needed = frames
        .checked_mul(frame_bytes)
        .and_then(|n| n.checked_add(data.payload));
    if needed.map_or(true, |end| end > bytes.len()) {
        return Err(AudioError::TruncatedSamples);
    }
    debug!("decoding {frames} frame(s) of {channels} channel(s)");

    let mut samples: Vec<Vec<T>> = (0..channels).map(|_| Vec::with_capacity(frames)).collect();
    let mut r = ByteReader::at(bytes, data.payload);
    for _ in 0..frames {
        for channel in samples.iter_mut() {
            let value = read_sample(&mut r, kind).map_err(|_| AudioError::TruncatedSamples)?;
            channel.push(value);
        }
    }
    Ok(samples)
}

#[inline]
fn read_sample<T: Float>(
    r: &mut ByteReader<'_>,
    kind: SampleKind,
) -> Result<T, super::reader::OutOfBounds> {
    Ok(match kind {
        SampleKind::U8 => eight_bit(r.read_u8()?),
        SampleKind::I16 => sixteen_bit(r.read_i16_le()?),
        SampleKind::I24 => twenty_four_bit(r.read_i24_le()?),
        SampleKind::I32 => thirty_two_bit(r.read_i32_le()?),
        SampleKind::F32 => T::from_f32(r.read_f32_le()?),
    })
}

/// Unsigned 8-bit PCM centred on the signed 8-bit maximum.
#[inline]
pub fn eight_bit<T: Float>(sample: u8) -> T {
    let max = f64::from(i8::MAX);
    T::from_f64((f64::from(sample) - max) / max).clamp_unit()
}

#[inline]
pub fn sixteen_bit<T: Float>(sample: i16) -> T {
    T::from_f64(f64::from(sample) / f64::from(i16::MAX)).clamp_unit()
}

/// Sign-extended 24-bit sample.
#[inline]
pub fn twenty_four_bit<T: Float>(sample: i32) -> T {
    const I24_MAX: f64 = 8_388_607.0;
    T::from_f64(f64::from(sample) / I24_MAX).clamp_unit()
}

#[inline]
pub fn thirty_two_bit<T: Float>(sample: i32) -> T {
    T::from_f64(f64::from(sample) / f64::from(i32::MAX)).clamp_unit()
}
