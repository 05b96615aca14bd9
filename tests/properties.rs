// Test intent: property checks over arbitrary sample data for the decoder and
// the STFT output layout.

use proptest::prelude::*;
use twofold::wave::AudioBuffer;
use twofold::{TransformConfig, Transformer};

fn wave(format_tag: u16, channels: u16, bits: u16, data: &[u8]) -> Vec<u8> {
    let block = channels * (bits / 8);
    let mut out = b"RIFF".to_vec();
    out.extend_from_slice(&(4 + 24 + 8 + data.len() as u32).to_le_bytes());
    out.extend_from_slice(b"WAVEfmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&format_tag.to_le_bytes());
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&8000u32.to_le_bytes());
    out.extend_from_slice(&(8000 * u32::from(block)).to_le_bytes());
    out.extend_from_slice(&block.to_le_bytes());
    out.extend_from_slice(&bits.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(data);
    out
}

proptest! {
    /// Integer PCM always decodes into `[-1, 1]` with one sample per whole frame.
    #[test]
    fn pcm16_stays_in_range(samples in prop::collection::vec(any::<i16>(), 0..256), channels in 1u16..4) {
        let data: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        let audio = AudioBuffer::<f64>::from_wave_bytes(&wave(1, channels, 16, &data)).unwrap();
        let frames = samples.len() / usize::from(channels);
        prop_assert_eq!(audio.channels_iter().count(), usize::from(channels));
        for channel in audio.channels_iter() {
            prop_assert_eq!(channel.len(), frames);
            prop_assert!(channel.iter().all(|v| (-1.0..=1.0).contains(v)));
        }
    }

    /// 8-bit PCM maps every byte into `[-1, 1]`.
    #[test]
    fn pcm8_stays_in_range(data in prop::collection::vec(any::<u8>(), 0..256)) {
        let audio = AudioBuffer::<f32>::from_wave_bytes(&wave(1, 1, 8, &data)).unwrap();
        prop_assert_eq!(audio.frames(), data.len());
        prop_assert!(audio.channel(0).unwrap().iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    /// Finite float samples keep their exact bits.
    #[test]
    fn float_is_bit_exact(values in prop::collection::vec(-4.0f32..4.0, 1..128)) {
        let data: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        let audio = AudioBuffer::<f32>::from_wave_bytes(&wave(3, 1, 32, &data)).unwrap();
        let decoded = audio.channel(0).unwrap();
        prop_assert_eq!(decoded.len(), values.len());
        for (d, v) in decoded.iter().zip(&values) {
            prop_assert_eq!(d.to_bits(), v.to_bits());
        }
    }

    /// Arbitrary bytes never panic the decoder.
    #[test]
    fn arbitrary_bytes_do_not_panic(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = AudioBuffer::<f64>::from_wave_bytes(&bytes);
    }

    /// Every transform emits whole frames and one frame per step started.
    #[test]
    fn stft_emits_whole_frames(len in 0usize..200, overlap in 0.0f64..0.5) {
        let mut t = Transformer::new(
            TransformConfig::default().with_target_interval(0.01).with_overlap(overlap),
            800,
        ).unwrap();
        let signal = vec![0.1; len];
        let spec = t.transform(&signal).unwrap();
        prop_assert_eq!(spec.points().len() % t.frame_len(), 0);
        prop_assert_eq!(spec.frame_count(), len.div_ceil(t.step()));
        prop_assert!(spec.points().iter().all(|p| p.power.is_finite()));
    }
}
