// Test intent: verifies the TSV and PNG outputs produced from a decoded file.

use std::f32::consts::PI;

use hound::{SampleFormat, WavSpec, WavWriter};
use image::codecs::png::PngDecoder;
use image::{ColorType, ImageDecoder};
use twofold::{AudioBuffer, TransformConfig, Transformer};
use twofold_cli::{render_heatmap, save_png, select_signal, write_tsv, ColorMap, Selection};

/// Two seconds of a 1 kHz tone at 8 kHz, left channel only.
fn tone_file(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("tone.wav");
    let spec = WavSpec {
        channels: 2,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(&path, spec).unwrap();
    for i in 0..16_000 {
        let s = (2.0 * PI * 1000.0 * i as f32 / 8000.0).sin();
        writer.write_sample((s * 16_000.0) as i16).unwrap();
        writer.write_sample(0i16).unwrap();
    }
    writer.finalize().unwrap();
    path
}

/// TSV output has a header, one row per point and a blank line per frame.
#[test]
fn tsv_rows_cover_every_point() {
    let tmp = tempfile::tempdir().unwrap();
    let audio = AudioBuffer::<f64>::open(tone_file(tmp.path())).unwrap();
    let signal = select_signal(&audio, Selection::Channel(0)).unwrap();
    let mut t = Transformer::new(TransformConfig::default(), audio.sample_rate()).unwrap();
    let spec = t.transform(&signal).unwrap();

    let mut out = Vec::new();
    write_tsv(&mut out, &spec).unwrap();
    let text = String::from_utf8(out).unwrap();
    let rows: Vec<&str> = text
        .lines()
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .collect();
    assert_eq!(rows.len(), spec.points().len());
    assert_eq!(text.lines().filter(|l| l.is_empty()).count(), spec.frame_count());

    let first: Vec<&str> = rows[1].split('\t').collect();
    assert_eq!(first.len(), 3);
    assert_eq!(first[0], "0");
    let freq: f64 = first[1].parse().unwrap();
    assert_eq!(freq, 8000.0 / spec.frame_len() as f64);
}

/// Channel selection and mixing follow the decoded layout.
#[test]
fn channel_selection() {
    let tmp = tempfile::tempdir().unwrap();
    let audio = AudioBuffer::<f64>::open(tone_file(tmp.path())).unwrap();
    let right = select_signal(&audio, Selection::Channel(1)).unwrap();
    assert!(right.iter().all(|&s| s == 0.0));
    let mixed = select_signal(&audio, Selection::Mix).unwrap();
    let left = select_signal(&audio, Selection::Channel(0)).unwrap();
    assert!((mixed[2] - left[2] / 2.0).abs() < 1e-12);
    assert!(select_signal(&audio, Selection::Channel(2)).is_err());
}

/// The heatmap has one column per frame and N/2 rows, saved as 8-bit RGB.
#[test]
fn heatmap_png_dimensions() {
    let tmp = tempfile::tempdir().unwrap();
    let audio = AudioBuffer::<f64>::open(tone_file(tmp.path())).unwrap();
    let signal = audio.channel(0).unwrap();
    let config = TransformConfig::default().with_target_interval(0.032);
    let mut t = Transformer::new(config, audio.sample_rate()).unwrap();
    let spec = t.transform(signal).unwrap();

    let img = render_heatmap(&spec, ColorMap::Gray, false).unwrap();
    assert_eq!(img.width() as usize, spec.frame_count());
    assert_eq!(img.height() as usize, spec.frame_len() / 2);

    // N = 256, so 1 kHz lands exactly on bin 32 and every full frame is alike.
    let bin = (1000.0 * spec.frame_len() as f64 / 8000.0).round() as u32;
    let row = img.height() - 1 - bin;
    assert_eq!(img.get_pixel(0, row).0, [255, 255, 255]);

    let path = tmp.path().join("spec.png");
    save_png(&img, &path).unwrap();
    let decoder = PngDecoder::new(std::fs::File::open(&path).unwrap()).unwrap();
    assert_eq!(decoder.color_type(), ColorType::Rgb8);
    assert_eq!(decoder.dimensions(), (img.width(), img.height()));
}

/// An empty spectrogram cannot be rendered.
#[test]
fn empty_spectrogram_is_rejected() {
    let mut t = Transformer::new(TransformConfig::default(), 8000).unwrap();
    let spec = t.transform(&[]).unwrap();
    assert!(render_heatmap(&spec, ColorMap::Inferno, false).is_err());
}
