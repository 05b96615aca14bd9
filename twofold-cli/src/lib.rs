//! Output helpers for the `twofold` command line tool.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ColorType, ImageBuffer, ImageEncoder, Rgb};
use twofold::{AudioBuffer, Spectrogram};

/// Dynamic range shown by the heatmap, in decibels below the loudest bin.
pub const DYNAMIC_RANGE_DB: f64 = 80.0;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMap {
    #[default]
    Inferno,
    Viridis,
    Magma,
    Gray,
}

/// Which samples of a multi-channel file get transformed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    Channel(usize),
    Mix,
}

pub fn select_signal(audio: &AudioBuffer<f64>, selection: Selection) -> Result<Vec<f64>> {
    match selection {
        Selection::Channel(index) => {
            let channel = audio
                .channel(index)
                .with_context(|| format!("file has {} channel(s)", audio.channels()))?;
            Ok(channel.to_vec())
        }
        Selection::Mix => audio.mixdown().context("cannot mix channels"),
    }
}

/// Write one `frame\tfrequency\tpower` row per point. Frames are separated by
/// a blank line so gnuplot treats each as its own block.
pub fn write_tsv<W: Write>(mut out: W, spec: &Spectrogram) -> io::Result<()> {
    writeln!(out, "# frame\tfrequency\tpower")?;
    for (i, frame) in spec.frames().enumerate() {
        for point in frame {
            writeln!(out, "{i}\t{}\t{}", point.frequency, point.power)?;
        }
        writeln!(out)?;
    }
    out.flush()
}

/// Render the lower `N / 2` bins of every frame as an RGB heatmap: one
/// column per frame, low frequencies at the bottom.
///
/// `db_scale` tells whether the points already hold decibels.
pub fn render_heatmap(
    spec: &Spectrogram,
    cmap: ColorMap,
    db_scale: bool,
) -> Result<ImageBuffer<Rgb<u8>, Vec<u8>>> {
    let height = spec.frame_len() / 2;
    if spec.is_empty() || height == 0 {
        bail!("spectrogram has nothing to render");
    }
    let levels: Vec<Vec<f64>> = spec
        .frames()
        .map(|frame| {
            frame[..height]
                .iter()
                .map(|p| if db_scale { p.power } else { to_db(p.power) })
                .collect()
        })
        .collect();
    let top = levels
        .iter()
        .flatten()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);
    let floor = if top.is_finite() { top - DYNAMIC_RANGE_DB } else { 0.0 };

    let img = ImageBuffer::from_fn(levels.len() as u32, height as u32, |x, y| {
        let bin = height - 1 - y as usize;
        let t = ((levels[x as usize][bin] - floor) / DYNAMIC_RANGE_DB).clamp(0.0, 1.0);
        Rgb(map_color(t, cmap))
    });
    Ok(img)
}

fn to_db(power: f64) -> f64 {
    10.0 * power.max(1e-20).log10()
}

/// Colour for a level in `[0, 1]`. NaN maps to the low end.
pub fn map_color(t: f64, cmap: ColorMap) -> [u8; 3] {
    let t = if t.is_nan() { 0.0 } else { t };
    let c = match cmap {
        ColorMap::Gray => {
            let g = (t * 255.0).round() as u8;
            return [g, g, g];
        }
        ColorMap::Inferno => colorous::INFERNO.eval_continuous(t),
        ColorMap::Viridis => colorous::VIRIDIS.eval_continuous(t),
        ColorMap::Magma => colorous::MAGMA.eval_continuous(t),
    };
    [c.r, c.g, c.b]
}

pub fn save_png(img: &ImageBuffer<Rgb<u8>, Vec<u8>>, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let encoder = PngEncoder::new_with_quality(
        BufWriter::new(file),
        CompressionType::Best,
        FilterType::Adaptive,
    );
    encoder
        .write_image(img.as_raw(), img.width(), img.height(), ColorType::Rgb8)
        .with_context(|| format!("encoding {}", path.display()))?;
    Ok(())
}
