use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use twofold::{AudioBuffer, TransformConfig, Transformer, WindowFunction};
use twofold_cli::{render_heatmap, save_png, select_signal, write_tsv, ColorMap, Selection};

/// Compute the STFT spectrogram of a WAVE file.
#[derive(Parser)]
#[command(name = "twofold", version)]
struct Args {
    /// Path to the input WAVE file
    input: PathBuf,

    /// Target frame duration in seconds
    #[arg(long, default_value_t = 0.3)]
    interval: f64,

    /// Fraction of each frame shared with the next, clamped to [0, 0.5]
    #[arg(long, default_value_t = 0.0)]
    overlap: f64,

    /// Window applied to each frame (hann or rect)
    #[arg(long, default_value_t = WindowFunction::Hann)]
    window: WindowFunction,

    /// Report power in decibels
    #[arg(long)]
    db: bool,

    /// Channel to transform
    #[arg(long, conflicts_with = "mix")]
    channel: Option<usize>,

    /// Average all channels before transforming
    #[arg(long)]
    mix: bool,

    /// Write the TSV rows here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Also render a PNG heatmap of the lower half of the spectrum
    #[arg(long)]
    png: Option<PathBuf>,

    /// Color map for the PNG heatmap
    #[arg(long, value_enum, default_value_t = ColorMap::Inferno)]
    colormap: ColorMap,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let audio = AudioBuffer::<f64>::open(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;
    info!(
        "{}: {} channel(s), {} Hz, {} bit, {:.2} s",
        args.input.display(),
        audio.channels(),
        audio.sample_rate(),
        audio.bit_depth(),
        audio.duration_secs()
    );

    let selection = if args.mix {
        Selection::Mix
    } else {
        Selection::Channel(args.channel.unwrap_or(0))
    };
    let signal = select_signal(&audio, selection)?;

    let config = TransformConfig::default()
        .with_target_interval(args.interval)
        .with_overlap(args.overlap)
        .with_window(args.window)
        .with_db_scale(args.db);
    let mut transformer =
        Transformer::new(config, audio.sample_rate()).context("configuring the transform")?;
    let spec = transformer.transform(&signal)?;
    info!(
        "{} frame(s) of {} points, step {}",
        spec.frame_count(),
        spec.frame_len(),
        transformer.step()
    );

    match &args.output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
            write_tsv(BufWriter::new(file), &spec)?;
        }
        None => write_tsv(io::stdout().lock(), &spec)?,
    }

    if let Some(path) = &args.png {
        let img = render_heatmap(&spec, args.colormap, args.db)?;
        save_png(&img, path)?;
        info!("saved {}x{} heatmap to {}", img.width(), img.height(), path.display());
    }
    Ok(())
}
