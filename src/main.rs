// src/main.rs

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use waveform_renderer::{
    AveragePeakProvider, Color, MaxPeakProvider, PeakProvider, RenderSettings, RmsPeakProvider,
    SamplingPeakProvider, render_file_with,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    Standard,
    Soundcloud,
    Blocks,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PeakKind {
    Max,
    Rms,
    Sampling,
    Average,
}

#[derive(Parser, Debug)]
#[command(name = "waveform")]
#[command(version, about = "Render an audio file's waveform to an image")]
struct Args {
    /// Audio file to read
    input: PathBuf,

    /// Image to write; format follows the extension (png, bmp)
    output: PathBuf,

    /// JSON settings file; overrides the preset
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value = "standard")]
    preset: Preset,

    #[arg(short, long)]
    width: Option<u32>,

    #[arg(long)]
    top_height: Option<u32>,

    #[arg(long)]
    bottom_height: Option<u32>,

    #[arg(long)]
    pixels_per_peak: Option<u32>,

    #[arg(long)]
    spacer_pixels: Option<u32>,

    /// Draw on a 48 dB decibel scale
    #[arg(long)]
    decibel: bool,

    /// Background as #RRGGBB or #RRGGBBAA
    #[arg(long)]
    background: Option<Color>,

    /// How each column's samples are reduced
    #[arg(long, value_enum, default_value = "max")]
    peaks: PeakKind,

    /// Block size for rms, stride for sampling
    #[arg(long, default_value = "200")]
    block_size: usize,

    /// Scale factor for average peaks
    #[arg(long, default_value = "4.0")]
    scale: f32,
}

impl Args {
    fn settings(&self) -> Result<RenderSettings> {
        let mut s = match &self.config {
            Some(path) => RenderSettings::load_from_disk(path)
                .with_context(|| format!("loading settings from {}", path.display()))?,
            None => match self.preset {
                Preset::Standard => RenderSettings::standard(),
                Preset::Soundcloud => RenderSettings::soundcloud_original(),
                Preset::Blocks => RenderSettings::soundcloud_blocks(),
            },
        };

        if let Some(v) = self.width {
            s.width = v;
        }
        if let Some(v) = self.top_height {
            s.top_height = v;
        }
        if let Some(v) = self.bottom_height {
            s.bottom_height = v;
        }
        if let Some(v) = self.pixels_per_peak {
            s.pixels_per_peak = v;
        }
        if let Some(v) = self.spacer_pixels {
            s.spacer_pixels = v;
        }
        if let Some(c) = self.background {
            s.background_color = c;
        }
        s.decibel_scale |= self.decibel;
        Ok(s)
    }

    fn provider(&self) -> Box<dyn PeakProvider> {
        match self.peaks {
            PeakKind::Max => Box::new(MaxPeakProvider),
            PeakKind::Rms => Box::new(RmsPeakProvider::new(self.block_size)),
            PeakKind::Sampling => Box::new(SamplingPeakProvider::new(self.block_size)),
            PeakKind::Average => Box::new(AveragePeakProvider::new(self.scale)),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let settings = args.settings()?;

    log::info!(
        "rendering {} at {}x{} ({:?} peaks)",
        args.input.display(),
        settings.width,
        settings.height(),
        args.peaks
    );

    let image = render_file_with(&args.input, args.provider(), &settings)
        .with_context(|| format!("rendering {}", args.input.display()))?;
    image
        .save(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;

    log::info!("wrote {}", args.output.display());
    Ok(())
}
