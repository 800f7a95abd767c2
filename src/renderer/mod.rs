// src/renderer/mod.rs

pub mod canvas;

use crate::error::{RenderError, Result};
use crate::peaks::decibel::DEFAULT_DB_RANGE;
use crate::peaks::{DecibelPeakProvider, MaxPeakProvider, PeakProvider, PeakReader};
use crate::settings::RenderSettings;
use crate::source::{FileSampleSource, SampleSource};
use canvas::Canvas;
use image::RgbaImage;
use std::path::Path;

/// Renders an audio file with the default max-peak reduction.
pub fn render_file(path: impl AsRef<Path>, settings: &RenderSettings) -> Result<RgbaImage> {
    render_file_with(path, MaxPeakProvider, settings)
}

pub fn render_file_with<P: PeakProvider>(
    path: impl AsRef<Path>,
    provider: P,
    settings: &RenderSettings,
) -> Result<RgbaImage> {
    render_file_using(path, provider, settings, |p| FileSampleSource::open(p))
}

/// Like `render_file_with`, but `open` decides how the path becomes a
/// sample source. The source is dropped before this returns.
pub fn render_file_using<P, S, F>(
    path: impl AsRef<Path>,
    provider: P,
    settings: &RenderSettings,
    open: F,
) -> Result<RgbaImage>
where
    P: PeakProvider,
    S: SampleSource,
    F: FnOnce(&Path) -> Result<S>,
{
    let source = open(path.as_ref())?;
    render(source, provider, settings)
}

/// Reduces `source` to one peak per column group and draws it.
///
/// Pass `&mut source` to keep ownership of the source; either way nothing
/// is returned unless every sample needed was read successfully.
pub fn render<S, P>(source: S, provider: P, settings: &RenderSettings) -> Result<RgbaImage>
where
    S: SampleSource,
    P: PeakProvider,
{
    let samples_per_peak = samples_per_peak(&source, settings)?;
    log::debug!(
        "rendering {}x{} with {} samples per peak (decibel scale: {})",
        settings.width,
        settings.height(),
        samples_per_peak,
        settings.decibel_scale
    );

    if settings.decibel_scale {
        let provider = DecibelPeakProvider::new(provider, DEFAULT_DB_RANGE);
        draw(PeakReader::init(source, provider, samples_per_peak), settings)
    } else {
        draw(PeakReader::init(source, provider, samples_per_peak), settings)
    }
}

/// Raw samples folded into one peak. Truncates, so the tail of the stream
/// past the last whole column is never drawn.
pub fn samples_per_peak<S: SampleSource>(source: &S, settings: &RenderSettings) -> Result<usize> {
    let format = source.format();
    let bytes_per_sample = format.bytes_per_sample();
    if bytes_per_sample == 0 {
        return Err(RenderError::InvalidFormat(format!(
            "{} bits per sample",
            format.bits_per_sample
        )));
    }

    let total_samples = source.byte_len() / bytes_per_sample;
    let samples_per_pixel = match settings.width {
        0 => 0,
        w => total_samples / w as u64,
    };
    samples_per_pixel
        .checked_mul(settings.step() as u64)
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| {
            RenderError::InvalidFormat(format!(
                "{samples_per_pixel} samples per column over {} columns per peak",
                settings.step()
            ))
        })
}

fn draw<S, P>(mut peaks: PeakReader<S, P>, settings: &RenderSettings) -> Result<RgbaImage>
where
    S: SampleSource,
    P: PeakProvider,
{
    let mut canvas = Canvas::new(
        settings.width,
        settings.top_height,
        settings.bottom_height,
        settings.background_color,
    );

    if settings.step() == 0 {
        log::warn!("pixels_per_peak and spacer_pixels are both 0, nothing to draw");
        return Ok(canvas.into_image());
    }
    if peaks.samples_per_peak() == 0 {
        log::debug!("fewer samples than columns, drawing background only");
    }

    let width = canvas.width();
    let mut x = 0u32;
    let mut current = peaks.next_peak()?;
    while x < width {
        let next = peaks.next_peak()?;

        for _ in 0..settings.pixels_per_peak {
            if x >= width {
                break;
            }
            canvas.draw_peak(x, current, &settings.top_peak_pen, &settings.bottom_peak_pen);
            x += 1;
        }

        let spacer = current.spacer(next);
        for _ in 0..settings.spacer_pixels {
            if x >= width {
                break;
            }
            canvas.draw_peak(x, spacer, &settings.top_spacer_pen, &settings.bottom_spacer_pen);
            x += 1;
        }

        current = next;
    }

    Ok(canvas.into_image())
}
