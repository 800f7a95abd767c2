// src/lib.rs

pub mod error;
pub mod peaks;
pub mod renderer;
pub mod settings;
pub mod source;

pub use error::{RenderError, Result};
pub use peaks::{
    AveragePeakProvider, DecibelPeakProvider, MaxPeakProvider, Peak, PeakProvider, PeakReader,
    RmsPeakProvider, SamplingPeakProvider,
};
pub use renderer::{render, render_file, render_file_using, render_file_with};
pub use settings::{Color, Pen, RenderSettings};
pub use source::{FileSampleSource, MemorySampleSource, SampleFormat, SampleSource};
