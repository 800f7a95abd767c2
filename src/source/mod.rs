// src/source/mod.rs

pub mod file;

use crate::error::Result;

pub use file::FileSampleSource;

/// Describes the samples a source hands out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleFormat {
    pub bits_per_sample: u16,
    pub channels: usize,
    pub sample_rate: u32,
}

impl SampleFormat {
    pub fn bytes_per_sample(&self) -> u64 {
        (self.bits_per_sample / 8) as u64
    }
}

/// A decoded stream of normalized samples, read front to back.
///
/// Channels stay interleaved; the renderer treats the stream as one
/// mono-equivalent sequence.
pub trait SampleSource {
    fn format(&self) -> SampleFormat;

    /// Total stream length in bytes at `format().bits_per_sample`.
    fn byte_len(&self) -> u64;

    /// Fills `buf` with the next samples and returns how many were written.
    /// Returns 0 once the stream is exhausted.
    fn read(&mut self, buf: &mut [f32]) -> Result<usize>;
}

impl<S: SampleSource + ?Sized> SampleSource for &mut S {
    fn format(&self) -> SampleFormat {
        (**self).format()
    }

    fn byte_len(&self) -> u64 {
        (**self).byte_len()
    }

    fn read(&mut self, buf: &mut [f32]) -> Result<usize> {
        (**self).read(buf)
    }
}

impl<S: SampleSource + ?Sized> SampleSource for Box<S> {
    fn format(&self) -> SampleFormat {
        (**self).format()
    }

    fn byte_len(&self) -> u64 {
        (**self).byte_len()
    }

    fn read(&mut self, buf: &mut [f32]) -> Result<usize> {
        (**self).read(buf)
    }
}

/// Samples that are already decoded into memory.
pub struct MemorySampleSource {
    samples: Vec<f32>,
    pos: usize,
    format: SampleFormat,
}

impl MemorySampleSource {
    /// Mono 32-bit float samples at 44.1 kHz.
    pub fn new(samples: Vec<f32>) -> Self {
        Self::with_format(
            samples,
            SampleFormat {
                bits_per_sample: 32,
                channels: 1,
                sample_rate: 44100,
            },
        )
    }

    pub fn with_format(samples: Vec<f32>, format: SampleFormat) -> Self {
        Self {
            samples,
            pos: 0,
            format,
        }
    }

    pub fn remaining(&self) -> usize {
        self.samples.len() - self.pos
    }
}

impl SampleSource for MemorySampleSource {
    fn format(&self) -> SampleFormat {
        self.format
    }

    fn byte_len(&self) -> u64 {
        self.samples.len() as u64 * self.format.bytes_per_sample()
    }

    fn read(&mut self, buf: &mut [f32]) -> Result<usize> {
        let n = buf.len().min(self.remaining());
        buf[..n].copy_from_slice(&self.samples[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}
