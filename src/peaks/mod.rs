// src/peaks/mod.rs

pub mod decibel;
pub mod providers;

use crate::error::Result;
use crate::source::SampleSource;

pub use decibel::DecibelPeakProvider;
pub use providers::{AveragePeakProvider, MaxPeakProvider, RmsPeakProvider, SamplingPeakProvider};

/// Amplitude extremes of one group of consecutive samples.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Peak {
    pub min: f32,
    pub max: f32,
}

impl Peak {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Bar used between two peak groups: never taller than either neighbour.
    pub fn spacer(self, next: Peak) -> Peak {
        Peak {
            max: self.max.min(next.max),
            min: self.min.max(next.min),
        }
    }
}

/// Reduces one group of samples to a single `Peak`.
///
/// An empty group (end of stream) must reduce to `Peak::default()`.
pub trait PeakProvider {
    fn peak(&self, group: &[f32]) -> Peak;
}

impl<P: PeakProvider + ?Sized> PeakProvider for &P {
    fn peak(&self, group: &[f32]) -> Peak {
        (**self).peak(group)
    }
}

impl<P: PeakProvider + ?Sized> PeakProvider for Box<P> {
    fn peak(&self, group: &[f32]) -> Peak {
        (**self).peak(group)
    }
}

/// A provider bound to a source: yields one peak per `samples_per_peak`
/// samples, then zero peaks forever once the source runs dry.
pub struct PeakReader<S, P> {
    source: S,
    provider: P,
    buf: Vec<f32>,
    exhausted: bool,
}

impl<S: SampleSource, P: PeakProvider> PeakReader<S, P> {
    pub fn init(source: S, provider: P, samples_per_peak: usize) -> Self {
        Self {
            source,
            provider,
            buf: vec![0.0; samples_per_peak],
            exhausted: false,
        }
    }

    pub fn samples_per_peak(&self) -> usize {
        self.buf.len()
    }

    pub fn next_peak(&mut self) -> Result<Peak> {
        if self.buf.is_empty() || self.exhausted {
            return Ok(Peak::default());
        }

        let mut filled = 0usize;
        while filled < self.buf.len() {
            let n = self.source.read(&mut self.buf[filled..])?;
            if n == 0 {
                self.exhausted = true;
                break;
            }
            filled += n;
        }

        if filled == 0 {
            return Ok(Peak::default());
        }
        Ok(self.provider.peak(&self.buf[..filled]))
    }

    /// Hands the source back once the caller is done pulling peaks.
    pub fn into_source(self) -> S {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySampleSource;

    #[test]
    fn groups_consume_exactly_samples_per_peak() {
        let src = MemorySampleSource::new(vec![0.1, -0.5, 0.8, -0.2, 0.3, 0.4, -0.9]);
        let mut reader = PeakReader::init(src, MaxPeakProvider, 3);

        assert_eq!(reader.next_peak().unwrap(), Peak::new(-0.5, 0.8));
        assert_eq!(reader.next_peak().unwrap(), Peak::new(-0.2, 0.4));
        // short final group
        assert_eq!(reader.next_peak().unwrap(), Peak::new(-0.9, -0.9));
        assert_eq!(reader.into_source().remaining(), 0);
    }

    #[test]
    fn exhausted_reader_keeps_returning_zero_peaks() {
        let src = MemorySampleSource::new(vec![0.5, -0.5]);
        let mut reader = PeakReader::init(src, MaxPeakProvider, 2);

        assert_eq!(reader.next_peak().unwrap(), Peak::new(-0.5, 0.5));
        for _ in 0..5 {
            assert_eq!(reader.next_peak().unwrap(), Peak::default());
        }
    }

    #[test]
    fn zero_group_size_never_touches_the_source() {
        let src = MemorySampleSource::new(vec![1.0; 8]);
        let mut reader = PeakReader::init(src, MaxPeakProvider, 0);

        assert_eq!(reader.next_peak().unwrap(), Peak::default());
        assert_eq!(reader.next_peak().unwrap(), Peak::default());
        assert_eq!(reader.into_source().remaining(), 8);
    }

    #[test]
    fn spacer_never_exceeds_either_neighbour() {
        let pairs = [
            (Peak::new(-0.8, 0.9), Peak::new(-0.2, 0.3)),
            (Peak::new(-0.1, 0.1), Peak::new(-1.0, 1.0)),
            (Peak::new(-0.5, -0.1), Peak::new(0.2, 0.6)),
            (Peak::default(), Peak::default()),
        ];
        for (p, n) in pairs {
            let s = p.spacer(n);
            assert!(s.max <= p.max.min(n.max));
            assert!(s.min >= p.min.max(n.min));
        }
    }

    #[test]
    fn spacer_at_zero_crossing_keeps_source_merge_rule() {
        // both neighbours sit on opposite sides of zero
        let s = Peak::new(-0.5, -0.1).spacer(Peak::new(0.2, 0.6));
        assert_eq!(s, Peak::new(0.2, -0.1));
    }
}
