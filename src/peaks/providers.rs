// src/peaks/providers.rs

use crate::peaks::{Peak, PeakProvider};

/// Signed min and max over every sample in the group.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxPeakProvider;

impl PeakProvider for MaxPeakProvider {
    fn peak(&self, group: &[f32]) -> Peak {
        extremes(group.iter().copied())
    }
}

/// Signed min and max over every `interval`-th sample of the group.
/// Cheaper than `MaxPeakProvider` on long groups, at the cost of missing
/// short transients.
#[derive(Debug, Clone, Copy)]
pub struct SamplingPeakProvider {
    pub interval: usize,
}

impl SamplingPeakProvider {
    pub fn new(interval: usize) -> Self {
        Self { interval }
    }
}

impl PeakProvider for SamplingPeakProvider {
    fn peak(&self, group: &[f32]) -> Peak {
        extremes(group.iter().step_by(self.interval.max(1)).copied())
    }
}

/// Loudest RMS level over `block_size` blocks of the group, mirrored
/// around zero.
#[derive(Debug, Clone, Copy)]
pub struct RmsPeakProvider {
    pub block_size: usize,
}

impl RmsPeakProvider {
    pub fn new(block_size: usize) -> Self {
        Self { block_size }
    }
}

impl PeakProvider for RmsPeakProvider {
    fn peak(&self, group: &[f32]) -> Peak {
        let mut loudest = 0.0f32;
        for block in group.chunks(self.block_size.max(1)) {
            let sum_sq: f64 = block.iter().map(|&s| (s as f64) * (s as f64)).sum();
            let rms = (sum_sq / block.len() as f64).sqrt() as f32;
            loudest = loudest.max(rms);
        }
        Peak::new(-loudest, loudest)
    }
}

/// Mean absolute amplitude times `scale`, mirrored around zero.
#[derive(Debug, Clone, Copy)]
pub struct AveragePeakProvider {
    pub scale: f32,
}

impl AveragePeakProvider {
    pub fn new(scale: f32) -> Self {
        Self { scale }
    }
}

impl PeakProvider for AveragePeakProvider {
    fn peak(&self, group: &[f32]) -> Peak {
        if group.is_empty() {
            return Peak::default();
        }
        let sum: f64 = group.iter().map(|s| s.abs() as f64).sum();
        let avg = (sum / group.len() as f64) as f32 * self.scale;
        Peak::new(-avg, avg)
    }
}

fn extremes(samples: impl Iterator<Item = f32>) -> Peak {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for s in samples {
        if s < min {
            min = s;
        }
        if s > max {
            max = s;
        }
    }
    if min.is_finite() && max.is_finite() {
        Peak::new(min, max)
    } else {
        Peak::default()
    }
}
