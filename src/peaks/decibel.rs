// src/peaks/decibel.rs

use crate::peaks::{Peak, PeakProvider};

/// Bottom of the visible range used when rendering with a decibel scale.
pub const DEFAULT_DB_RANGE: f32 = 48.0;

/// Wraps another provider and maps its linear peaks onto a decibel scale.
///
/// Full scale (0 dB) stays at 1.0, `-db_range` dB and anything quieter
/// collapses to 0. Min and max are mapped independently and keep their sign.
#[derive(Debug, Clone, Copy)]
pub struct DecibelPeakProvider<P> {
    inner: P,
    db_range: f32,
}

impl<P: PeakProvider> DecibelPeakProvider<P> {
    pub fn new(inner: P, db_range: f32) -> Self {
        Self { inner, db_range }
    }

    pub fn db_range(&self) -> f32 {
        self.db_range
    }
}

impl<P: PeakProvider> PeakProvider for DecibelPeakProvider<P> {
    fn peak(&self, group: &[f32]) -> Peak {
        let raw = self.inner.peak(group);
        Peak {
            min: to_decibel_scale(raw.min, self.db_range),
            max: to_decibel_scale(raw.max, self.db_range),
        }
    }
}

pub fn to_decibel_scale(value: f32, db_range: f32) -> f32 {
    if value == 0.0 || db_range <= 0.0 {
        return 0.0;
    }
    let db = 20.0 * value.abs().log10();
    let linear = (1.0 + db / db_range).clamp(0.0, 1.0);
    linear.copysign(value)
}
