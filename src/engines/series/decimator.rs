// src/engines/series/decimator.rs
use crate::error::{AnalyticsError, Result};
use crate::types::EquitySample;

pub const DEFAULT_DECIMATION_CAP: usize = 2000;

/// Peak-preserving reduction of an equity series for plotting.
pub struct SeriesDecimator {
    cap: usize,
}

impl SeriesDecimator {
    pub fn new(cap: usize) -> Result<Self> {
        Self::check_cap(cap)?;
        Ok(Self { cap })
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn decimate(&self, series: &[EquitySample]) -> Vec<EquitySample> {
        if series.len() <= self.cap {
            return series.to_vec();
        }
        self.select(series).into_iter().map(|i| series[i]).collect()
    }

    /// Source indices retained by [`SeriesDecimator::decimate`].
    ///
    /// The returned indices are strictly ascending, start at 0 and end at
    /// `series.len() - 1`. Parallel arrays can be reduced with them.
    pub fn select(&self, series: &[EquitySample]) -> Vec<usize> {
        let n = series.len();
        if n <= self.cap {
            return (0..n).collect();
        }

        let buckets = self.cap - 2;
        let interior = n - 2;
        let mut kept = Vec::with_capacity(self.cap);
        kept.push(0);

        // Bucket k covers [1 + floor(k * interior / buckets), 1 + floor((k + 1) * interior / buckets)).
        // interior >= cap - 1 > buckets, so no bucket is empty.
        for k in 0..buckets {
            let start = 1 + k * interior / buckets;
            let end = 1 + (k + 1) * interior / buckets;

            let mut best = start;
            let mut best_abs = series[start].equity.abs();
            for (offset, sample) in series[start + 1..end].iter().enumerate() {
                let magnitude = sample.equity.abs();
                if magnitude > best_abs {
                    best_abs = magnitude;
                    best = start + 1 + offset;
                }
            }
            kept.push(best);
        }

        kept.push(n - 1);
        kept
    }

    fn check_cap(cap: usize) -> Result<()> {
        if cap < 2 {
            return Err(AnalyticsError::InvalidConfig(format!(
                "Decimation cap must be at least 2, got {}",
                cap
            )));
        }
        Ok(())
    }
}

/// Reduce `series` to at most `cap` samples, keeping both endpoints.
pub fn decimate(series: &[EquitySample], cap: usize) -> Result<Vec<EquitySample>> {
    Ok(SeriesDecimator::new(cap)?.decimate(series))
}
