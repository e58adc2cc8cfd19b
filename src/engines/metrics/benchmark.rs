// src/engines/metrics/benchmark.rs
use crate::config::BenchmarkSource;
use serde::{Deserialize, Serialize};

/// Raw material for the buy-and-hold comparison series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkInputs {
    /// Benchmark account equity, one value per equity sample.
    pub equity: Option<Vec<f64>>,
    /// Instrument prices, one value per equity sample.
    pub prices: Option<Vec<f64>>,
    /// Total buy-and-hold return over the backtest, in percent.
    pub summary_return_pct: Option<f64>,
}

/// Which input produced the benchmark series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkOrigin {
    Equity,
    Prices,
    SummaryReturn,
    Flat,
}

pub struct BenchmarkBuilder<'a> {
    inputs: &'a BenchmarkInputs,
    initial_capital: f64,
    source_len: usize,
}

impl<'a> BenchmarkBuilder<'a> {
    pub fn new(inputs: &'a BenchmarkInputs, initial_capital: f64, source_len: usize) -> Self {
        Self {
            inputs,
            initial_capital,
            source_len,
        }
    }

    /// Benchmark P&L (absolute currency) at each of `indices`, which refer
    /// to positions in the source equity series.
    pub fn build(&self, source: BenchmarkSource, indices: &[usize]) -> (BenchmarkOrigin, Vec<f64>) {
        let built = match source {
            BenchmarkSource::Auto => self
                .from_equity(indices)
                .map(|v| (BenchmarkOrigin::Equity, v))
                .or_else(|| self.from_prices(indices).map(|v| (BenchmarkOrigin::Prices, v)))
                .or_else(|| {
                    self.from_summary_return(indices)
                        .map(|v| (BenchmarkOrigin::SummaryReturn, v))
                }),
            BenchmarkSource::Equity => self.from_equity(indices).map(|v| (BenchmarkOrigin::Equity, v)),
            BenchmarkSource::Prices => self.from_prices(indices).map(|v| (BenchmarkOrigin::Prices, v)),
            BenchmarkSource::SummaryReturn => self
                .from_summary_return(indices)
                .map(|v| (BenchmarkOrigin::SummaryReturn, v)),
            BenchmarkSource::None => None,
        };

        match built {
            Some(built) => built,
            None => {
                if !matches!(source, BenchmarkSource::None | BenchmarkSource::Auto) {
                    log::warn!("Benchmark source {:?} has no usable data, using a flat series", source);
                }
                (BenchmarkOrigin::Flat, vec![0.0; indices.len()])
            }
        }
    }

    fn from_equity(&self, indices: &[usize]) -> Option<Vec<f64>> {
        let values = usable(self.inputs.equity.as_deref())?;
        let base = values[0];
        Some(
            indices
                .iter()
                .map(|&i| values[self.resample(i, values.len())] - base)
                .collect(),
        )
    }

    fn from_prices(&self, indices: &[usize]) -> Option<Vec<f64>> {
        let prices = usable(self.inputs.prices.as_deref())?;
        let first = prices[0];
        if first <= 0.0 {
            log::warn!("Benchmark price series starts at {}, cannot scale", first);
            return None;
        }
        let capital = self.initial_capital;
        Some(
            indices
                .iter()
                .map(|&i| capital * prices[self.resample(i, prices.len())] / first - capital)
                .collect(),
        )
    }

    fn from_summary_return(&self, indices: &[usize]) -> Option<Vec<f64>> {
        let total_pct = self.inputs.summary_return_pct.filter(|r| r.is_finite())?;
        let total = self.initial_capital * total_pct / 100.0;
        let span = self.source_len.saturating_sub(1);
        Some(
            indices
                .iter()
                .map(|&i| {
                    if span == 0 {
                        0.0
                    } else {
                        total * i as f64 / span as f64
                    }
                })
                .collect(),
        )
    }

    /// Map a source-series index onto an array of `len` values.
    fn resample(&self, index: usize, len: usize) -> usize {
        if len == self.source_len || self.source_len <= 1 {
            return index.min(len - 1);
        }
        let scaled = index as f64 * (len - 1) as f64 / (self.source_len - 1) as f64;
        (scaled.round() as usize).min(len - 1)
    }
}

fn usable(values: Option<&[f64]>) -> Option<&[f64]> {
    values.filter(|v| !v.is_empty() && v.iter().all(|x| x.is_finite()))
}
