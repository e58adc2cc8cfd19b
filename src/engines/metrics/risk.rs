// src/engines/metrics/risk.rs
use crate::types::EquitySample;
use std::collections::HashMap;

pub struct RiskMetrics;

/// Moments of the per-sample simple returns.
struct ReturnStats {
    mean: f64,
    std_dev: f64,
    downside_dev: Option<f64>,
}

impl ReturnStats {
    /// Steps starting from non-positive equity carry no return and are skipped.
    fn from_series(series: &[EquitySample]) -> Option<Self> {
        let returns: Vec<f64> = series
            .windows(2)
            .filter(|w| w[0].equity > 0.0)
            .map(|w| w[1].equity / w[0].equity - 1.0)
            .collect();
        if returns.is_empty() {
            return None;
        }

        let n = returns.len() as f64;
        let mean = returns.iter().sum::<f64>() / n;
        let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;

        // semi-deviation below zero
        let losses: Vec<f64> = returns.iter().copied().filter(|&r| r < 0.0).collect();
        let downside_dev = (!losses.is_empty())
            .then(|| (losses.iter().map(|r| r * r).sum::<f64>() / n).sqrt());

        Some(Self {
            mean,
            std_dev: variance.sqrt(),
            downside_dev,
        })
    }
}

impl RiskMetrics {
    pub fn calculate(series: &[EquitySample]) -> HashMap<String, f64> {
        let mut metrics = HashMap::new();
        if series.len() < 2 {
            return metrics;
        }

        metrics.insert("max_drawdown_pct".to_string(), Self::max_drawdown_pct(series));
        // as reported by the producer, may differ from the recomputed value
        let reported = series.iter().fold(0.0, |acc: f64, s| acc.max(s.drawdown_pct.abs()));
        metrics.insert("reported_max_drawdown_pct".to_string(), reported);

        let Some(stats) = ReturnStats::from_series(series) else {
            return metrics;
        };
        metrics.insert("volatility".to_string(), stats.std_dev);

        // Risk-free rate taken as zero
        if stats.std_dev > 0.0 {
            metrics.insert("sharpe_ratio".to_string(), stats.mean / stats.std_dev);
        }
        if let Some(downside) = stats.downside_dev.filter(|d| *d > 0.0) {
            metrics.insert("sortino_ratio".to_string(), stats.mean / downside);
        }

        metrics
    }

    /// Deepest fall below the running peak, in percent of that peak.
    fn max_drawdown_pct(series: &[EquitySample]) -> f64 {
        let mut peak = f64::MIN;
        series.iter().fold(0.0, |deepest: f64, sample| {
            peak = peak.max(sample.equity);
            if peak <= 0.0 {
                deepest
            } else {
                deepest.max((peak - sample.equity) / peak * 100.0)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn samples(values: &[f64]) -> Vec<EquitySample> {
        let start = Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| EquitySample::new(start + Duration::days(i as i64), v, 0.0))
            .collect()
    }

    #[test]
    fn test_max_drawdown_from_peak() {
        let metrics = RiskMetrics::calculate(&samples(&[100.0, 120.0, 90.0, 80.0, 130.0]));
        assert!((metrics["max_drawdown_pct"] - 100.0 / 3.0).abs() < 1e-9);
        assert!(metrics.contains_key("sharpe_ratio"));
        assert!(metrics.contains_key("sortino_ratio"));
    }

    #[test]
    fn test_flat_curve_has_no_ratios() {
        let metrics = RiskMetrics::calculate(&samples(&[100.0, 100.0, 100.0]));
        assert_eq!(metrics["max_drawdown_pct"], 0.0);
        assert_eq!(metrics["volatility"], 0.0);
        assert!(!metrics.contains_key("sharpe_ratio"));
    }

    #[test]
    fn test_non_positive_equity_does_not_produce_nan() {
        let metrics = RiskMetrics::calculate(&samples(&[0.0, -10.0, 5.0]));
        assert!(metrics.values().all(|v| v.is_finite()));
    }
}
