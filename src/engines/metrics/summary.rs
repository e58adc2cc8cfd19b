// src/engines/metrics/summary.rs
use crate::types::{StreakKind, StreakPeriod};
use serde::{Deserialize, Serialize};

/// Scalar reductions over detected streak periods.
///
/// Percentages are relative to initial capital.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StreakSummary {
    pub growth_count: usize,
    pub drawdown_count: usize,
    pub avg_growth_duration: f64,
    pub avg_drawdown_duration: f64,
    pub max_growth_duration: usize,
    pub max_drawdown_duration: usize,
    pub avg_runup: f64,
    pub max_runup: f64,
    pub max_runup_pct: f64,
    pub avg_drawdown: f64,
    pub max_drawdown: f64,
    pub max_drawdown_pct: f64,
}

#[derive(Default)]
struct Tally {
    count: usize,
    bars: usize,
    max_bars: usize,
    total: f64,
    max: f64,
}

impl Tally {
    fn add(&mut self, period: &StreakPeriod) {
        self.count += 1;
        self.bars += period.duration_bars;
        self.max_bars = self.max_bars.max(period.duration_bars);
        self.total += period.magnitude;
        self.max = self.max.max(period.magnitude);
    }

    fn avg_bars(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.bars as f64 / self.count as f64
        }
    }

    fn avg(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

impl StreakSummary {
    pub fn from_periods(periods: &[StreakPeriod], initial_capital: f64) -> Self {
        let mut growth = Tally::default();
        let mut drawdown = Tally::default();
        for period in periods {
            match period.kind {
                StreakKind::Growth => growth.add(period),
                StreakKind::Drawdown => drawdown.add(period),
            }
        }

        let pct = |value: f64| {
            if initial_capital > 0.0 {
                value / initial_capital * 100.0
            } else {
                0.0
            }
        };

        Self {
            growth_count: growth.count,
            drawdown_count: drawdown.count,
            avg_growth_duration: growth.avg_bars(),
            avg_drawdown_duration: drawdown.avg_bars(),
            max_growth_duration: growth.max_bars,
            max_drawdown_duration: drawdown.max_bars,
            avg_runup: growth.avg(),
            max_runup: growth.max,
            max_runup_pct: pct(growth.max),
            avg_drawdown: drawdown.avg(),
            max_drawdown: drawdown.max,
            max_drawdown_pct: pct(drawdown.max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::streaks::detect_streak_values;

    #[test]
    fn test_summary_of_reference_scenario() {
        let periods = detect_streak_values(&[10000.0, 10500.0, 10200.0, 11000.0, 9500.0]);
        let summary = StreakSummary::from_periods(&periods, 10_000.0);

        assert_eq!(summary.growth_count, 2);
        assert_eq!(summary.drawdown_count, 2);
        assert_eq!(summary.avg_runup, 650.0);
        assert_eq!(summary.max_runup, 800.0);
        assert!((summary.max_runup_pct - 8.0).abs() < 1e-9);
        assert_eq!(summary.avg_drawdown, 900.0);
        assert_eq!(summary.max_drawdown, 1500.0);
        assert!((summary.max_drawdown_pct - 15.0).abs() < 1e-9);
        assert_eq!(summary.avg_growth_duration, 1.0);
        assert_eq!(summary.max_drawdown_duration, 1);
    }

    #[test]
    fn test_empty_summary_is_zeroed() {
        assert_eq!(StreakSummary::from_periods(&[], 10_000.0), StreakSummary::default());
    }
}
