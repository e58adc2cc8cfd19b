// src/engines/streaks/detector.rs
use crate::types::{EquitySample, StreakKind, StreakPeriod};

/// Single-pass segmentation of an equity series into alternating growth and
/// drawdown runs.
///
/// The first value is the reference point and opens no run. Each later
/// sample either reaches a new high (growth) or sits below the running
/// high (drawdown). A run starts at the sample before its first bar, so
/// consecutive periods share their boundary index and the durations add up
/// to `len - 1`.
#[derive(Debug, Clone)]
pub struct StreakDetector {
    running_max: f64,
    local_low: f64,
    period_start_low: f64,
    growth_bars: usize,
    drawdown_bars: usize,
    drawdown_depth: f64,
    run_start: usize,
    index: usize,
    periods: Vec<StreakPeriod>,
}

impl StreakDetector {
    pub fn new(first: f64) -> Self {
        Self {
            running_max: first,
            local_low: first,
            period_start_low: first,
            growth_bars: 0,
            drawdown_bars: 0,
            drawdown_depth: 0.0,
            run_start: 0,
            index: 0,
            periods: Vec::new(),
        }
    }

    pub fn push(&mut self, equity: f64) {
        self.index += 1;
        let previous = self.index - 1;

        if equity >= self.running_max {
            if self.drawdown_bars > 0 {
                self.close_drawdown(previous);
                self.period_start_low = self.local_low;
            }
            self.running_max = equity;
            self.local_low = equity;
            self.growth_bars += 1;
        } else {
            self.drawdown_depth = self.drawdown_depth.max(self.running_max - equity);
            if self.growth_bars > 0 {
                self.close_growth(previous);
            }
            self.drawdown_bars += 1;
            self.local_low = self.local_low.min(equity);
        }
    }

    /// Flush the open run and return all periods in series order.
    pub fn finish(mut self) -> Vec<StreakPeriod> {
        let end = self.index;
        if self.growth_bars > 0 {
            self.close_growth(end);
        } else if self.drawdown_bars > 0 {
            self.close_drawdown(end);
        }
        self.periods
    }

    fn close_growth(&mut self, end: usize) {
        self.periods.push(StreakPeriod {
            kind: StreakKind::Growth,
            start_index: self.run_start,
            end_index: end,
            duration_bars: self.growth_bars,
            magnitude: self.running_max - self.period_start_low,
        });
        self.run_start = end;
        self.growth_bars = 0;
    }

    fn close_drawdown(&mut self, end: usize) {
        self.periods.push(StreakPeriod {
            kind: StreakKind::Drawdown,
            start_index: self.run_start,
            end_index: end,
            duration_bars: self.drawdown_bars,
            magnitude: self.drawdown_depth,
        });
        self.run_start = end;
        self.drawdown_bars = 0;
        self.drawdown_depth = 0.0;
    }
}

pub fn detect_streak_values(values: &[f64]) -> Vec<StreakPeriod> {
    let Some((&first, rest)) = values.split_first() else {
        return Vec::new();
    };
    let mut detector = StreakDetector::new(first);
    for &value in rest {
        detector.push(value);
    }
    detector.finish()
}

pub fn detect_streaks(series: &[EquitySample]) -> Vec<StreakPeriod> {
    let Some((first, rest)) = series.split_first() else {
        return Vec::new();
    };
    let mut detector = StreakDetector::new(first.equity);
    for sample in rest {
        detector.push(sample.equity);
    }
    detector.finish()
}
