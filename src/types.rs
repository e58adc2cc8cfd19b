use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One point of the raw equity curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquitySample {
    pub timestamp: DateTime<Utc>,
    pub equity: f64,
    #[serde(default)]
    pub drawdown_pct: f64,
}

impl EquitySample {
    pub fn new(timestamp: DateTime<Utc>, equity: f64, drawdown_pct: f64) -> Self {
        Self {
            timestamp,
            equity,
            drawdown_pct,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Long,
    Short,
}

/// Closed trade as reported by the backtest.
///
/// `mfe` and `mae` are excursion magnitudes in account currency. Some
/// producers sign `mae` negative, so consumers take the absolute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    pub side: Side,
    pub pnl: f64,
    #[serde(default)]
    pub mfe: f64,
    #[serde(default)]
    pub mae: f64,
    #[serde(default)]
    pub mfe_pct: Option<f64>,
    #[serde(default)]
    pub mae_pct: Option<f64>,
}

/// A trade mapped onto index space of a sampled equity series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeRange {
    /// 1-based position of the trade in the input list.
    pub trade_num: usize,
    pub entry_index: usize,
    pub exit_index: usize,
    pub mfe: f64,
    pub mae: f64,
    /// Set when a timestamp fell outside the series and was pinned to an end.
    pub clamped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreakKind {
    Growth,
    Drawdown,
}

/// A contiguous growth or drawdown run over an equity series.
///
/// `magnitude` is trough-to-peak height for growth runs and the deepest
/// peak-to-sample distance for drawdown runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StreakPeriod {
    pub kind: StreakKind,
    pub start_index: usize,
    pub end_index: usize,
    pub duration_bars: usize,
    pub magnitude: f64,
}

/// Tooltip/annotation payload for the trade exiting at a series index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeMarker {
    pub trade_num: usize,
    pub side: Side,
    pub pnl: f64,
    pub cumulative_pnl: f64,
    pub exit_time: DateTime<Utc>,
    /// Excursions in display units, converted by initial capital like `pnl`.
    pub mfe: f64,
    pub mae: f64,
    /// Percentages as supplied by the producer, on whatever base it used.
    #[serde(default)]
    pub reported_mfe_pct: Option<f64>,
    #[serde(default)]
    pub reported_mae_pct: Option<f64>,
}

/// A plotted value at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Absolute,
    Percent,
}

impl DisplayMode {
    /// Express an absolute P&L value in this mode.
    ///
    /// Percentages are always relative to initial capital, never to current
    /// equity, so converted series stay additive.
    pub fn apply(self, value: f64, initial_capital: f64) -> f64 {
        match self {
            DisplayMode::Absolute => value,
            DisplayMode::Percent => value / initial_capital * 100.0,
        }
    }

    /// Inverse of [`DisplayMode::apply`].
    pub fn revert(self, value: f64, initial_capital: f64) -> f64 {
        match self {
            DisplayMode::Absolute => value,
            DisplayMode::Percent => value * initial_capital / 100.0,
        }
    }
}

impl std::str::FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "absolute" | "abs" | "currency" => Ok(DisplayMode::Absolute),
            "percent" | "pct" | "%" => Ok(DisplayMode::Percent),
            other => Err(format!("unknown display mode '{}'", other)),
        }
    }
}
