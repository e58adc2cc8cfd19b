// src/engines/metrics/view.rs
use super::{benchmark::BenchmarkOrigin, summary::StreakSummary};
use crate::engines::trades::ExcursionBar;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Everything the rendering layer consumes for one backtest.
///
/// Indices in `markers`, `ranges` and `excursions` refer to `series`
/// (the decimated samples). Streak indices refer to the series named by
/// `streaks_on_decimated`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    pub display_mode: DisplayMode,
    pub initial_capital: f64,
    /// Length of the equity series before decimation.
    pub source_len: usize,
    /// The equity series was rebuilt from trade P&L.
    pub synthesized: bool,
    pub series: Vec<EquitySample>,
    pub source_indices: Vec<usize>,
    pub pnl_series: Vec<SeriesPoint>,
    pub underwater_series: Vec<SeriesPoint>,
    pub benchmark_origin: BenchmarkOrigin,
    pub benchmark_series: Vec<SeriesPoint>,
    pub markers: BTreeMap<usize, TradeMarker>,
    pub ranges: Vec<TradeRange>,
    pub excursions: Vec<ExcursionBar>,
    pub streaks_on_decimated: bool,
    pub streaks: Vec<StreakPeriod>,
    pub summary: StreakSummary,
    pub metrics: HashMap<String, f64>,
}

impl ViewModel {
    /// Nothing to show: no equity samples and no trades.
    pub fn empty(display_mode: DisplayMode, initial_capital: f64) -> Self {
        Self {
            display_mode,
            initial_capital,
            source_len: 0,
            synthesized: false,
            series: Vec::new(),
            source_indices: Vec::new(),
            pnl_series: Vec::new(),
            underwater_series: Vec::new(),
            benchmark_origin: BenchmarkOrigin::Flat,
            benchmark_series: Vec::new(),
            markers: BTreeMap::new(),
            ranges: Vec::new(),
            excursions: Vec::new(),
            streaks_on_decimated: false,
            streaks: Vec::new(),
            summary: StreakSummary::default(),
            metrics: HashMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Final P&L in display units.
    pub fn final_pnl(&self) -> Option<f64> {
        self.pnl_series.last().map(|p| p.value)
    }

    pub fn marker_at(&self, index: usize) -> Option<&TradeMarker> {
        self.markers.get(&index)
    }
}
