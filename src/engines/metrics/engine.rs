// src/engines/metrics/engine.rs
use super::{
    benchmark::{BenchmarkBuilder, BenchmarkInputs},
    profitability::ProfitabilityMetrics,
    risk::RiskMetrics,
    summary::StreakSummary,
    synthetic::synthesize_equity,
    view::ViewModel,
};
use crate::config::{ConfigSection, EngineConfig, StreakBasis};
use crate::engines::series::{SeriesDecimator, TemporalAligner};
use crate::engines::streaks::detect_streaks;
use crate::engines::trades::excursion_bars;
use crate::error::{AnalyticsError, Result};
use crate::types::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

/// One completed backtest as delivered by the result provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestInput {
    pub initial_capital: f64,
    #[serde(default)]
    pub trades: Vec<Trade>,
    #[serde(default)]
    pub equity: Vec<EquitySample>,
    #[serde(default)]
    pub benchmark: BenchmarkInputs,
}

impl BacktestInput {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            initial_capital,
            trades: Vec::new(),
            equity: Vec::new(),
            benchmark: BenchmarkInputs::default(),
        }
    }

    pub fn with_trades(mut self, trades: Vec<Trade>) -> Self {
        self.trades = trades;
        self
    }

    pub fn with_equity(mut self, equity: Vec<EquitySample>) -> Self {
        self.equity = equity;
        self
    }

    pub fn with_benchmark(mut self, benchmark: BenchmarkInputs) -> Self {
        self.benchmark = benchmark;
        self
    }
}

/// Composes decimation, alignment, excursions and streaks into a [`ViewModel`].
#[derive(Debug, Clone, Default)]
pub struct MetricsEngine {
    config: EngineConfig,
}

impl MetricsEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn calculate_all(
        &self,
        trades: &[Trade],
        equity: &[EquitySample],
        initial_capital: f64,
    ) -> HashMap<String, f64> {
        let mut all_metrics = HashMap::new();

        // Profitability metrics
        let profit_metrics = ProfitabilityMetrics::calculate(trades, initial_capital);
        all_metrics.extend(profit_metrics);

        // Risk metrics
        let risk_metrics = RiskMetrics::calculate(equity);
        all_metrics.extend(risk_metrics);

        // Basic metrics
        all_metrics.insert("num_trades".to_string(), trades.len() as f64);
        all_metrics.insert("final_equity".to_string(),
            equity.last().map(|s| s.equity).unwrap_or(initial_capital));

        all_metrics
    }

    pub fn aggregate(&self, input: &BacktestInput) -> Result<ViewModel> {
        self.aggregate_parts(
            &input.trades,
            &input.equity,
            input.initial_capital,
            &input.benchmark,
        )
    }

    /// Aggregate independent backtests in parallel; results keep input order.
    pub fn aggregate_batch(&self, inputs: &[BacktestInput]) -> Vec<Result<ViewModel>> {
        inputs.par_iter().map(|input| self.aggregate(input)).collect()
    }

    pub fn aggregate_parts(
        &self,
        trades: &[Trade],
        equity: &[EquitySample],
        initial_capital: f64,
        benchmark: &BenchmarkInputs,
    ) -> Result<ViewModel> {
        self.config.validate()?;
        if !initial_capital.is_finite() || initial_capital <= 0.0 {
            return Err(AnalyticsError::InvalidConfig(format!(
                "Initial capital must be positive, got {}",
                initial_capital
            )));
        }

        let mode = self.config.display_mode;
        let (equity, synthesized): (Cow<[EquitySample]>, bool) = if !equity.is_empty() {
            (Cow::Borrowed(equity), false)
        } else if !trades.is_empty() {
            log::debug!("No equity curve supplied, rebuilding it from {} trades", trades.len());
            (Cow::Owned(synthesize_equity(trades, initial_capital)), true)
        } else {
            return Ok(ViewModel::empty(mode, initial_capital));
        };

        let decimator = SeriesDecimator::new(self.config.decimation_cap)?;
        let source_indices = decimator.select(&equity);
        let series: Vec<EquitySample> = source_indices.iter().map(|&i| equity[i]).collect();
        log::debug!("Decimated {} samples to {}", equity.len(), series.len());

        let to_display = |value: f64| mode.apply(value, initial_capital);
        let base = series[0].equity;

        let pnl_series = series
            .iter()
            .map(|s| SeriesPoint {
                timestamp: s.timestamp,
                value: to_display(s.equity - base),
            })
            .collect();

        let underwater_series = series
            .iter()
            .map(|s| SeriesPoint {
                timestamp: s.timestamp,
                value: s.drawdown_pct,
            })
            .collect();

        let (benchmark_origin, benchmark_values) =
            BenchmarkBuilder::new(benchmark, initial_capital, equity.len())
                .build(self.config.benchmark_source, &source_indices);
        let benchmark_series = series
            .iter()
            .zip(benchmark_values)
            .map(|(s, value)| SeriesPoint {
                timestamp: s.timestamp,
                value: to_display(value),
            })
            .collect();

        let ranges = TemporalAligner::align_trades(&series, trades)?;
        let excursions = excursion_bars(trades, &ranges, to_display);
        let markers = Self::build_markers(trades, &ranges, mode, initial_capital);

        let streaks_on_decimated = self.config.streak_basis == StreakBasis::Decimated;
        let streaks = if streaks_on_decimated {
            detect_streaks(&series)
        } else {
            detect_streaks(&equity)
        };
        let summary = StreakSummary::from_periods(&streaks, initial_capital);
        let metrics = self.calculate_all(trades, &equity, initial_capital);

        Ok(ViewModel {
            display_mode: mode,
            initial_capital,
            source_len: equity.len(),
            synthesized,
            series,
            source_indices,
            pnl_series,
            underwater_series,
            benchmark_origin,
            benchmark_series,
            markers,
            ranges,
            excursions,
            streaks_on_decimated,
            streaks,
            summary,
            metrics,
        })
    }

    /// Running P&L in exit order, keyed by exit index. A later exit at the
    /// same index replaces the earlier marker.
    fn build_markers(
        trades: &[Trade],
        ranges: &[TradeRange],
        mode: DisplayMode,
        initial_capital: f64,
    ) -> BTreeMap<usize, TradeMarker> {
        let mut order: Vec<usize> = (0..trades.len().min(ranges.len())).collect();
        order.sort_by_key(|&i| trades[i].exit_time);

        let mut cumulative = 0.0;
        let mut markers = BTreeMap::new();
        for i in order {
            let trade = &trades[i];
            let range = &ranges[i];
            cumulative += trade.pnl;
            markers.insert(
                range.exit_index,
                TradeMarker {
                    trade_num: range.trade_num,
                    side: trade.side,
                    pnl: mode.apply(trade.pnl, initial_capital),
                    cumulative_pnl: mode.apply(cumulative, initial_capital),
                    exit_time: trade.exit_time,
                    mfe: mode.apply(trade.mfe.abs(), initial_capital),
                    mae: mode.apply(trade.mae.abs(), initial_capital),
                    reported_mfe_pct: trade.mfe_pct,
                    reported_mae_pct: trade.mae_pct,
                },
            );
        }
        markers
    }
}

/// Aggregate with default settings and the given display mode.
pub fn aggregate(
    trades: &[Trade],
    equity: &[EquitySample],
    initial_capital: f64,
    display_mode: DisplayMode,
) -> Result<ViewModel> {
    MetricsEngine::new(EngineConfig::default().with_display_mode(display_mode)).aggregate_parts(
        trades,
        equity,
        initial_capital,
        &BenchmarkInputs::default(),
    )
}
