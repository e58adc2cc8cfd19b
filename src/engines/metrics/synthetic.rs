// src/engines/metrics/synthetic.rs
use crate::types::{EquitySample, Trade};

/// Build an equity curve from closed-trade P&L alone.
///
/// One sample at the earliest entry carrying the initial capital, then one
/// per trade exit in chronological order. Each trade is booked in full at
/// its exit, so drawdown inside a trade is not represented.
pub fn synthesize_equity(trades: &[Trade], initial_capital: f64) -> Vec<EquitySample> {
    if trades.is_empty() {
        return Vec::new();
    }

    let mut order: Vec<&Trade> = trades.iter().collect();
    order.sort_by_key(|t| t.exit_time);

    let start = trades
        .iter()
        .map(|t| t.entry_time)
        .min()
        .map_or(order[0].exit_time, |entry| entry.min(order[0].exit_time));

    let mut series = Vec::with_capacity(order.len() + 1);
    series.push(EquitySample::new(start, initial_capital, 0.0));

    let mut equity = initial_capital;
    let mut peak = initial_capital;
    for trade in order {
        equity += trade.pnl;
        peak = peak.max(equity);
        let drawdown_pct = if peak > 0.0 {
            (equity - peak) / peak * 100.0
        } else {
            0.0
        };
        series.push(EquitySample::new(trade.exit_time, equity, drawdown_pct));
    }

    series
}
