// src/engines/trades/excursion.rs
use crate::types::{Side, Trade, TradeRange};
use serde::{Deserialize, Serialize};

/// Realized/unrealized split of a trade's favorable and adverse excursion.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Excursion {
    pub favorable_realized: f64,
    pub favorable_unrealized: f64,
    pub adverse_realized: f64,
    pub adverse_unrealized: f64,
}

impl Excursion {
    pub fn favorable_total(&self) -> f64 {
        self.favorable_realized + self.favorable_unrealized
    }

    pub fn adverse_total(&self) -> f64 {
        self.adverse_realized + self.adverse_unrealized
    }

    /// Share of the favorable excursion that was locked in.
    pub fn capture_ratio(&self) -> Option<f64> {
        let total = self.favorable_total();
        if total > 0.0 {
            Some(self.favorable_realized / total)
        } else {
            None
        }
    }

    /// Apply a unit conversion to all four components.
    pub fn map<F: Fn(f64) -> f64>(&self, f: F) -> Self {
        Self {
            favorable_realized: f(self.favorable_realized),
            favorable_unrealized: f(self.favorable_unrealized),
            adverse_realized: f(self.adverse_realized),
            adverse_unrealized: f(self.adverse_unrealized),
        }
    }
}

/// Split the range's excursions by the trade's realized outcome.
///
/// A winner realizes at most its MFE, a loser at most its MAE; whatever the
/// trade touched but did not close at is unrealized.
pub fn compute_excursion(trade: &Trade, range: &TradeRange) -> Excursion {
    split(trade.pnl, range.mfe.abs(), range.mae.abs())
}

fn split(pnl: f64, mfe: f64, mae: f64) -> Excursion {
    let favorable_realized = if pnl > 0.0 { pnl.min(mfe) } else { 0.0 };
    let adverse_realized = if pnl < 0.0 { pnl.abs().min(mae) } else { 0.0 };

    Excursion {
        favorable_realized,
        favorable_unrealized: mfe - favorable_realized,
        adverse_realized,
        adverse_unrealized: mae - adverse_realized,
    }
}

/// Everything the renderer needs to draw one two-layer excursion bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExcursionBar {
    pub trade_num: usize,
    pub side: Side,
    pub entry_index: usize,
    pub exit_index: usize,
    pub excursion: Excursion,
}

/// Pair trades with their aligned ranges (matched by trade number).
///
/// The split is made in currency and then converted with `to_display`, so
/// all four values share one unit.
pub fn excursion_bars<F>(trades: &[Trade], ranges: &[TradeRange], to_display: F) -> Vec<ExcursionBar>
where
    F: Fn(f64) -> f64,
{
    ranges
        .iter()
        .filter_map(|range| {
            let trade = trades.get(range.trade_num.checked_sub(1)?)?;
            let excursion = compute_excursion(trade, range).map(&to_display);
            Some(ExcursionBar {
                trade_num: range.trade_num,
                side: trade.side,
                entry_index: range.entry_index,
                exit_index: range.exit_index,
                excursion,
            })
        })
        .collect()
}
