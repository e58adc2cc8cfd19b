// src/engines/metrics/profitability.rs
use crate::types::*;
use std::collections::HashMap;

pub struct ProfitabilityMetrics;

#[derive(Default)]
struct Tally {
    count: usize,
    gross: f64,
    largest: f64,
}

impl Tally {
    fn add(&mut self, amount: f64) {
        self.count += 1;
        self.gross += amount;
        self.largest = self.largest.max(amount);
    }

    fn average(&self) -> Option<f64> {
        (self.count > 0).then(|| self.gross / self.count as f64)
    }
}

impl ProfitabilityMetrics {
    /// Trade statistics keyed by name. Break-even trades count as losses.
    pub fn calculate(trades: &[Trade], initial_capital: f64) -> HashMap<String, f64> {
        let mut metrics = HashMap::new();
        if trades.is_empty() {
            return metrics;
        }

        let mut wins = Tally::default();
        let mut losses = Tally::default();
        let mut capture_sum = 0.0;
        let mut capture_count = 0usize;
        let mut losing_run = 0usize;
        let mut longest_losing_run = 0usize;

        for trade in trades {
            if trade.pnl > 0.0 {
                wins.add(trade.pnl);
                losing_run = 0;
                let mfe = trade.mfe.abs();
                if mfe > 0.0 {
                    capture_sum += trade.pnl.min(mfe) / mfe;
                    capture_count += 1;
                }
            } else {
                losses.add(trade.pnl.abs());
                losing_run += 1;
                longest_losing_run = longest_losing_run.max(losing_run);
            }
        }

        let net_pnl = wins.gross - losses.gross;
        metrics.insert("net_pnl".to_string(), net_pnl);
        metrics.insert("expectancy".to_string(), net_pnl / trades.len() as f64);
        if initial_capital > 0.0 {
            metrics.insert("return_pct".to_string(), net_pnl / initial_capital * 100.0);
        }
        metrics.insert(
            "win_rate".to_string(),
            wins.count as f64 / trades.len() as f64 * 100.0,
        );

        if let Some(avg_win) = wins.average() {
            metrics.insert("avg_win".to_string(), avg_win);
            metrics.insert("largest_win".to_string(), wins.largest);
        }
        if let Some(avg_loss) = losses.average() {
            metrics.insert("avg_loss".to_string(), avg_loss);
            metrics.insert("largest_loss".to_string(), losses.largest);
        }
        metrics.insert("max_consecutive_losses".to_string(), longest_losing_run as f64);

        metrics.insert("gross_profit".to_string(), wins.gross);
        metrics.insert("gross_loss".to_string(), losses.gross);
        if losses.gross > 0.0 {
            metrics.insert("profit_factor".to_string(), wins.gross / losses.gross);
        }

        // Share of the favourable excursion that winners kept
        if capture_count > 0 {
            metrics.insert(
                "avg_mfe_capture_pct".to_string(),
                capture_sum / capture_count as f64 * 100.0,
            );
        }

        metrics
    }
}
