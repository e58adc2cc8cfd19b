use crate::engines::metrics::{BacktestInput, ViewModel};
use crate::error::{AnalyticsError, Result};
use std::fs;
use std::path::Path;

/// Reads backtest reports and writes aggregated views as JSON.
pub struct JsonConnector;

impl JsonConnector {
    /// Load a full backtest report: capital, trades, equity and benchmark data.
    pub fn load_report<P: AsRef<Path>>(path: P) -> Result<BacktestInput> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            AnalyticsError::DataLoading(format!("Failed to read {:?}: {}", path.as_ref(), e))
        })?;
        let report: BacktestInput = serde_json::from_str(&content)?;
        log::info!(
            "Loaded report with {} trades and {} equity samples",
            report.trades.len(),
            report.equity.len()
        );
        Ok(report)
    }

    pub fn save_view<P: AsRef<Path>>(path: P, view: &ViewModel) -> Result<()> {
        let content = Self::render_view(view)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn render_view(view: &ViewModel) -> Result<String> {
        Ok(serde_json::to_string_pretty(view)?)
    }
}
