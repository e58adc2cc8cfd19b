use super::traits::ConfigSection;
use crate::engines::series::decimator::DEFAULT_DECIMATION_CAP;
use crate::error::AnalyticsError;
use crate::types::DisplayMode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub decimation_cap: usize,
    pub display_mode: DisplayMode,
    pub benchmark_source: BenchmarkSource,
    pub streak_basis: StreakBasis,
}

/// Where the buy-and-hold comparison series comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkSource {
    /// First available of: explicit equity, prices, summary return.
    #[default]
    Auto,
    Equity,
    Prices,
    SummaryReturn,
    None,
}

/// Which series the streak statistics are computed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakBasis {
    #[default]
    Full,
    Decimated,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            decimation_cap: DEFAULT_DECIMATION_CAP,
            display_mode: DisplayMode::Absolute,
            benchmark_source: BenchmarkSource::Auto,
            streak_basis: StreakBasis::Full,
        }
    }
}

impl EngineConfig {
    pub fn with_display_mode(mut self, display_mode: DisplayMode) -> Self {
        self.display_mode = display_mode;
        self
    }

    pub fn with_decimation_cap(mut self, decimation_cap: usize) -> Self {
        self.decimation_cap = decimation_cap;
        self
    }
}

impl ConfigSection for EngineConfig {
    fn section_name() -> &'static str {
        "engine"
    }

    fn validate(&self) -> Result<(), AnalyticsError> {
        if self.decimation_cap < 2 {
            return Err(AnalyticsError::InvalidConfig(format!(
                "Decimation cap must be at least 2, got {}",
                self.decimation_cap
            )));
        }
        Ok(())
    }
}
