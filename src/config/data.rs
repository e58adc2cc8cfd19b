use super::traits::ConfigSection;
use crate::error::AnalyticsError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Minimum rows an equity file must contain.
    pub min_rows: usize,
    /// Unit of integer timestamp columns.
    pub timestamp_unit: TimestampUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampUnit {
    Seconds,
    #[default]
    Millis,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            min_rows: 1,
            timestamp_unit: TimestampUnit::Millis,
        }
    }
}

impl ConfigSection for DataConfig {
    fn section_name() -> &'static str {
        "data"
    }

    fn validate(&self) -> Result<(), AnalyticsError> {
        if self.min_rows == 0 {
            return Err(AnalyticsError::Configuration(
                "Minimum rows must be at least 1".to_string()
            ));
        }
        Ok(())
    }
}
