use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Empty series: {0}")]
    EmptySeries(String),

    #[error("Trade #{trade_num} is outside the equity series: {reason}")]
    MisalignedTrade { trade_num: usize, reason: String },

    #[error("Data loading error: {0}")]
    DataLoading(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config source error: {0}")]
    Config(#[from] ::config::ConfigError),
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
