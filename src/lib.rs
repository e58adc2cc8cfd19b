pub mod config;
pub mod data;
pub mod engines;
pub mod error;
pub mod types;

pub use engines::metrics::{aggregate, BacktestInput, MetricsEngine, ViewModel};
pub use error::{AnalyticsError, Result};
pub use types::*;
