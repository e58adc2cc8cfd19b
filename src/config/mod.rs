pub mod traits;
pub mod engine;
pub mod data;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use engine::{EngineConfig, BenchmarkSource, StreakBasis};
pub use data::{DataConfig, TimestampUnit};
pub use traits::ConfigSection;
