pub mod benchmark;
pub mod engine;
pub mod profitability;
pub mod risk;
pub mod summary;
pub mod synthetic;
pub mod view;

pub use benchmark::{BenchmarkBuilder, BenchmarkInputs, BenchmarkOrigin};
pub use engine::{aggregate, BacktestInput, MetricsEngine};
pub use profitability::ProfitabilityMetrics;
pub use risk::RiskMetrics;
pub use summary::StreakSummary;
pub use synthetic::synthesize_equity;
pub use view::ViewModel;
