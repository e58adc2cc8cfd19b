pub mod metrics;
pub mod series;
pub mod streaks;
pub mod trades;
