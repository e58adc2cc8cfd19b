pub mod aligner;
pub mod decimator;

pub use aligner::TemporalAligner;
pub use decimator::SeriesDecimator;
