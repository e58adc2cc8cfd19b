pub mod detector;

pub use detector::{detect_streak_values, detect_streaks, StreakDetector};
