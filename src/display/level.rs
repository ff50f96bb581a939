//! Noise level classification.

/// Thresholds that decide how loud a reading is.
///
/// A reading strictly above `loud_db` is loud, strictly above `harmful_db`
/// is harmful.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelThresholds {
    pub loud_db: f64,
    pub harmful_db: f64,
}

impl Default for LevelThresholds {
    fn default() -> Self {
        Self {
            loud_db: 60.0,
            harmful_db: 80.0,
        }
    }
}

impl LevelThresholds {
    pub fn classify(&self, value: f64) -> NoiseLevel {
        if value > self.harmful_db {
            NoiseLevel::Harmful
        } else if value > self.loud_db {
            NoiseLevel::Loud
        } else {
            NoiseLevel::Quiet
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NoiseLevel {
    Quiet,
    Loud,
    Harmful,
}

impl NoiseLevel {
    /// Returns a short label for display.
    pub fn label(&self) -> &'static str {
        match self {
            NoiseLevel::Quiet => "quiet",
            NoiseLevel::Loud => "loud",
            NoiseLevel::Harmful => "harmful",
        }
    }
}
