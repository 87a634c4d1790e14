use serde::{Deserialize, Serialize};

use crate::*;

/// Points for a clear batch: `round(base_value * cleared^exponent)`.
///
/// An exponent above 1.0 makes one large region worth more than the same
/// number of blocks cleared in several small regions.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreRule {
    pub base_value: Score,
    pub exponent: f64,
}

impl ScoreRule {
    pub const DEFAULT: Self = Self::new_unchecked(100, 2.0);

    pub(crate) const fn new_unchecked(base_value: Score, exponent: f64) -> Self {
        Self {
            base_value,
            exponent,
        }
    }

    /// Exponents below 1.0 (or NaN) are raised to 1.0.
    pub fn new(base_value: Score, exponent: f64) -> Self {
        let exponent = if exponent >= 1.0 { exponent } else { 1.0 };
        Self::new_unchecked(base_value, exponent)
    }

    pub fn clamped(self) -> Self {
        Self::new(self.base_value, self.exponent)
    }

    pub fn clear_score(&self, cleared: CellCount) -> Score {
        if cleared == 0 {
            return 0;
        }
        let points = f64::from(self.base_value) * f64::from(cleared).powf(self.exponent);
        // float to int casts saturate
        points.round() as Score
    }
}

impl Default for ScoreRule {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squares_the_cleared_count_by_default() {
        let rule = ScoreRule::default();

        assert_eq!(rule.clear_score(1), 100);
        assert_eq!(rule.clear_score(3), 900);
        assert_eq!(rule.clear_score(10), 10_000);
    }

    #[test]
    fn one_large_region_beats_several_small_ones() {
        let rule = ScoreRule::default();

        assert!(rule.clear_score(6) > 2 * rule.clear_score(3));
    }

    #[test]
    fn fractional_exponent_rounds_to_nearest() {
        let rule = ScoreRule::new(10, 1.5);

        // 10 * 2^1.5 = 28.28...
        assert_eq!(rule.clear_score(2), 28);
        // 10 * 3^1.5 = 51.96...
        assert_eq!(rule.clear_score(3), 52);
    }

    #[test]
    fn exponent_is_at_least_one() {
        assert_eq!(ScoreRule::new(100, 0.5).exponent, 1.0);
        assert_eq!(ScoreRule::new(100, f64::NAN).exponent, 1.0);
        assert_eq!(ScoreRule::new(100, 0.5).clear_score(4), 400);
    }

    #[test]
    fn huge_clears_saturate() {
        let rule = ScoreRule::new(Score::MAX, 3.0);

        assert_eq!(rule.clear_score(1_000), Score::MAX);
        assert_eq!(rule.clear_score(0), 0);
    }
}
