use serde::{Deserialize, Serialize};

use crate::*;

/// Number of distinct block colors the renderer can draw.
pub const MAX_BLOCK_TYPES: ColorId = 6;

/// Lowest block type count that still allows matches.
pub const MIN_BLOCK_TYPES: ColorId = 2;

/// Difficulty assumed when the host reports none.
pub const DEFAULT_DIFFICULTY: u32 = 5;

/// How the last turn of a hosted match reports its match outcome.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomePolicy {
    /// Always report a win and let the host compare the submitted scores.
    HostAdjudicated,
    /// Compare the scores locally and report win, loss or tie for the local player.
    ByScore,
}

impl Default for OutcomePolicy {
    fn default() -> Self {
        Self::HostAdjudicated
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Turns in a fresh match, both players together.
    pub turns: i32,
    /// Input stays disabled this long after a clear.
    pub pacing_delay_ms: Millis,
    /// Replacement blocks appear this long after a clear.
    pub replenish_delay_ms: Millis,
    pub scoring: ScoreRule,
    pub block_types: ColorId,
    /// Grid size of a freshly generated board.
    pub board_size: Coord2,
    pub outcome_policy: OutcomePolicy,
}

impl MatchConfig {
    pub const DEFAULT: Self = Self {
        turns: 20,
        pacing_delay_ms: 2_000,
        replenish_delay_ms: 600,
        scoring: ScoreRule::DEFAULT,
        block_types: 4,
        board_size: (8, 8),
        outcome_policy: OutcomePolicy::HostAdjudicated,
    };

    /// Pulls every field back into its valid range.
    pub fn clamped(self) -> Self {
        let (size_x, size_y) = self.board_size;
        Self {
            turns: self.turns.max(1),
            scoring: self.scoring.clamped(),
            block_types: self.block_types.clamp(MIN_BLOCK_TYPES, MAX_BLOCK_TYPES),
            board_size: (size_x.max(1), size_y.max(1)),
            ..self
        }
    }

    pub fn with_difficulty(self, difficulty: Option<u32>) -> Self {
        Self {
            block_types: block_types_for_difficulty(difficulty, MAX_BLOCK_TYPES),
            ..self
        }
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Harder matches get more colors: difficulty 1 plays with two colors and
/// difficulty 11 with `max_types`.
pub fn block_types_for_difficulty(difficulty: Option<u32>, max_types: ColorId) -> ColorId {
    let difficulty = difficulty.unwrap_or(DEFAULT_DIFFICULTY);
    let max_types = max_types.max(MIN_BLOCK_TYPES);

    let t = ((f64::from(difficulty) - 1.0) / 10.0).clamp(0.0, 1.0);
    let min = f64::from(MIN_BLOCK_TYPES);
    let types = (min + (f64::from(max_types) - min) * t).round() as ColorId;

    types.clamp(MIN_BLOCK_TYPES, max_types)
}
