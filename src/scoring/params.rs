use crate::constants::{
    BLOCK_TOP_K, EXPERT_BONUS, EXPERT_THRESHOLD, NORMALIZATION_MULTIPLIER, TOP_COMPETENCY_COUNT,
};

/// Calibration of the scoring pipeline.
///
/// Defaults are the constants in [`crate::constants`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringParams {
    /// Competencies averaged per block.
    pub block_top_k: usize,
    /// Block score a job requirement must exceed (strictly) to earn the bonus.
    pub expert_threshold: f32,
    /// Multiplier applied to block scores above `expert_threshold`.
    pub expert_bonus: f32,
    /// Rescaling of the raw job average before clamping to `1.0`.
    pub normalization_multiplier: f32,
    /// Competencies reported in the top-competency detail.
    pub top_competency_count: usize,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            block_top_k: BLOCK_TOP_K,
            expert_threshold: EXPERT_THRESHOLD,
            expert_bonus: EXPERT_BONUS,
            normalization_multiplier: NORMALIZATION_MULTIPLIER,
            top_competency_count: TOP_COMPETENCY_COUNT,
        }
    }
}

impl ScoringParams {
    /// Applies the expert bonus to a single block score.
    #[inline]
    pub fn weighted(&self, block_score: f32) -> f32 {
        if block_score > self.expert_threshold {
            block_score * self.expert_bonus
        } else {
            block_score
        }
    }

    /// Maps a raw job average to the ranking score.
    #[inline]
    pub fn normalize(&self, raw: f32) -> f32 {
        (raw * self.normalization_multiplier).min(1.0)
    }
}
