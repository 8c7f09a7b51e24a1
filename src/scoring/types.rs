use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One ranked job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMatch {
    pub title: String,
    /// Bonus-weighted block average before normalisation. May exceed `1.0`.
    pub raw_score: f32,
    /// Normalised score in `[0, 1]`; ranking key.
    pub score: f32,
    /// `score` as a percentage with one decimal (`"87.5%"`).
    pub display_percent: String,
}

impl JobMatch {
    pub fn new(title: impl Into<String>, raw_score: f32, score: f32) -> Self {
        Self {
            title: title.into(),
            raw_score,
            score,
            display_percent: format!("{:.1}%", score * 100.0),
        }
    }
}

/// A competency and its max-pooled similarity to the profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetencyMatch {
    pub competency_id: String,
    pub text: String,
    pub score: f32,
    pub block_id: String,
    pub block_name: String,
}

/// Result of scoring one profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// `block_id -> score in [0, 1]`, ordered by block id.
    pub block_scores: BTreeMap<String, f32>,
    /// Jobs by descending score; ties keep job-table order.
    pub job_matches: Vec<JobMatch>,
    /// Highest-scoring competencies, best first.
    pub top_competencies: Vec<CompetencyMatch>,
}

impl ScoreReport {
    /// The empty report returned for blank input or empty tables.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.block_scores.is_empty() && self.job_matches.is_empty()
    }

    /// Highest-ranked job, if any.
    pub fn best_match(&self) -> Option<&JobMatch> {
        self.job_matches.first()
    }

    /// Block ids scoring strictly above `threshold`, in block order.
    pub fn strong_blocks(&self, threshold: f32) -> Vec<&str> {
        self.block_scores
            .iter()
            .filter(|(_, score)| **score > threshold)
            .map(|(block, _)| block.as_str())
            .collect()
    }

    /// Block ids scoring strictly below `threshold`, in block order.
    pub fn weak_blocks(&self, threshold: f32) -> Vec<&str> {
        self.block_scores
            .iter()
            .filter(|(_, score)| **score < threshold)
            .map(|(block, _)| block.as_str())
            .collect()
    }
}
