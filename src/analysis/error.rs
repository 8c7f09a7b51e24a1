use thiserror::Error;

use crate::scoring::ScoringError;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("profile has no non-blank section")]
    EmptyProfile,

    #[error("scoring failed: {0}")]
    Scoring(#[from] ScoringError),

    #[error("scoring task failed: {0}")]
    Task(String),
}
