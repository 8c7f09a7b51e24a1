//! Profile scoring and job ranking.
//!
//! For a list of free-text statements:
//!
//! 1. Each statement is embedded and compared (cosine) with every competency.
//! 2. Each competency keeps its best match over all statements (max-pool).
//! 3. Each block scores the mean of its `k` best competencies ([`top_k_mean`]).
//! 4. Each job averages the blocks it requires that exist, with an expert bonus for
//!    blocks above the threshold, then is rescaled and capped at `1.0`.
//!
//! Jobs are ranked by the rescaled score. See [`ScoringParams`] for the calibration.

pub mod aggregate;
pub mod engine;
pub mod error;
pub mod params;
pub mod similarity;
pub mod types;


pub use aggregate::{block_scores, job_raw_score, top_k_mean};
pub use engine::ScoringEngine;
pub use error::ScoringError;
pub use params::ScoringParams;
pub use similarity::{cosine, max_pool};
pub use types::{CompetencyMatch, JobMatch, ScoreReport};
