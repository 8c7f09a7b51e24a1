use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::embedding::Embedder;
use crate::index::EmbeddingCache;
use crate::store::{CompetencyStore, JobStore};

use super::aggregate::{block_scores, job_raw_score};
use super::error::ScoringError;
use super::params::ScoringParams;
use super::similarity::max_pool;
use super::types::{CompetencyMatch, JobMatch, ScoreReport};

/// Scores free-text profiles against the competency taxonomy and ranks jobs.
///
/// Synchronous and CPU-bound; async callers should run it on a blocking thread.
pub struct ScoringEngine {
    embedder: Arc<dyn Embedder>,
    cache: Arc<EmbeddingCache>,
    competencies: Arc<CompetencyStore>,
    jobs: Arc<JobStore>,
    params: ScoringParams,
}

impl std::fmt::Debug for ScoringEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringEngine")
            .field("model_id", &self.embedder.model_id())
            .field("competencies", &self.competencies.len())
            .field("jobs", &self.jobs.len())
            .field("params", &self.params)
            .finish()
    }
}

impl ScoringEngine {
    /// `cache` must have been built over the same embedder.
    pub fn new(
        embedder: Arc<dyn Embedder>,
        cache: Arc<EmbeddingCache>,
        competencies: Arc<CompetencyStore>,
        jobs: Arc<JobStore>,
    ) -> Self {
        Self {
            embedder,
            cache,
            competencies,
            jobs,
            params: ScoringParams::default(),
        }
    }

    pub fn with_params(mut self, params: ScoringParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &ScoringParams {
        &self.params
    }

    pub fn competencies(&self) -> &CompetencyStore {
        &self.competencies
    }

    pub fn jobs(&self) -> &JobStore {
        &self.jobs
    }

    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }

    /// Builds or loads the competency vectors ahead of the first request.
    pub fn warm_up(&self) -> Result<usize, ScoringError> {
        Ok(self.cache.ensure(&self.competencies)?.len())
    }

    /// Scores `inputs` (one free-text statement each).
    ///
    /// Blank statements are ignored. With no usable input, or an empty competency
    /// table, the empty report is returned rather than an error.
    pub fn calculate_scores<S: AsRef<str>>(
        &self,
        inputs: &[S],
    ) -> Result<ScoreReport, ScoringError> {
        let inputs: Vec<&str> = inputs
            .iter()
            .map(AsRef::as_ref)
            .filter(|s| !s.trim().is_empty())
            .collect();

        if inputs.is_empty() || self.competencies.is_empty() {
            debug!(
                inputs = inputs.len(),
                competencies = self.competencies.len(),
                "Nothing to score"
            );
            return Ok(ScoreReport::empty());
        }

        let started = Instant::now();
        let vectors = self.cache.ensure(&self.competencies)?;
        let competency_vectors =
            vectors
                .aligned(&self.competencies)
                .ok_or_else(|| ScoringError::ComputationFailed {
                    reason: "competency vectors do not cover the store".to_string(),
                })?;

        let input_vectors = self.embedder.encode(&inputs)?;
        if input_vectors.len() != inputs.len() {
            return Err(ScoringError::ComputationFailed {
                reason: format!(
                    "embedder returned {} vectors for {} inputs",
                    input_vectors.len(),
                    inputs.len()
                ),
            });
        }

        let scores = max_pool(&input_vectors, &competency_vectors);
        let block_scores = block_scores(&self.competencies, &scores, &self.params);
        let job_matches = self.rank_jobs(&block_scores);
        let top_competencies = self.top_competencies(&scores);

        info!(
            inputs = inputs.len(),
            blocks = block_scores.len(),
            jobs = job_matches.len(),
            best = job_matches.first().map(|m| m.score),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Profile scored"
        );

        Ok(ScoreReport {
            block_scores,
            job_matches,
            top_competencies,
        })
    }

    fn rank_jobs(&self, blocks: &std::collections::BTreeMap<String, f32>) -> Vec<JobMatch> {
        let mut matches: Vec<JobMatch> = self
            .jobs
            .jobs()
            .iter()
            .map(|job| {
                let raw = job_raw_score(job, blocks, &self.params);
                JobMatch::new(job.title.clone(), raw, self.params.normalize(raw))
            })
            .collect();

        // Stable: equal scores keep job-table order.
        matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        matches
    }

    fn top_competencies(&self, scores: &[f32]) -> Vec<CompetencyMatch> {
        let mut ranked: Vec<(usize, f32)> = scores.iter().copied().enumerate().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        ranked.truncate(self.params.top_competency_count);

        let records = self.competencies.records();
        ranked
            .into_iter()
            .map(|(idx, score)| {
                let record = &records[idx];
                CompetencyMatch {
                    competency_id: record.id.clone(),
                    text: record.text.clone(),
                    score,
                    block_id: record.block_id.clone(),
                    block_name: record.block_name.clone(),
                }
            })
            .collect()
    }
}
