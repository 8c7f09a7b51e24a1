//! End-to-end profile analysis: enrich, score, then summarise.

pub mod error;


pub use error::AnalysisError;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::constants::EXPERT_THRESHOLD;
use crate::generation::CareerAdvisor;
use crate::scoring::{ScoreReport, ScoringEngine};

/// Free-text profile sections to analyse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub sections: Vec<String>,
    /// Rewrite short sections into full sentences before scoring.
    #[serde(default)]
    pub enrich: bool,
}

/// Scores plus generated advice for one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileAnalysis {
    /// Sections as scored (after enrichment, if requested).
    pub inputs: Vec<String>,
    pub report: ScoreReport,
    /// `block_id -> block name` for every scored block.
    pub block_names: BTreeMap<String, String>,
    /// Names of blocks above the expert threshold.
    pub key_blocks: Vec<String>,
    /// Absent when no job could be ranked.
    pub summary: Option<String>,
    /// Absent when no job could be ranked.
    pub plan: Option<String>,
}

/// Runs the full analysis flow over a shared engine and advisor.
#[derive(Debug, Clone)]
pub struct ProfileAnalyzer {
    engine: Arc<ScoringEngine>,
    advisor: Arc<CareerAdvisor>,
}

impl ProfileAnalyzer {
    pub fn new(engine: Arc<ScoringEngine>, advisor: Arc<CareerAdvisor>) -> Self {
        Self { engine, advisor }
    }

    #[instrument(skip(self, request), fields(sections = request.sections.len(), enrich = request.enrich))]
    pub async fn analyze(
        &self,
        request: AnalysisRequest,
    ) -> Result<ProfileAnalysis, AnalysisError> {
        let sections: Vec<String> = request
            .sections
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if sections.is_empty() {
            return Err(AnalysisError::EmptyProfile);
        }

        let inputs = if request.enrich {
            let mut enriched = Vec::with_capacity(sections.len());
            for section in &sections {
                enriched.push(self.advisor.enrich_statement(section).await);
            }
            enriched
        } else {
            sections
        };

        let engine = Arc::clone(&self.engine);
        let scored_inputs = inputs.clone();
        let report = tokio::task::spawn_blocking(move || engine.calculate_scores(&scored_inputs))
            .await
            .map_err(|e| AnalysisError::Task(e.to_string()))??;

        let block_names: BTreeMap<String, String> = report
            .block_scores
            .keys()
            .map(|block| (block.clone(), self.advisor.block_name(block).to_string()))
            .collect();

        let key_blocks: Vec<String> = report
            .strong_blocks(EXPERT_THRESHOLD)
            .into_iter()
            .map(|block| self.advisor.block_name(block).to_string())
            .collect();

        let (summary, plan) = match report.best_match() {
            Some(best) => {
                let summary = self
                    .advisor
                    .executive_summary(&inputs, &best.title, &key_blocks)
                    .await;
                let plan = self
                    .advisor
                    .progression_plan(&best.title, &report.block_scores)
                    .await;
                (Some(summary), Some(plan))
            }
            None => (None, None),
        };

        info!(
            inputs = inputs.len(),
            best = report.best_match().map(|m| m.title.as_str()),
            key_blocks = key_blocks.len(),
            "Profile analysed"
        );

        Ok(ProfileAnalysis {
            inputs,
            report,
            block_names,
            key_blocks,
            summary,
            plan,
        })
    }
}
