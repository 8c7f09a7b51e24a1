//! Career advice built on the generation cache.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use super::cache::GenerationCache;
use super::generator::TextGenerator;
use super::prompts::{
    PURPOSE_BIO, PURPOSE_ENRICH, PURPOSE_PLAN, bio_prompt, enrich_prompt, plan_prompt,
};
use crate::constants::{ENRICH_MAX_WORDS, WEAK_BLOCK_THRESHOLD};

/// Name used for a weak block missing from the block-name table.
pub const FALLBACK_BLOCK_NAME: &str = "General technical competencies";

/// Plan targets used when no block is weak.
pub const ADVANCED_TARGETS: [&str; 2] = ["Technical leadership", "Enterprise architecture"];

/// Enrichment, executive summary and progression plan.
pub struct CareerAdvisor {
    cache: Arc<GenerationCache>,
    generator: Arc<dyn TextGenerator>,
    block_names: BTreeMap<String, String>,
    weak_threshold: f32,
}

impl std::fmt::Debug for CareerAdvisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CareerAdvisor")
            .field("generator", &self.generator.name())
            .field("blocks", &self.block_names.len())
            .field("weak_threshold", &self.weak_threshold)
            .finish()
    }
}

impl CareerAdvisor {
    pub fn new(
        cache: Arc<GenerationCache>,
        generator: Arc<dyn TextGenerator>,
        block_names: BTreeMap<String, String>,
    ) -> Self {
        Self {
            cache,
            generator,
            block_names,
            weak_threshold: WEAK_BLOCK_THRESHOLD,
        }
    }

    pub fn generator(&self) -> &dyn TextGenerator {
        self.generator.as_ref()
    }

    pub fn cache(&self) -> &GenerationCache {
        &self.cache
    }

    /// Display name of a block.
    pub fn block_name<'a>(&'a self, block_id: &'a str) -> &'a str {
        self.block_names
            .get(block_id)
            .map(String::as_str)
            .unwrap_or(block_id)
    }

    /// Rewrites a short statement into a full competency sentence.
    ///
    /// Statements longer than six words are returned unchanged without a generator
    /// call. If generation fails the original statement is kept.
    pub async fn enrich_statement(&self, statement: &str) -> String {
        if statement.split_whitespace().count() > ENRICH_MAX_WORDS {
            return statement.to_string();
        }

        match self
            .cache
            .try_get_or_generate(&enrich_prompt(statement), PURPOSE_ENRICH, self.generator.as_ref())
            .await
        {
            Ok(enriched) => enriched,
            Err(e) => {
                debug!(error = %e, "Enrichment unavailable, keeping original statement");
                statement.to_string()
            }
        }
    }

    /// Short third-person bio oriented toward `target_job`.
    pub async fn executive_summary(
        &self,
        inputs: &[String],
        target_job: &str,
        key_blocks: &[String],
    ) -> String {
        let prompt = bio_prompt(inputs, target_job, key_blocks);
        self.cache
            .get_or_generate(&prompt, PURPOSE_BIO, self.generator.as_ref())
            .await
    }

    /// Three-step plan closing the weak blocks for `target_job`.
    pub async fn progression_plan(
        &self,
        target_job: &str,
        block_scores: &BTreeMap<String, f32>,
    ) -> String {
        let prompt = plan_prompt(target_job, &self.gaps(block_scores));
        self.cache
            .get_or_generate(&prompt, PURPOSE_PLAN, self.generator.as_ref())
            .await
    }

    /// Names of blocks scoring below the weak threshold, or the advanced targets when
    /// none are weak.
    pub fn gaps(&self, block_scores: &BTreeMap<String, f32>) -> Vec<String> {
        let weak: Vec<String> = block_scores
            .iter()
            .filter(|(_, score)| **score < self.weak_threshold)
            .map(|(block, _)| {
                self.block_names
                    .get(block)
                    .cloned()
                    .unwrap_or_else(|| FALLBACK_BLOCK_NAME.to_string())
            })
            .collect();

        if weak.is_empty() {
            ADVANCED_TARGETS.iter().map(|s| s.to_string()).collect()
        } else {
            weak
        }
    }
}
