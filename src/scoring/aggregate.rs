use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::store::{CompetencyStore, JobRecord};

use super::params::ScoringParams;

/// Mean of the `k` largest values; fewer if there are fewer values, `0.0` if none.
///
/// ```
/// use skillmatch::scoring::top_k_mean;
///
/// assert_eq!(top_k_mean(&[0.2, 0.8, 0.5], 5), 0.5);
/// assert_eq!(top_k_mean(&[], 5), 0.0);
/// ```
pub fn top_k_mean(values: &[f32], k: usize) -> f32 {
    if values.is_empty() || k == 0 {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));
    let take = k.min(sorted.len());
    sorted[..take].iter().sum::<f32>() / take as f32
}

/// Groups per-competency scores by block and reduces each group with [`top_k_mean`].
///
/// `scores` is aligned with `store.records()`.
pub fn block_scores(
    store: &CompetencyStore,
    scores: &[f32],
    params: &ScoringParams,
) -> BTreeMap<String, f32> {
    let mut grouped: BTreeMap<&str, Vec<f32>> = BTreeMap::new();
    for (record, score) in store.records().iter().zip(scores) {
        grouped
            .entry(record.block_id.as_str())
            .or_default()
            .push(*score);
    }

    grouped
        .into_iter()
        .map(|(block, values)| (block.to_string(), top_k_mean(&values, params.block_top_k)))
        .collect()
}

/// Bonus-weighted average over the job's required blocks that have a score.
///
/// Blocks missing from `blocks` contribute nothing and do not count toward the
/// denominator. A job with no scored blocks averages `0.0`.
pub fn job_raw_score(
    job: &JobRecord,
    blocks: &BTreeMap<String, f32>,
    params: &ScoringParams,
) -> f32 {
    let (total, present) = job
        .required_blocks
        .iter()
        .filter_map(|block| blocks.get(block.trim()))
        .fold((0.0f32, 0usize), |(total, n), score| {
            (total + params.weighted(*score), n + 1)
        });

    if present == 0 {
        0.0
    } else {
        total / present as f32
    }
}
