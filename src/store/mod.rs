//! Validated competency and job tables.
//!
//! Both stores are produced by an upstream cleaning step and consumed read-only. Loading
//! applies the same light text normalisation as that step ([`clean_text`]) and drops rows
//! whose competency text ends up empty, so every record that reaches scoring has text.
//!
//! Missing or malformed files degrade to empty stores: [`CompetencyStore::load`] and
//! [`JobStore::load`] log the problem and return an empty table. Use the `try_load`
//! variants to observe the error instead.

pub mod clean;
pub mod error;
pub mod model;


pub use clean::{clean_text, split_block_list};
pub use error::{StoreError, StoreResult};
pub use model::{CompetencyRecord, JobRecord};

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, info, warn};

/// Ordered competency table.
///
/// Row order is preserved from the source but is not relied upon for vector identity:
/// every record carries its own [`CompetencyRecord::key`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompetencyStore {
    records: Vec<CompetencyRecord>,
}

impl CompetencyStore {
    /// Builds a store from records, cleaning text and dropping empty rows.
    pub fn from_records(records: Vec<CompetencyRecord>) -> Self {
        let total = records.len();
        let records: Vec<CompetencyRecord> = records
            .into_iter()
            .map(CompetencyRecord::cleaned)
            .filter(|r| !r.text.is_empty())
            .collect();

        let dropped = total - records.len();
        if dropped > 0 {
            debug!(dropped, kept = records.len(), "Dropped competencies with empty text");
        }

        Self { records }
    }

    /// Loads the table, degrading to an empty store on any error.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(store) => {
                info!(
                    path = %path.display(),
                    competencies = store.len(),
                    blocks = store.block_names().len(),
                    "Competency store loaded"
                );
                store
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Competency store unavailable, using empty store");
                Self::default()
            }
        }
    }

    /// Loads the table from a JSON array of records.
    pub fn try_load(path: &Path) -> StoreResult<Self> {
        let records: Vec<CompetencyRecord> = read_json_table(path)?;
        Ok(Self::from_records(records))
    }

    /// Returns the records in source order.
    pub fn records(&self) -> &[CompetencyRecord] {
        &self.records
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the stable key of every record, in source order.
    pub fn keys(&self) -> Vec<u64> {
        self.records.iter().map(CompetencyRecord::key).collect()
    }

    /// Maps `block_id -> block_name`; the first row of a block names it.
    pub fn block_names(&self) -> BTreeMap<String, String> {
        let mut names = BTreeMap::new();
        for record in &self.records {
            names
                .entry(record.block_id.clone())
                .or_insert_with(|| record.block_name.clone());
        }
        names
    }
}

/// Ordered job table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobStore {
    jobs: Vec<JobRecord>,
}

impl JobStore {
    /// Builds a store from records, dropping jobs without a title.
    pub fn from_records(jobs: Vec<JobRecord>) -> Self {
        let jobs = jobs
            .into_iter()
            .map(|mut job| {
                job.title = clean_text(&job.title);
                job
            })
            .filter(|job| !job.title.is_empty())
            .collect();
        Self { jobs }
    }

    /// Loads the table, degrading to an empty store on any error.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(store) => {
                info!(path = %path.display(), jobs = store.len(), "Job store loaded");
                store
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Job store unavailable, using empty store");
                Self::default()
            }
        }
    }

    /// Loads the table from a JSON array of records.
    pub fn try_load(path: &Path) -> StoreResult<Self> {
        let jobs: Vec<JobRecord> = read_json_table(path)?;
        Ok(Self::from_records(jobs))
    }

    /// Returns the jobs in source order.
    pub fn jobs(&self) -> &[JobRecord] {
        &self.jobs
    }

    /// Returns the number of jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Returns `true` if the store holds no jobs.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

fn read_json_table<T: serde::de::DeserializeOwned>(path: &Path) -> StoreResult<Vec<T>> {
    if !path.exists() {
        return Err(StoreError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| StoreError::Malformed {
        path: path.to_path_buf(),
        source: e,
    })
}
