//! Table row types.
//!
//! Field names follow the upstream table headers (`CompetencyID`, `Competency`, …) and
//! also accept snake_case aliases.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::clean::{clean_text, split_block_list};
use crate::hashing::hash_competency;

/// One competency of the taxonomy.
///
/// # Example
/// ```rust
/// use skillmatch::store::CompetencyRecord;
///
/// let record = CompetencyRecord::new("C1.1", "Design relational data models", "bloc_1", "Data Architecture");
/// assert_eq!(record.key(), CompetencyRecord::new("C1.1", "Design relational data models", "x", "y").key());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetencyRecord {
    #[serde(rename = "CompetencyID", alias = "id", deserialize_with = "lenient_string", default)]
    pub id: String,

    #[serde(rename = "Competency", alias = "text", deserialize_with = "lenient_string", default)]
    pub text: String,

    #[serde(rename = "BlockID", alias = "block_id", deserialize_with = "lenient_string", default)]
    pub block_id: String,

    #[serde(rename = "BlockName", alias = "block_name", deserialize_with = "lenient_string", default)]
    pub block_name: String,
}

impl CompetencyRecord {
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        block_id: impl Into<String>,
        block_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            block_id: block_id.into(),
            block_name: block_name.into(),
        }
    }

    /// Stable identifier derived from `(id, text)`.
    ///
    /// Block membership is deliberately excluded: moving a competency between blocks does
    /// not change its vector.
    pub fn key(&self) -> u64 {
        hash_competency(&self.id, &self.text)
    }

    pub(crate) fn cleaned(self) -> Self {
        Self {
            id: self.id.trim().to_string(),
            text: clean_text(&self.text),
            block_id: self.block_id.trim().to_string(),
            block_name: clean_text(&self.block_name),
        }
    }
}

/// A job and the competency blocks it requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(rename = "Job Title", alias = "JobTitle", alias = "title", deserialize_with = "lenient_string", default)]
    pub title: String,

    /// Ordered block ids; a `;`-separated string is accepted on input.
    #[serde(
        rename = "Required Competencies",
        alias = "RequiredCompetencyBlocks",
        alias = "required_blocks",
        deserialize_with = "block_list",
        default
    )]
    pub required_blocks: Vec<String>,
}

impl JobRecord {
    pub fn new<I, S>(title: impl Into<String>, required_blocks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            required_blocks: required_blocks.into_iter().map(Into::into).collect(),
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!(
            "expected a string or number, got {}",
            other
        ))),
    }
}

/// Malformed block lists become empty lists; such jobs score `0`.
fn block_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let blocks = match Value::deserialize(deserializer)? {
        Value::String(s) => split_block_list(&s),
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    };
    Ok(blocks)
}
