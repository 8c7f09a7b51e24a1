use serde::{Deserialize, Serialize};

/// Body of `POST /v1/scores`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub inputs: Vec<String>,
}
