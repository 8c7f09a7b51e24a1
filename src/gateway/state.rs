use std::sync::Arc;

use crate::analysis::ProfileAnalyzer;
use crate::generation::CareerAdvisor;
use crate::scoring::ScoringEngine;

#[derive(Clone)]
pub struct HandlerState {
    pub engine: Arc<ScoringEngine>,

    pub advisor: Arc<CareerAdvisor>,

    pub analyzer: ProfileAnalyzer,

    /// `"model"` or `"stub"`; reported by `/ready`.
    pub embedder_mode: &'static str,
}

impl HandlerState {
    pub fn new(
        engine: Arc<ScoringEngine>,
        advisor: Arc<CareerAdvisor>,
        embedder_mode: &'static str,
    ) -> Self {
        let analyzer = ProfileAnalyzer::new(Arc::clone(&engine), Arc::clone(&advisor));
        Self {
            engine,
            advisor,
            analyzer,
            embedder_mode,
        }
    }
}
