//! Test fixtures for integration tests.

use std::path::{Path, PathBuf};

use serde_json::{Value, json};

pub const DATA_COMPETENCY_ID: &str = "C1.1";
pub const DATA_COMPETENCY_TEXT: &str = "Design relational data models for analytical workloads";
pub const WEB_COMPETENCY_TEXT: &str = "Build responsive web interfaces with accessible components";

/// Competency table in the source header layout (`CompetencyID`, `Competency`, ...).
pub fn competency_table() -> Value {
    json!([
        {
            "CompetencyID": DATA_COMPETENCY_ID,
            "Competency": DATA_COMPETENCY_TEXT,
            "BlockID": "bloc_1",
            "BlockName": "Data Engineering"
        },
        {
            "CompetencyID": "C1.2",
            "Competency": "Orchestrate batch pipelines and schedule data loads",
            "BlockID": "bloc_1",
            "BlockName": "Data Engineering"
        },
        {
            "CompetencyID": "C1.3",
            "Competency": "Monitor data quality with automated checks",
            "BlockID": "bloc_1",
            "BlockName": "Data Engineering"
        },
        {
            "CompetencyID": "C2.1",
            "Competency": WEB_COMPETENCY_TEXT,
            "BlockID": "bloc_2",
            "BlockName": "Web Development"
        },
        {
            "CompetencyID": "C2.2",
            "Competency": "Write end-to-end browser tests for user journeys",
            "BlockID": "bloc_2",
            "BlockName": "Web Development"
        },
        {
            "CompetencyID": "C3.1",
            "Competency": "Train and evaluate supervised learning models",
            "BlockID": "bloc_3",
            "BlockName": "Machine Learning"
        }
    ])
}

/// Job table with one block list as a string and one as an array.
pub fn job_table() -> Value {
    json!([
        {
            "Job Title": "Data Engineer",
            "Required Competencies": "bloc_1; bloc_3"
        },
        {
            "Job Title": "Frontend Developer",
            "Required Competencies": ["bloc_2"]
        },
        {
            "Job Title": "Full-Stack Data Developer",
            "Required Competencies": "bloc_1;bloc_2"
        }
    ])
}

pub struct TablePaths {
    pub competencies: PathBuf,
    pub jobs: PathBuf,
}

/// Writes both tables under `dir` and returns their paths.
pub fn write_tables(dir: &Path) -> TablePaths {
    let competencies = dir.join("competencies.json");
    let jobs = dir.join("jobs.json");

    std::fs::write(
        &competencies,
        serde_json::to_vec_pretty(&competency_table()).expect("serialize competencies"),
    )
    .expect("write competencies");
    std::fs::write(
        &jobs,
        serde_json::to_vec_pretty(&job_table()).expect("serialize jobs"),
    )
    .expect("write jobs");

    TablePaths { competencies, jobs }
}

/// All score fields of a report lie in `[0, 1]`.
pub fn assert_scores_bounded(report: &skillmatch::ScoreReport) {
    for (block, score) in &report.block_scores {
        assert!(
            (0.0..=1.0).contains(score),
            "block {} score {} out of range",
            block,
            score
        );
    }
    for job in &report.job_matches {
        assert!(
            (0.0..=1.0).contains(&job.score),
            "job {} score {} out of range",
            job.title,
            job.score
        );
    }
    for competency in &report.top_competencies {
        assert!((0.0..=1.0).contains(&competency.score));
    }
}
