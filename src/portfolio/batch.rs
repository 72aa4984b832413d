use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::config::Config;
use crate::portfolio::{assess_project, ProjectAssessment, ProjectSpec};
use crate::ranking::ProjectAppraisal;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFailure {
    pub project_id: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BatchOutcome {
    pub assessments: Vec<ProjectAssessment>,
    pub failures: Vec<ProjectFailure>,
}

impl BatchOutcome {
    /// Assessments that carry an appraisal, ready for ranking.
    pub fn appraised(&self) -> Vec<ProjectAppraisal> {
        self.assessments
            .iter()
            .filter_map(ProjectAssessment::to_project_appraisal)
            .collect()
    }
}

/// Assesses every project on the blocking pool and waits for all of them.
///
/// Results come back in input order. A project that fails is recorded in
/// `failures` and does not stop the others.
pub async fn assess_portfolio(config: Arc<Config>, projects: Vec<ProjectSpec>) -> Result<BatchOutcome> {
    info!(projects = projects.len(), "assessing portfolio");
    let mut tasks = JoinSet::new();
    for (idx, project) in projects.into_iter().enumerate() {
        let config = Arc::clone(&config);
        tasks.spawn_blocking(move || {
            let outcome = assess_project(&project, &config);
            (idx, project.section.id, outcome)
        });
    }

    let mut finished = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        finished.push(joined.context("assessment task failed to complete")?);
    }
    finished.sort_by_key(|(idx, _, _)| *idx);

    let mut outcome = BatchOutcome::default();
    for (_, project_id, result) in finished {
        match result {
            Ok(assessment) => outcome.assessments.push(assessment),
            Err(err) => {
                warn!(project = %project_id, error = %err, "project assessment failed");
                outcome.failures.push(ProjectFailure {
                    project_id,
                    error: err.to_string(),
                });
            }
        }
    }
    info!(
        assessed = outcome.assessments.len(),
        failed = outcome.failures.len(),
        "portfolio assessment finished"
    );
    Ok(outcome)
}
