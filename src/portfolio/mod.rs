pub mod batch;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::appraisal::{appraise_project, Appraisal};
use crate::condition::{
    classify_work, compute_condition, CoefficientKind, DetailedTechnicalCondition, WorkType,
};
use crate::config::Config;
use crate::cost::estimate_section_cost;
use crate::error::EngineError;
use crate::ranking::ProjectAppraisal;
use crate::road::{Measurements, RoadSection};

pub use crate::appraisal::AppraisalInput;

/// Candidate projects read from a TOML or JSON file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Portfolio {
    #[serde(default)]
    pub projects: Vec<ProjectSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSpec {
    pub section: RoadSection,
    pub measurements: Measurements,
    #[serde(default)]
    pub appraisal: Option<AppraisalInput>,
}

impl Portfolio {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed reading portfolio: {}", path.display()))?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let portfolio = if is_json {
            serde_json::from_str(&data)
                .with_context(|| format!("failed parsing JSON portfolio: {}", path.display()))?
        } else {
            toml::from_str(&data)
                .with_context(|| format!("failed parsing TOML portfolio: {}", path.display()))?
        };
        Ok(portfolio)
    }

    pub fn find(&self, project_id: &str) -> Option<&ProjectSpec> {
        self.projects
            .iter()
            .find(|p| p.section.id.eq_ignore_ascii_case(project_id))
    }
}

/// Everything the engine derives for one section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectAssessment {
    pub section: RoadSection,
    pub condition: DetailedTechnicalCondition,
    pub work_type: WorkType,
    pub failing: Vec<CoefficientKind>,
    /// Thousands of currency units.
    pub estimated_cost: f64,
    pub appraisal: Option<Appraisal>,
}

impl ProjectAssessment {
    pub fn to_project_appraisal(&self) -> Option<ProjectAppraisal> {
        self.appraisal.as_ref().map(|appraisal| ProjectAppraisal {
            project_id: self.section.id.clone(),
            name: self.section.name.clone(),
            result: appraisal.result.clone(),
        })
    }
}

/// Condition, classification and cost, plus the appraisal when financial
/// input is present.
pub fn assess_project(project: &ProjectSpec, config: &Config) -> Result<ProjectAssessment, EngineError> {
    let section = &project.section;
    section.validate()?;

    let condition = compute_condition(section, &project.measurements, &config.methodology)?;
    let work_type = classify_work(&condition, &config.classifier);
    let failing = condition.failing(&config.classifier);
    let estimated_cost = estimate_section_cost(section, work_type, &config.costs)?;
    let appraisal = project
        .appraisal
        .as_ref()
        .map(|input| appraise_project(section, input, &config.appraisal))
        .transpose()?;

    Ok(ProjectAssessment {
        section: section.clone(),
        condition,
        work_type,
        failing,
        estimated_cost,
        appraisal,
    })
}
