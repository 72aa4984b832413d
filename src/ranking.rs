use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::appraisal::AppraisalResult;

/// An appraisal tagged with the project it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectAppraisal {
    pub project_id: String,
    pub name: String,
    pub result: AppraisalResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedProject {
    /// 1-based position in the ordering.
    pub position: usize,
    /// 1, 2 or 3 for the top three positions.
    pub podium: Option<u8>,
    pub project_id: String,
    pub name: String,
    pub bcr: f64,
    pub enpv: f64,
    pub eirr: Option<f64>,
    pub payback_years: Option<f64>,
}

/// Projects with BCR above 1 first, then by ENPV descending. Ties keep their
/// input order.
pub fn rank_projects(projects: &[ProjectAppraisal]) -> Vec<RankedProject> {
    let mut ordered: Vec<&ProjectAppraisal> = projects.iter().collect();
    ordered.sort_by(|a, b| compare(&a.result, &b.result));

    ordered
        .into_iter()
        .enumerate()
        .map(|(idx, project)| RankedProject {
            position: idx + 1,
            podium: podium_label(idx + 1),
            project_id: project.project_id.clone(),
            name: project.name.clone(),
            bcr: project.result.bcr,
            enpv: project.result.enpv,
            eirr: project.result.eirr,
            payback_years: project.result.payback_years,
        })
        .collect()
}

fn compare(a: &AppraisalResult, b: &AppraisalResult) -> Ordering {
    let a_viable = a.bcr > 1.0;
    let b_viable = b.bcr > 1.0;
    b_viable
        .cmp(&a_viable)
        .then_with(|| b.enpv.total_cmp(&a.enpv))
}

fn podium_label(position: usize) -> Option<u8> {
    match position {
        1 => Some(1),
        2 => Some(2),
        3 => Some(3),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appraisal::{BenefitBreakdown, EirrStatus};

    fn project(id: &str, bcr: f64, enpv: f64) -> ProjectAppraisal {
        ProjectAppraisal {
            project_id: id.to_string(),
            name: format!("Road {id}"),
            result: AppraisalResult {
                enpv,
                eirr: None,
                eirr_status: EirrStatus::NoSignChange,
                bcr,
                payback_years: None,
                total_discounted_benefits: 0.0,
                total_discounted_costs: 0.0,
                benefit_breakdown: BenefitBreakdown::default(),
            },
        }
    }

    fn ids(ranked: &[RankedProject]) -> Vec<&str> {
        ranked.iter().map(|r| r.project_id.as_str()).collect()
    }

    #[test]
    fn viable_projects_outrank_higher_enpv_non_viable_ones() {
        let ranked = rank_projects(&[
            project("a", 0.9, 500.0),
            project("b", 1.4, 20.0),
            project("c", 1.1, 80.0),
        ]);
        assert_eq!(ids(&ranked), vec!["c", "b", "a"]);
    }

    #[test]
    fn bcr_of_exactly_one_is_not_viable() {
        let ranked = rank_projects(&[project("a", 1.0, 10.0), project("b", 1.01, 1.0)]);
        assert_eq!(ids(&ranked), vec!["b", "a"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let ranked = rank_projects(&[
            project("first", 1.5, 10.0),
            project("second", 2.5, 10.0),
            project("third", 1.2, 10.0),
        ]);
        assert_eq!(ids(&ranked), vec!["first", "second", "third"]);
    }

    #[test]
    fn only_top_three_get_podium_labels() {
        let ranked = rank_projects(&[
            project("a", 2.0, 40.0),
            project("b", 2.0, 30.0),
            project("c", 2.0, 20.0),
            project("d", 2.0, 10.0),
        ]);
        let podiums: Vec<Option<u8>> = ranked.iter().map(|r| r.podium).collect();
        assert_eq!(podiums, vec![Some(1), Some(2), Some(3), None]);
        assert_eq!(ranked[3].position, 4);
    }

    #[test]
    fn empty_portfolio_ranks_nothing() {
        assert!(rank_projects(&[]).is_empty());
    }
}
