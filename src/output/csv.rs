use anyhow::Result;

use crate::appraisal::YearRecord;
use crate::portfolio::ProjectAssessment;
use crate::ranking::RankedProject;

pub fn condition_to_csv(assessments: &[ProjectAssessment]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "section",
        "category",
        "length_km",
        "intensity",
        "strength",
        "evenness",
        "rut",
        "friction",
        "work_type",
        "estimated_cost",
    ])?;
    for a in assessments {
        let c = &a.condition;
        writer.write_record([
            a.section.id.clone(),
            a.section.category.to_string(),
            format!("{:.3}", a.section.length_km),
            format!("{:.3}", c.intensity.coefficient),
            format!("{:.3}", c.strength.coefficient),
            format!("{:.3}", c.evenness.coefficient),
            format!("{:.3}", c.rut.coefficient),
            format!("{:.3}", c.friction.coefficient),
            a.work_type.as_slug().to_string(),
            format!("{:.2}", a.estimated_cost),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

/// All schedules under one header, one row per project year.
pub fn schedules_to_csv<'a>(
    schedules: impl IntoIterator<Item = (&'a str, &'a [YearRecord])>,
) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "section",
        "year",
        "calendar_year",
        "traffic",
        "capital_outlay",
        "maintenance_outlay",
        "benefit",
        "net_effect",
        "discount_factor",
        "discounted_value",
        "cumulative_enpv",
    ])?;
    for (project_id, records) in schedules {
        for r in records {
            writer.write_record([
                project_id.to_string(),
                r.year.to_string(),
                r.calendar_year.to_string(),
                format!("{:.0}", r.traffic),
                format!("{:.4}", r.capital_outlay),
                format!("{:.4}", r.maintenance_outlay),
                format!("{:.4}", r.benefit),
                format!("{:.4}", r.net_effect),
                format!("{:.6}", r.discount_factor),
                format!("{:.4}", r.discounted_value),
                format!("{:.4}", r.cumulative_enpv),
            ])?;
        }
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn ranking_to_csv(ranked: &[RankedProject]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["position", "podium", "section", "name", "bcr", "enpv", "eirr", "payback_years"])?;
    for r in ranked {
        writer.write_record([
            r.position.to_string(),
            r.podium.map(|p| p.to_string()).unwrap_or_default(),
            r.project_id.clone(),
            r.name.clone(),
            format!("{:.4}", r.bcr),
            format!("{:.4}", r.enpv),
            r.eirr.map(|v| format!("{v:.6}")).unwrap_or_default(),
            r.payback_years.map(|v| format!("{v:.2}")).unwrap_or_default(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}
