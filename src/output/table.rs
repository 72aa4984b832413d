use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::appraisal::{AppraisalResult, EirrStatus, SensitivityReport, YearRecord};
use crate::condition::{CoefficientReading, WorkType};
use crate::portfolio::batch::ProjectFailure;
use crate::portfolio::ProjectAssessment;
use crate::ranking::RankedProject;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn coefficient_cell(reading: &CoefficientReading, failing: bool) -> Cell {
    let cell = Cell::new(format!("{:.3}", reading.coefficient));
    if failing {
        cell.fg(Color::Red)
    } else {
        cell.fg(Color::Green)
    }
}

fn work_cell(work_type: WorkType) -> Cell {
    let color = match work_type {
        WorkType::NoWorkNeeded => Color::Green,
        WorkType::CurrentRepair => Color::Yellow,
        WorkType::CapitalRepair => Color::DarkYellow,
        WorkType::Reconstruction => Color::Red,
    };
    Cell::new(work_type.to_string()).fg(color)
}

fn optional(value: Option<f64>, precision: usize) -> String {
    value
        .map(|v| format!("{v:.precision$}"))
        .unwrap_or_else(|| "-".to_string())
}

pub fn render_condition_table(assessments: &[ProjectAssessment]) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "Section",
        "Cat.",
        "Km",
        "Intensity",
        "Strength",
        "Evenness",
        "Rut",
        "Friction",
        "Work",
        "Cost (k)",
        "Flags",
    ]);

    for a in assessments {
        let c = &a.condition;
        let mut cells = vec![
            Cell::new(&a.section.id),
            Cell::new(a.section.category.to_string()),
            Cell::new(format!("{:.1}", a.section.length_km)),
        ];
        for reading in c.readings() {
            cells.push(coefficient_cell(reading, a.failing.contains(&reading.kind)));
        }
        cells.push(work_cell(a.work_type));
        cells.push(Cell::new(format!("{:.0}", a.estimated_cost)));
        cells.push(Cell::new(a.section.strategic_flags().join(", ")));
        table.add_row(Row::from(cells));
    }
    table.to_string()
}

pub fn render_schedule_table(records: &[YearRecord]) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "Year",
        "Calendar",
        "Traffic",
        "Capital",
        "Maintenance",
        "Benefit",
        "Net effect",
        "Discount factor",
        "Discounted",
        "Cumulative ENPV",
    ]);
    for r in records {
        let cumulative = Cell::new(format!("{:.2}", r.cumulative_enpv));
        let cumulative = if r.cumulative_enpv < 0.0 {
            cumulative.fg(Color::Red)
        } else {
            cumulative.fg(Color::Green)
        };
        table.add_row(Row::from(vec![
            Cell::new(r.year),
            Cell::new(r.calendar_year),
            Cell::new(format!("{:.0}", r.traffic)),
            Cell::new(format!("{:.2}", r.capital_outlay)),
            Cell::new(format!("{:.2}", r.maintenance_outlay)),
            Cell::new(format!("{:.2}", r.benefit)),
            Cell::new(format!("{:.2}", r.net_effect)),
            Cell::new(format!("{:.4}", r.discount_factor)),
            Cell::new(format!("{:.2}", r.discounted_value)),
            cumulative,
        ]));
    }
    table.to_string()
}

pub fn render_appraisal_summary(project_id: &str, result: &AppraisalResult) -> String {
    let mut table = new_table();
    table.set_header(vec!["Metric", "Value"]);
    let eirr = match result.eirr_status {
        EirrStatus::Converged { .. } => optional(result.eirr.map(|r| r * 100.0), 2) + " %",
        EirrStatus::NoSignChange => "undefined (no sign change)".to_string(),
        EirrStatus::BracketOverflow => "undefined (NPV overflows in search bracket)".to_string(),
        EirrStatus::NonConvergent { iterations, .. } => {
            format!("undefined (no convergence after {iterations} iterations)")
        }
    };
    let b = &result.benefit_breakdown;
    let rows = vec![
        ("Section", project_id.to_string()),
        ("ENPV", format!("{:.2}", result.enpv)),
        ("EIRR", eirr),
        ("BCR", format!("{:.3}", result.bcr)),
        ("Payback (years)", optional(result.payback_years, 2)),
        ("Discounted benefits", format!("{:.2}", result.total_discounted_benefits)),
        ("Discounted costs", format!("{:.2}", result.total_discounted_costs)),
        ("  vehicle fleet", format!("{:.2}", b.vehicle_fleet)),
        ("  transport cost", format!("{:.2}", b.transport_cost)),
        ("  accident reduction", format!("{:.2}", b.accident_reduction)),
        ("  environmental", format!("{:.2}", b.environmental)),
    ];
    for (metric, value) in rows {
        table.add_row(vec![metric.to_string(), value]);
    }
    table.to_string()
}

pub fn render_ranking_table(ranked: &[RankedProject]) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "Rank", "Section", "Name", "BCR", "ENPV", "EIRR %", "Payback",
    ]);
    for r in ranked {
        let rank = match r.podium {
            Some(p) => Cell::new(format!("#{p}")).fg(Color::Green),
            None => Cell::new(r.position),
        };
        let bcr = Cell::new(format!("{:.3}", r.bcr));
        let bcr = if r.bcr > 1.0 {
            bcr.fg(Color::Green)
        } else {
            bcr.fg(Color::Red)
        };
        table.add_row(Row::from(vec![
            rank,
            Cell::new(&r.project_id),
            Cell::new(&r.name),
            bcr,
            Cell::new(format!("{:.2}", r.enpv)),
            Cell::new(optional(r.eirr.map(|v| v * 100.0), 2)),
            Cell::new(optional(r.payback_years, 2)),
        ]));
    }
    table.to_string()
}

pub fn render_sensitivity_table(report: &SensitivityReport) -> String {
    let mut table = new_table();
    table.set_header(vec!["Scenario", "ENPV", "Change", "BCR", "EIRR %", "Viable"]);
    table.add_row(vec![
        "baseline".to_string(),
        format!("{:.2}", report.baseline.enpv),
        "-".to_string(),
        format!("{:.3}", report.baseline.bcr),
        optional(report.baseline.eirr.map(|v| v * 100.0), 2),
        (report.baseline.bcr > 1.0).to_string(),
    ]);
    for o in &report.outcomes {
        table.add_row(vec![
            o.label.clone(),
            format!("{:.2}", o.enpv),
            format!("{:+.2}", o.enpv_delta),
            format!("{:.3}", o.bcr),
            optional(o.eirr.map(|v| v * 100.0), 2),
            o.still_viable.to_string(),
        ]);
    }
    table.to_string()
}

pub fn render_failures_table(failures: &[ProjectFailure]) -> String {
    let mut table = new_table();
    table.set_header(vec!["Section", "Error"]);
    for f in failures {
        table.add_row(vec![
            Cell::new(&f.project_id),
            Cell::new(&f.error).fg(Color::Red),
        ]);
    }
    table.to_string()
}
