use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use road_appraisal::appraisal::sensitivity::{run_sensitivity, standard_scenarios};
use road_appraisal::appraisal::SensitivityReport;
use road_appraisal::config::{expand_tilde, Config, ConfigOverrides};
use road_appraisal::output::csv::{condition_to_csv, ranking_to_csv, schedules_to_csv};
use road_appraisal::output::json::render_json;
use road_appraisal::output::table::{
    render_appraisal_summary, render_condition_table, render_failures_table,
    render_ranking_table, render_schedule_table, render_sensitivity_table,
};
use road_appraisal::portfolio::batch::{assess_portfolio, BatchOutcome};
use road_appraisal::portfolio::Portfolio;
use road_appraisal::ranking::{rank_projects, RankedProject};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "road-appraisal",
    about = "Road condition assessment and economic appraisal"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[arg(long = "max-iterations")]
    max_iterations: Option<u32>,
    #[arg(long)]
    tolerance: Option<f64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Condition coefficients, required work and cost per section
    Condition {
        #[arg(short, long)]
        file: String,
    },
    /// Cash-flow schedule and appraisal summary
    Appraise {
        #[arg(short, long)]
        file: String,
        #[arg(long)]
        project: Option<String>,
    },
    /// Rank appraised projects
    Rank {
        #[arg(short, long)]
        file: String,
    },
    /// Stress the appraisal of one project
    Sensitivity {
        #[arg(short, long)]
        file: String,
        #[arg(long)]
        project: String,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(config_path.as_path()))?;
    config.apply_overrides(ConfigOverrides {
        max_iterations: cli.max_iterations,
        tolerance: cli.tolerance,
    });
    config.appraisal.validate()?;

    if matches!(cli.command, Commands::Config { .. }) {
        return handle_config_command(&cli.command, &config, &config_path);
    }

    let config = Arc::new(config);
    match &cli.command {
        Commands::Condition { file } => {
            let portfolio = load_portfolio(file)?;
            let outcome = assess_portfolio(Arc::clone(&config), portfolio.projects).await?;
            print_condition(&outcome, cli.output)?;
        }
        Commands::Appraise { file, project } => {
            let mut portfolio = load_portfolio(file)?;
            if let Some(id) = project {
                let selected = portfolio
                    .find(id)
                    .cloned()
                    .ok_or_else(|| anyhow!("project {id} not found in {file}"))?;
                portfolio.projects = vec![selected];
            }
            let outcome = assess_portfolio(Arc::clone(&config), portfolio.projects).await?;
            print_appraisals(&outcome, cli.output)?;
        }
        Commands::Rank { file } => {
            let portfolio = load_portfolio(file)?;
            let outcome = assess_portfolio(Arc::clone(&config), portfolio.projects).await?;
            let appraised = outcome.appraised();
            if appraised.is_empty() {
                warn!("no project in the portfolio carries appraisal input");
            }
            let ranked = rank_projects(&appraised);
            info!(ranked = ranked.len(), "ranking complete");
            print_ranking(&ranked, &outcome, cli.output)?;
        }
        Commands::Sensitivity { file, project } => {
            let portfolio = load_portfolio(file)?;
            let spec = portfolio
                .find(project)
                .ok_or_else(|| anyhow!("project {project} not found in {file}"))?;
            let input = spec
                .appraisal
                .as_ref()
                .ok_or_else(|| anyhow!("project {project} has no appraisal input"))?;
            let report = run_sensitivity(
                &spec.section,
                input,
                &config.appraisal,
                &standard_scenarios(),
            )?;
            print_sensitivity(&report, cli.output)?;
        }
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn load_portfolio(file: &str) -> Result<Portfolio> {
    let path = expand_tilde(file);
    let portfolio = Portfolio::load(&path)?;
    info!(
        projects = portfolio.projects.len(),
        path = %path.display(),
        "loaded portfolio"
    );
    Ok(portfolio)
}

fn handle_config_command(command: &Commands, config: &Config, config_path: &Path) -> Result<()> {
    let Commands::Config { init, show } = command else {
        return Ok(());
    };
    if *init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if *show || !*init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

fn print_failures(outcome: &BatchOutcome) {
    if !outcome.failures.is_empty() {
        eprintln!("{}", render_failures_table(&outcome.failures));
    }
}

fn print_condition(outcome: &BatchOutcome, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", render_condition_table(&outcome.assessments));
            print_failures(outcome);
        }
        OutputFormat::Json => println!("{}", render_json(outcome)?),
        OutputFormat::Csv => println!("{}", condition_to_csv(&outcome.assessments)?),
    }
    Ok(())
}

fn print_appraisals(outcome: &BatchOutcome, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            for assessment in &outcome.assessments {
                let Some(appraisal) = &assessment.appraisal else {
                    warn!("section {} has no appraisal input, skipping", assessment.section.id);
                    continue;
                };
                println!("{}", render_schedule_table(&appraisal.year_records));
                println!(
                    "{}",
                    render_appraisal_summary(&assessment.section.id, &appraisal.result)
                );
            }
            print_failures(outcome);
        }
        OutputFormat::Json => println!("{}", render_json(outcome)?),
        OutputFormat::Csv => {
            let schedules = outcome.assessments.iter().filter_map(|a| {
                a.appraisal
                    .as_ref()
                    .map(|appraisal| (a.section.id.as_str(), appraisal.year_records.as_slice()))
            });
            print!("{}", schedules_to_csv(schedules)?);
            print_failures(outcome);
        }
    }
    Ok(())
}

fn print_ranking(ranked: &[RankedProject], outcome: &BatchOutcome, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", render_ranking_table(ranked));
            print_failures(outcome);
        }
        OutputFormat::Json => println!("{}", render_json(ranked)?),
        OutputFormat::Csv => println!("{}", ranking_to_csv(ranked)?),
    }
    Ok(())
}

fn print_sensitivity(report: &SensitivityReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_sensitivity_table(report)),
        OutputFormat::Json => println!("{}", render_json(report)?),
        OutputFormat::Csv => {
            warn!("CSV output for sensitivity not implemented, using JSON");
            println!("{}", render_json(report)?);
        }
    }
    Ok(())
}
