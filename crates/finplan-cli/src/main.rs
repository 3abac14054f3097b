mod commands;
mod config;
mod input;
mod output;
mod telemetry;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process;

use commands::assessment::{GatesArgs, RoadmapArgs, ScoreArgs};
use commands::debt::DebtPlanArgs;
use commands::pipeline::RunArgs;
use commands::strategies::{AssembleArgs, StrategiesArgs};
use commands::Context;
use config::PlannerConfig;
use telemetry::TelemetryConfig;

/// Household tax strategy, debt payoff and roadmap planning
#[derive(Parser)]
#[command(
    name = "finplan",
    version,
    about = "Household tax strategy, debt payoff and roadmap planning",
    long_about = "Reads a household assessment as JSON (file or stdin), evaluates \
                  eligibility gates, estimates tax strategies, simulates an avalanche \
                  debt payoff, scores financial health and builds a five-year roadmap."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// YAML file with gate thresholds and state parameters
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Tracing filter directive, e.g. `debug` or `finplan_core=trace`
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Planning date as YYYY-MM-DD (defaults to today)
    #[arg(long, global = true, value_parser = parse_date)]
    as_of: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate eligibility gates
    Gates(GatesArgs),
    /// Run every strategy calculator and rank the results
    Strategies(StrategiesArgs),
    /// Simulate an avalanche debt payoff against a minimum-only baseline
    DebtPlan(DebtPlanArgs),
    /// Compute the composite financial health score
    Score(ScoreArgs),
    /// Build the five-year roadmap
    Roadmap(RoadmapArgs),
    /// Assemble selected strategies into one action plan
    Assemble(AssembleArgs),
    /// Run the full planning pipeline
    Run(RunArgs),
    /// Print version information
    Version,
}

#[derive(Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got '{raw}': {e}"))
}

fn fail(err: impl std::fmt::Display) -> ! {
    eprintln!("{}: {}", "error".red().bold(), err);
    process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    if let Commands::Version = cli.command {
        println!("finplan {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let telemetry = TelemetryConfig {
        log_level: cli.log_level.clone(),
    };
    if let Err(e) = telemetry::init(&telemetry) {
        fail(e);
    }

    let config = match PlannerConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => fail(e),
    };
    let ctx = Context {
        config,
        as_of: cli
            .as_of
            .unwrap_or_else(|| chrono::Local::now().date_naive()),
    };
    tracing::debug!(as_of = %ctx.as_of, "planning context ready");

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Gates(args) => commands::assessment::run_gates(args, &ctx),
        Commands::Strategies(args) => commands::strategies::run_strategies(args, &ctx),
        Commands::DebtPlan(args) => commands::debt::run_debt_plan(args, &ctx),
        Commands::Score(args) => commands::assessment::run_score(args, &ctx),
        Commands::Roadmap(args) => commands::assessment::run_roadmap(args, &ctx),
        Commands::Assemble(args) => commands::strategies::run_assemble(args, &ctx),
        Commands::Run(args) => commands::pipeline::run_pipeline(args, &ctx),
        Commands::Version => return,
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => fail(e),
    }
}
