use clap::Args;
use serde_json::Value;
use std::error::Error;

use finplan_core::engine::{run_planning_engine, PlanningInput};

use super::{parse_codes, Context, IntakeArgs};

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub intake: IntakeArgs,

    /// Comma-separated strategy codes to assemble
    #[arg(long)]
    pub select: Option<String>,
}

/// Full planning run wrapped in the metadata envelope.
pub fn run_pipeline(args: RunArgs, ctx: &Context) -> Result<Value, Box<dyn Error>> {
    let input = PlanningInput {
        intake: args.intake.load_intake()?,
        state_params: ctx.config.state_params.clone(),
        thresholds: ctx.config.thresholds.clone(),
        selected: args.select.as_deref().map(parse_codes).unwrap_or_default(),
        as_of: ctx.as_of,
    };
    let output = run_planning_engine(&input)?;
    Ok(serde_json::to_value(output)?)
}
