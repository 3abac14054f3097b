use clap::Args;
use serde_json::Value;
use std::error::Error;

use finplan_core::gating::evaluate_gates_with;
use finplan_core::roadmap::build_five_year_roadmap;
use finplan_core::scoring::compute_score_with;

use super::{Context, IntakeArgs};

#[derive(Args)]
pub struct GatesArgs {
    #[command(flatten)]
    pub intake: IntakeArgs,
}

#[derive(Args)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub intake: IntakeArgs,
}

#[derive(Args)]
pub struct RoadmapArgs {
    #[command(flatten)]
    pub intake: IntakeArgs,
}

pub fn run_gates(args: GatesArgs, ctx: &Context) -> Result<Value, Box<dyn Error>> {
    let assessment = args.intake.load()?;
    let gates = evaluate_gates_with(&assessment, &ctx.config.thresholds);
    Ok(serde_json::to_value(gates)?)
}

pub fn run_score(args: ScoreArgs, ctx: &Context) -> Result<Value, Box<dyn Error>> {
    let assessment = args.intake.load()?;
    let gates = evaluate_gates_with(&assessment, &ctx.config.thresholds);
    Ok(serde_json::to_value(compute_score_with(&assessment, &gates))?)
}

pub fn run_roadmap(args: RoadmapArgs, ctx: &Context) -> Result<Value, Box<dyn Error>> {
    let assessment = args.intake.load()?;
    let gates = evaluate_gates_with(&assessment, &ctx.config.thresholds);
    let roadmap = build_five_year_roadmap(&assessment, &gates, ctx.as_of);
    Ok(serde_json::to_value(roadmap)?)
}
