use clap::Args;
use serde_json::{json, Value};
use std::error::Error;

use finplan_core::gating::evaluate_gates_with;
use finplan_core::ranking::{rank, rank_and_assemble};
use finplan_core::strategies::{run_calculators, StrategyOutcome};

use super::{parse_codes, Context, IntakeArgs};

#[derive(Args)]
pub struct StrategiesArgs {
    #[command(flatten)]
    pub intake: IntakeArgs,

    /// Only list strategies that produced an estimate
    #[arg(long)]
    pub eligible_only: bool,
}

#[derive(Args)]
pub struct AssembleArgs {
    #[command(flatten)]
    pub intake: IntakeArgs,

    /// Comma-separated strategy codes (defaults to the assessment's own
    /// selection, then to every eligible strategy)
    #[arg(long)]
    pub select: Option<String>,
}

fn evaluate(intake: &IntakeArgs, ctx: &Context) -> Result<(Vec<StrategyOutcome>, Vec<String>), Box<dyn Error>> {
    let assessment = intake.load()?;
    let gates = evaluate_gates_with(&assessment, &ctx.config.thresholds);
    let outcomes = run_calculators(&assessment, &gates, &ctx.config.state_params, ctx.as_of);
    Ok((outcomes, assessment.selected_strategies))
}

/// One summary row per calculator, ranked.
pub fn run_strategies(args: StrategiesArgs, ctx: &Context) -> Result<Value, Box<dyn Error>> {
    let (outcomes, _) = evaluate(&args.intake, ctx)?;
    let rows: Vec<Value> = rank(&outcomes)
        .iter()
        .filter(|o| !args.eligible_only || o.is_eligible())
        .map(|o| {
            let estimate = o.estimate.as_ref();
            json!({
                "code": o.code,
                "title": o.title,
                "eligible": o.is_eligible(),
                "annualized_savings": o.annualized_savings(),
                "cash_outlay_est": estimate.and_then(|e| e.cash_outlay_est),
                "risk_score": estimate.map(|e| e.risk_score),
                "complexity": estimate.map(|e| e.complexity),
            })
        })
        .collect();
    Ok(json!({ "strategies": rows }))
}

pub fn run_assemble(args: AssembleArgs, ctx: &Context) -> Result<Value, Box<dyn Error>> {
    let (outcomes, own_selection) = evaluate(&args.intake, ctx)?;
    let selected = match args.select.as_deref() {
        Some(raw) => parse_codes(raw),
        None => own_selection,
    };
    let plan = rank_and_assemble(&outcomes, &selected);
    if !plan.dropped_codes.is_empty() {
        tracing::warn!(dropped = ?plan.dropped_codes, "selected strategies without an estimate");
    }
    Ok(serde_json::to_value(plan)?)
}
