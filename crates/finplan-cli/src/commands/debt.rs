use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::error::Error;

use finplan_core::debt::simulate_debt_plan;

use super::{Context, IntakeArgs};

#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct DebtPlanArgs {
    #[command(flatten)]
    pub intake: IntakeArgs,

    /// Monthly surplus to use instead of the assessment's cash flow
    #[arg(long)]
    pub surplus: Option<Decimal>,

    /// Include the month-by-month balance schedule
    #[arg(long)]
    pub schedule: bool,
}

pub fn run_debt_plan(args: DebtPlanArgs, ctx: &Context) -> Result<Value, Box<dyn Error>> {
    let assessment = args.intake.load()?;
    let surplus = args.surplus.unwrap_or(assessment.cashflow.monthly_surplus);

    let Some(mut plan) = simulate_debt_plan(&assessment.debts, surplus, ctx.as_of) else {
        return Ok(json!({ "message": "No debts with a positive balance and minimum payment" }));
    };
    if !args.schedule {
        plan.schedule.clear();
    }
    Ok(serde_json::to_value(plan)?)
}
