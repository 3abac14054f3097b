use rust_decimal::Decimal;

use crate::strategies::context::AssessmentContext;
use crate::strategies::estimate::StrategyEstimate;
use crate::tax_tables;

pub const PTET_ELECTION: &str = "ptet_election";

/// State tax on pass-through income paid at the entity level becomes a
/// business deduction instead of a capped itemized one. The benefit is the
/// portion that would not otherwise have been deducted.
///
/// When the state's top individual rate exceeds the entity-level rate, the
/// owner still owes the difference personally; that residual is flagged and
/// gets its own step.
pub fn ptet_election(ctx: &AssessmentContext<'_>) -> Option<StrategyEstimate> {
    if !ctx.gates.pass_through_election_eligible {
        return None;
    }
    let a = ctx.assessment;
    let state = a.profile.state.as_str();
    let params = ctx.state()?;
    let ptet_rate = ctx.state_params.ptet_rate(state)?;

    let pass_through = a.income.pass_through_total();
    let state_tax = (pass_through * ptet_rate).round_dp(0);
    if state_tax <= Decimal::ZERO {
        return None;
    }

    let deductible_without = if ctx.gates.itemize_likely {
        let cap = tax_tables::salt_cap(a.profile.filing_status);
        let room = (cap - a.itemized.state_and_local_taxes).max(Decimal::ZERO);
        room.min(state_tax)
    } else {
        Decimal::ZERO
    };
    let newly_deductible = state_tax - deductible_without;
    if newly_deductible <= Decimal::ZERO {
        return None;
    }

    let residual_rate = (params.top_income_tax_rate - ptet_rate).max(Decimal::ZERO);
    let residual_state_tax = (pass_through * residual_rate).round_dp(0);

    let rate = ctx.marginal_rate();
    let estimate = StrategyEstimate::new(PTET_ELECTION, newly_deductible * rate)
        .risk(2)
        .complexity(2)
        .step(
            format!("Confirm {state} election deadline and estimated payment schedule"),
            None,
        )
        .step("File the state PTET election", ctx.next_deadline(3, 15))
        .step("Make entity-level estimated payments", None)
        .flag("state", state)
        .flag("ptet_rate", ptet_rate)
        .flag("state_tax", state_tax)
        .flag("newly_deductible", newly_deductible);
    if residual_state_tax > Decimal::ZERO {
        return Some(
            estimate
                .step(
                    "Budget personal state estimates for tax above the entity-level rate",
                    ctx.next_deadline(4, 15),
                )
                .flag("state_top_rate", params.top_income_tax_rate)
                .flag("residual_state_tax", residual_state_tax),
        );
    }
    Some(estimate)
}
