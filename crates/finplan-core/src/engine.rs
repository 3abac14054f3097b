//! End-to-end planning run: intake validation through plan assembly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::assessment::{validate_intake, Assessment, AssessmentIntake};
use crate::debt::{simulate_debt_plan, Convergence, DebtPlan};
use crate::gating::{evaluate_gates_with, GateThresholds, Gates};
use crate::ranking::{rank, rank_and_assemble, AssembledPlan};
use crate::roadmap::{build_five_year_roadmap, FiveYearPlan};
use crate::scoring::{compute_score_with, ScoreResult};
use crate::strategies::{run_calculators, StateParamTable, StrategyOutcome};
use crate::types::{with_metadata, ComputationOutput};
use crate::PlannerResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningInput {
    pub intake: AssessmentIntake,
    #[serde(default)]
    pub state_params: StateParamTable,
    #[serde(default)]
    pub thresholds: GateThresholds,
    /// Strategy codes to assemble. Falls back to the assessment's own
    /// selection, then to every eligible strategy.
    #[serde(default)]
    pub selected: Vec<String>,
    pub as_of: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct EngineRun {
    pub assessment: Assessment,
    pub gates: Gates,
    /// One outcome per registered calculator, ranked.
    pub strategies: Vec<StrategyOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debt_plan: Option<DebtPlan>,
    pub score: ScoreResult,
    pub roadmap: FiveYearPlan,
    pub plan: AssembledPlan,
}

/// Validate the intake and run every component against it.
///
/// Only validation can fail; everything past the boundary is total.
pub fn run_planning_engine(input: &PlanningInput) -> PlannerResult<ComputationOutput<EngineRun>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let assessment = validate_intake(&input.intake)?;
    let gates = evaluate_gates_with(&assessment, &input.thresholds);

    let outcomes = run_calculators(&assessment, &gates, &input.state_params, input.as_of);
    let debt_plan = simulate_debt_plan(
        &assessment.debts,
        assessment.cashflow.monthly_surplus,
        input.as_of,
    );
    let score = compute_score_with(&assessment, &gates);
    let roadmap = build_five_year_roadmap(&assessment, &gates, input.as_of);

    let selected = if input.selected.is_empty() {
        &assessment.selected_strategies
    } else {
        &input.selected
    };
    let plan = rank_and_assemble(&outcomes, selected);

    if !gates.liquidity_adequate {
        warnings.push(format!(
            "Emergency fund covers {} months, below the {} month target",
            assessment.cashflow.emergency_fund_months, input.thresholds.liquidity_months
        ));
    }
    if gates.pass_through_election_eligible
        && input.state_params.get(&assessment.profile.state).is_none()
    {
        warnings.push(format!(
            "No state parameters for '{}'; PTET election not evaluated",
            assessment.profile.state
        ));
    }
    if let Some(debt) = &debt_plan {
        if let Some(shortfall) = debt.budget_shortfall {
            warnings.push(format!(
                "Monthly surplus is ${shortfall} short of the minimum payments"
            ));
        }
        if let Convergence::DidNotConverge { months_simulated } = debt.convergence {
            warnings.push(format!(
                "Debt payoff does not converge (stopped after {months_simulated} months)"
            ));
        }
        if debt.incomplete_comparison {
            warnings.push(
                "Interest saved excludes debts whose minimum-only baseline never pays off".into(),
            );
        }
    }
    if !plan.dropped_codes.is_empty() {
        warnings.push(format!(
            "Selected strategies without an estimate: {}",
            plan.dropped_codes.join(", ")
        ));
    }

    let output = EngineRun {
        assessment,
        gates,
        strategies: rank(&outcomes),
        debt_plan,
        score,
        roadmap,
        plan,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Household strategy planning (gates, calculators, avalanche debt plan, score, roadmap)",
        &serde_json::json!({
            "as_of": input.as_of.to_string(),
            "thresholds": input.thresholds,
            "state_params_loaded": input.state_params.len(),
            "marginal_rate": "federal bracket proxy on income less standard deduction",
            "debt_interest": "floor(balance x APR / 12) in integer cents",
        }),
        warnings,
        elapsed,
        output,
    ))
}
