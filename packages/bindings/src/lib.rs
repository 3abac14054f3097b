use chrono::NaiveDate;
use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use finplan_core::assessment::{validate_intake, Assessment, AssessmentIntake};
use finplan_core::engine::PlanningInput;
use finplan_core::gating::{self, GateThresholds, Gates};
use finplan_core::strategies::{StateParamTable, StrategyOutcome};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Request shape shared by the assessment-driven entry points.
#[derive(Deserialize)]
struct AssessmentRequest {
    intake: AssessmentIntake,
    #[serde(default)]
    thresholds: GateThresholds,
    #[serde(default)]
    state_params: StateParamTable,
    as_of: Option<NaiveDate>,
    /// Debt plan only: overrides the intake's monthly surplus.
    surplus: Option<Decimal>,
}

impl AssessmentRequest {
    fn parse(input_json: &str) -> NapiResult<Self> {
        serde_json::from_str(input_json).map_err(to_napi_error)
    }

    fn assessment_and_gates(&self) -> NapiResult<(Assessment, Gates)> {
        let assessment = validate_intake(&self.intake).map_err(to_napi_error)?;
        let gates = gating::evaluate_gates_with(&assessment, &self.thresholds);
        Ok((assessment, gates))
    }

    fn as_of(&self) -> NapiResult<NaiveDate> {
        self.as_of
            .ok_or_else(|| to_napi_error("as_of (YYYY-MM-DD) is required"))
    }
}

#[derive(Deserialize)]
struct AssembleRequest {
    outcomes: Vec<StrategyOutcome>,
    #[serde(default)]
    selected: Vec<String>,
}

// ---------------------------------------------------------------------------
// Assessment
// ---------------------------------------------------------------------------

#[napi]
pub fn validate_assessment(input_json: String) -> NapiResult<String> {
    let intake: AssessmentIntake = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let assessment = validate_intake(&intake).map_err(to_napi_error)?;
    serde_json::to_string(&assessment).map_err(to_napi_error)
}

#[napi]
pub fn evaluate_gates(input_json: String) -> NapiResult<String> {
    let request = AssessmentRequest::parse(&input_json)?;
    let (_, gates) = request.assessment_and_gates()?;
    serde_json::to_string(&gates).map_err(to_napi_error)
}

#[napi]
pub fn compute_score(input_json: String) -> NapiResult<String> {
    let request = AssessmentRequest::parse(&input_json)?;
    let (assessment, gates) = request.assessment_and_gates()?;
    let output = finplan_core::scoring::compute_score_with(&assessment, &gates);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

#[napi]
pub fn run_calculators(input_json: String) -> NapiResult<String> {
    let request = AssessmentRequest::parse(&input_json)?;
    let (assessment, gates) = request.assessment_and_gates()?;
    let outcomes = finplan_core::strategies::run_calculators(
        &assessment,
        &gates,
        &request.state_params,
        request.as_of()?,
    );
    serde_json::to_string(&outcomes).map_err(to_napi_error)
}

#[napi]
pub fn rank_and_assemble(input_json: String) -> NapiResult<String> {
    let request: AssembleRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let plan = finplan_core::ranking::rank_and_assemble(&request.outcomes, &request.selected);
    serde_json::to_string(&plan).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Debt and roadmap
// ---------------------------------------------------------------------------

#[napi]
pub fn simulate_debt_plan(input_json: String) -> NapiResult<String> {
    let request = AssessmentRequest::parse(&input_json)?;
    let assessment = validate_intake(&request.intake).map_err(to_napi_error)?;
    let surplus = request
        .surplus
        .unwrap_or(assessment.cashflow.monthly_surplus);
    let plan =
        finplan_core::debt::simulate_debt_plan(&assessment.debts, surplus, request.as_of()?);
    serde_json::to_string(&plan).map_err(to_napi_error)
}

#[napi]
pub fn build_five_year_roadmap(input_json: String) -> NapiResult<String> {
    let request = AssessmentRequest::parse(&input_json)?;
    let (assessment, gates) = request.assessment_and_gates()?;
    let roadmap =
        finplan_core::roadmap::build_five_year_roadmap(&assessment, &gates, request.as_of()?);
    serde_json::to_string(&roadmap).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

#[napi]
pub fn run_planning_engine(input_json: String) -> NapiResult<String> {
    let input: PlanningInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = finplan_core::engine::run_planning_engine(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
