//! One function per strategy. Calculators read the context only and never
//! call each other.

pub mod deferral;
pub mod entity;
pub mod giving;
pub mod real_estate;
pub mod retirement;
pub mod state_tax;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;

    use crate::assessment::Assessment;
    use crate::gating::{evaluate_gates, Gates};
    use crate::strategies::context::AssessmentContext;
    use crate::strategies::estimate::StrategyEstimate;
    use crate::strategies::registry::Calculator;
    use crate::strategies::state_params::StateParamTable;

    pub fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    pub fn run(calc: Calculator, assessment: &Assessment) -> Option<StrategyEstimate> {
        run_with_table(calc, assessment, &StateParamTable::new())
    }

    pub fn run_with_table(
        calc: Calculator,
        assessment: &Assessment,
        table: &StateParamTable,
    ) -> Option<StrategyEstimate> {
        let gates: Gates = evaluate_gates(assessment);
        calc(&AssessmentContext::new(assessment, &gates, table, as_of()))
    }
}
