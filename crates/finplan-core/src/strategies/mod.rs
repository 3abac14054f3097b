//! Strategy calculator set: a registry of independent estimators run against
//! one assessment.

pub mod calculators;
pub mod context;
pub mod estimate;
pub mod registry;
pub mod state_params;

use chrono::NaiveDate;

use crate::assessment::Assessment;
use crate::gating::Gates;

pub use context::AssessmentContext;
pub use estimate::{SavingsCadence, StrategyEstimate, StrategyOutcome, StrategyStep};
pub use registry::{Calculator, StrategyCategory, StrategyEntry, StrategyRegistry};
pub use state_params::{StateParamTable, StateParams};

/// Run every standard calculator, one outcome per entry in registration order.
pub fn run_calculators(
    assessment: &Assessment,
    gates: &Gates,
    state_params: &StateParamTable,
    as_of: NaiveDate,
) -> Vec<StrategyOutcome> {
    run_calculators_with(
        StrategyRegistry::standard(),
        assessment,
        gates,
        state_params,
        as_of,
    )
}

/// Run the calculators of a caller-supplied registry.
pub fn run_calculators_with(
    registry: &StrategyRegistry,
    assessment: &Assessment,
    gates: &Gates,
    state_params: &StateParamTable,
    as_of: NaiveDate,
) -> Vec<StrategyOutcome> {
    let ctx = AssessmentContext::new(assessment, gates, state_params, as_of);
    registry
        .entries()
        .iter()
        .map(|entry| {
            let estimate = (entry.calculator)(&ctx);
            match &estimate {
                Some(est) => tracing::debug!(
                    code = entry.code,
                    savings = %est.savings_est,
                    "strategy estimated"
                ),
                None => tracing::trace!(code = entry.code, "strategy not applicable"),
            }
            StrategyOutcome {
                code: entry.code.to_string(),
                title: entry.title.to_string(),
                estimate,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gating::evaluate_gates;
    use rust_decimal_macros::dec;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    #[test]
    fn test_one_outcome_per_entry_in_order() {
        let a = Assessment::default();
        let gates = evaluate_gates(&a);
        let outcomes = run_calculators(&a, &gates, &StateParamTable::new(), as_of());
        let codes: Vec<&str> = outcomes.iter().map(|o| o.code.as_str()).collect();
        let expected: Vec<&str> = StrategyRegistry::standard().codes().collect();
        assert_eq!(codes, expected);
        assert!(outcomes.iter().all(|o| !o.is_eligible()));
    }

    #[test]
    fn test_custom_registry_runs_only_its_entries() {
        let mut registry = StrategyRegistry::new();
        let entry = *StrategyRegistry::standard()
            .get(calculators::retirement::RETIREMENT_GAP)
            .unwrap();
        registry.register(entry).unwrap();

        let mut a = Assessment::default();
        a.income.w2 = dec!(90_000);
        let gates = evaluate_gates(&a);
        let outcomes = run_calculators_with(&registry, &a, &gates, &StateParamTable::new(), as_of());
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].is_eligible());
    }
}
