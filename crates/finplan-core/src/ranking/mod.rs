//! Ranking of calculator outcomes and assembly of a selected subset into one
//! action plan.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

use crate::assessment::intake::normalize_codes;
use crate::strategies::{StrategyCategory, StrategyEstimate, StrategyOutcome, StrategyRegistry};
use crate::types::Money;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedStrategy {
    pub code: String,
    pub title: String,
    pub category: StrategyCategory,
    pub annualized_savings: Money,
    pub estimate: StrategyEstimate,
}

/// A strategy step tagged with the strategy it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    pub code: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssembledPlan {
    /// Assembled strategies in selection order.
    pub strategies: Vec<PlannedStrategy>,
    pub steps: Vec<PlanStep>,
    pub documents: Vec<String>,
    pub deadlines: Vec<String>,
    /// Sum of annualized savings.
    pub total_savings_est: Money,
    pub total_cash_outlay: Money,
    /// Selected codes with no estimate or no registry entry.
    pub dropped_codes: Vec<String>,
}

/// Eligible outcomes first, then annualized savings descending. The sort is
/// stable: equal keys keep their input order.
pub fn rank(outcomes: &[StrategyOutcome]) -> Vec<StrategyOutcome> {
    let mut ranked = outcomes.to_vec();
    ranked.sort_by(compare_outcomes);
    ranked
}

fn compare_outcomes(a: &StrategyOutcome, b: &StrategyOutcome) -> Ordering {
    match (a.annualized_savings(), b.annualized_savings()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Case- and whitespace-insensitive key for document and deadline dedup.
fn dedup_key(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Appends `item` unless an equivalent spelling is already present. The
/// first spelling wins.
fn push_unique(list: &mut Vec<String>, seen: &mut HashSet<String>, item: &str) {
    let trimmed = item.trim();
    if trimmed.is_empty() {
        return;
    }
    if seen.insert(dedup_key(trimmed)) {
        list.push(trimmed.to_string());
    }
}

/// Merge the selected strategies into one plan.
///
/// `selected` is normalised (trimmed, lower-cased, deduplicated) first. Codes
/// that abstained or are not registered land in `dropped_codes`.
pub fn assemble_plan(
    registry: &StrategyRegistry,
    outcomes: &[StrategyOutcome],
    selected: &[String],
) -> AssembledPlan {
    let mut plan = AssembledPlan::default();
    let mut seen_documents = HashSet::new();
    let mut seen_deadlines = HashSet::new();

    for code in normalize_codes(selected) {
        let entry = registry.get(&code);
        let estimate = outcomes
            .iter()
            .find(|o| o.code == code)
            .and_then(|o| o.estimate.as_ref());
        let (entry, estimate) = match (entry, estimate) {
            (Some(entry), Some(estimate)) => (entry, estimate),
            _ => {
                tracing::debug!(code = %code, "selected strategy dropped");
                plan.dropped_codes.push(code);
                continue;
            }
        };

        plan.steps.extend(estimate.steps.iter().map(|s| PlanStep {
            code: code.clone(),
            label: s.label.clone(),
            due_date: s.due_date,
        }));
        for doc in entry
            .documents
            .iter()
            .copied()
            .chain(estimate.documents.iter().map(String::as_str))
        {
            push_unique(&mut plan.documents, &mut seen_documents, doc);
        }
        for deadline in entry.deadlines {
            push_unique(&mut plan.deadlines, &mut seen_deadlines, deadline);
        }

        let annualized = estimate.annualized_savings();
        plan.total_savings_est += annualized;
        plan.total_cash_outlay += estimate.cash_outlay_est.unwrap_or(Decimal::ZERO);
        plan.strategies.push(PlannedStrategy {
            code: code.clone(),
            title: entry.title.to_string(),
            category: entry.category,
            annualized_savings: annualized,
            estimate: estimate.clone(),
        });
    }

    plan
}

/// Rank `outcomes` and assemble `selected` against the standard registry.
///
/// An empty selection assembles every eligible strategy in rank order.
pub fn rank_and_assemble(outcomes: &[StrategyOutcome], selected: &[String]) -> AssembledPlan {
    let ranked = rank(outcomes);
    let selection: Vec<String> = if selected.is_empty() {
        ranked
            .iter()
            .filter(|o| o.is_eligible())
            .map(|o| o.code.clone())
            .collect()
    } else {
        selected.to_vec()
    };
    assemble_plan(StrategyRegistry::standard(), &ranked, &selection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::{AssessmentContext, StrategyEntry};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn outcome(code: &str, savings: Option<Decimal>) -> StrategyOutcome {
        StrategyOutcome {
            code: code.into(),
            title: code.into(),
            estimate: savings.map(|s| StrategyEstimate::new(code, s)),
        }
    }

    #[test]
    fn test_eligible_first_then_savings_desc() {
        let ranked = rank(&[
            outcome("a", None),
            outcome("b", Some(dec!(100))),
            outcome("c", Some(dec!(900))),
        ]);
        let codes: Vec<&str> = ranked.iter().map(|o| o.code.as_str()).collect();
        assert_eq!(codes, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_equal_savings_keep_input_order() {
        let ranked = rank(&[
            outcome("first", Some(dec!(500))),
            outcome("second", Some(dec!(500))),
            outcome("third", Some(dec!(500.00))),
        ]);
        let codes: Vec<&str> = ranked.iter().map(|o| o.code.as_str()).collect();
        assert_eq!(codes, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_monthly_cadence_ranks_by_annualized_value() {
        let mut monthly = outcome("monthly", Some(dec!(100)));
        monthly.estimate = monthly.estimate.map(|e| e.monthly());
        let ranked = rank(&[outcome("annual", Some(dec!(1000))), monthly]);
        assert_eq!(ranked[0].code, "monthly");
    }

    fn doc_a(_: &AssessmentContext<'_>) -> Option<StrategyEstimate> {
        None
    }

    fn registry_with_w9() -> StrategyRegistry {
        let mut registry = StrategyRegistry::new();
        registry
            .register(StrategyEntry {
                code: "alpha",
                title: "Alpha",
                category: StrategyCategory::Entity,
                documents: &["W-9", "Operating agreement"],
                deadlines: &["March 15"],
                calculator: doc_a,
            })
            .unwrap();
        registry
            .register(StrategyEntry {
                code: "beta",
                title: "Beta",
                category: StrategyCategory::Deductions,
                documents: &[" w-9 ", "Receipts"],
                deadlines: &["march  15"],
                calculator: doc_a,
            })
            .unwrap();
        registry
    }

    #[test]
    fn test_documents_deduplicated_ignoring_case_and_whitespace() {
        let outcomes = vec![
            outcome("alpha", Some(dec!(1000))),
            outcome("beta", Some(dec!(500))),
        ];
        let plan = assemble_plan(
            &registry_with_w9(),
            &outcomes,
            &["alpha".to_string(), "beta".to_string()],
        );
        let w9: Vec<&String> = plan
            .documents
            .iter()
            .filter(|d| dedup_key(d) == "w-9")
            .collect();
        assert_eq!(w9, vec!["W-9"]);
        assert_eq!(plan.documents.len(), 3);
        assert_eq!(plan.deadlines, vec!["March 15"]);
        assert_eq!(plan.total_savings_est, dec!(1500));
    }

    #[test]
    fn test_abstained_and_unknown_codes_dropped() {
        let outcomes = vec![outcome("alpha", None), outcome("beta", Some(dec!(500)))];
        let plan = assemble_plan(
            &registry_with_w9(),
            &outcomes,
            &["Alpha".to_string(), "beta".to_string(), "gamma".to_string()],
        );
        assert_eq!(plan.dropped_codes, vec!["alpha", "gamma"]);
        assert_eq!(plan.strategies.len(), 1);
        assert_eq!(plan.total_savings_est, dec!(500));
    }

    #[test]
    fn test_steps_follow_selection_order() {
        let mut alpha = outcome("alpha", Some(dec!(1000)));
        alpha.estimate = alpha.estimate.map(|e| e.step("alpha step", None));
        let mut beta = outcome("beta", Some(dec!(500)));
        beta.estimate = beta.estimate.map(|e| e.step("beta step", None).outlay(dec!(250)));
        let plan = assemble_plan(
            &registry_with_w9(),
            &[alpha, beta],
            &["beta".to_string(), "alpha".to_string()],
        );
        let labels: Vec<(&str, &str)> = plan
            .steps
            .iter()
            .map(|s| (s.code.as_str(), s.label.as_str()))
            .collect();
        assert_eq!(labels, vec![("beta", "beta step"), ("alpha", "alpha step")]);
        assert_eq!(plan.total_cash_outlay, dec!(250));
    }

    #[test]
    fn test_empty_selection_takes_all_eligible_in_rank_order() {
        let outcomes = vec![
            outcome("retirement_gap", Some(dec!(300))),
            outcome("augusta_rule", Some(dec!(1680))),
            outcome("s_corp_election", None),
        ];
        let plan = rank_and_assemble(&outcomes, &[]);
        let codes: Vec<&str> = plan.strategies.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["augusta_rule", "retirement_gap"]);
        assert!(plan.documents.iter().any(|d| d == "W-9"));
    }
}
