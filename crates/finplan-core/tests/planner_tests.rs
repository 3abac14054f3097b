use chrono::NaiveDate;
use finplan_core::assessment::{self, Assessment, Debt, DebtKind};
use finplan_core::debt::{self, BaselineOutcome, Convergence};
use finplan_core::gating;
use finplan_core::ranking;
use finplan_core::scoring::{self, ScoreCategory, ADVANCED_CAP};
use finplan_core::strategies::{self, StateParamTable, StrategyEstimate, StrategyOutcome};
use finplan_core::PlannerError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
}

fn intake(json: &str) -> Assessment {
    assessment::assessment_from_json(json).unwrap()
}

// ===========================================================================
// Gates
// ===========================================================================

#[test]
fn test_gates_are_referentially_transparent() {
    let a = intake(
        r#"{
            "income": {"w2": "85000", "self_employment_net": "62000"},
            "cashflow": {"monthly_surplus": "2500", "emergency_fund_months": "4"},
            "debts": [
                {"name": "Visa", "balance": "4000", "apr": "21.99", "min_payment": "120"},
                {"name": "Auto", "balance": "14000", "apr": "6.5", "min_payment": "380"}
            ]
        }"#,
    );
    let first = gating::evaluate_gates(&a);
    let second = gating::evaluate_gates(&a);
    assert_eq!(first, second);
}

// ===========================================================================
// Debt payoff
// ===========================================================================

#[test]
fn test_avalanche_two_debt_scenario() {
    let debts = vec![
        Debt {
            name: "Card A".into(),
            kind: DebtKind::CreditCard,
            balance: dec!(18_000),
            apr: dec!(24),
            min_payment: dec!(360),
        },
        Debt {
            name: "Card B".into(),
            kind: DebtKind::CreditCard,
            balance: dec!(12_000),
            apr: dec!(12),
            min_payment: dec!(240),
        },
    ];
    let plan = debt::simulate_debt_plan(&debts, dec!(2_000), as_of()).unwrap();

    let a = plan.items.iter().find(|i| i.name == "Card A").unwrap();
    let b = plan.items.iter().find(|i| i.name == "Card B").unwrap();
    assert!(a.payoff_order.unwrap() < b.payoff_order.unwrap());
    assert!(plan.total_interest_saved >= Decimal::ZERO);

    let item_sum: Decimal = plan.items.iter().filter_map(|i| i.interest_saved).sum();
    assert!(item_sum <= plan.total_interest_saved);

    // the schedule ends with nothing owed
    let last = plan.schedule.last().unwrap();
    assert_eq!(last.total_balance, Decimal::ZERO);
    match plan.convergence {
        Convergence::Converged { months } => assert_eq!(months, last.month),
        other => panic!("expected convergence, got {other:?}"),
    }
}

#[test]
fn test_minimum_below_interest_reported_as_non_converging() {
    let debts = vec![Debt {
        name: "Store card".into(),
        balance: dec!(8_000),
        apr: dec!(29.99),
        min_payment: dec!(150),
        ..Default::default()
    }];
    let plan = debt::simulate_debt_plan(&debts, dec!(150), as_of()).unwrap();
    assert!(matches!(plan.convergence, Convergence::DidNotConverge { .. }));
    assert_eq!(plan.items[0].months_to_payoff, None);
    assert_eq!(plan.items[0].baseline, BaselineOutcome::DidNotConverge);
    assert_eq!(plan.items[0].interest_saved, None);
    assert_eq!(plan.debt_free_by, None);
}

#[test]
fn test_payoff_order_is_permutation_by_completion_month() {
    let debts: Vec<Debt> = [
        ("A", dec!(2_500), dec!(9), dec!(75)),
        ("B", dec!(900), dec!(27), dec!(35)),
        ("C", dec!(6_000), dec!(15), dec!(150)),
        ("D", dec!(300), dec!(3), dec!(25)),
    ]
    .into_iter()
    .map(|(name, balance, apr, min)| Debt {
        name: name.into(),
        balance,
        apr,
        min_payment: min,
        ..Default::default()
    })
    .collect();
    let plan = debt::simulate_debt_plan(&debts, dec!(900), as_of()).unwrap();

    let mut orders: Vec<u32> = plan.items.iter().map(|i| i.payoff_order.unwrap()).collect();
    orders.sort_unstable();
    assert_eq!(orders, vec![1, 2, 3, 4]);

    let mut by_order: Vec<_> = plan.items.iter().collect();
    by_order.sort_by_key(|i| i.payoff_order);
    for pair in by_order.windows(2) {
        assert!(pair[0].months_to_payoff <= pair[1].months_to_payoff);
    }
}

// ===========================================================================
// Score
// ===========================================================================

#[test]
fn test_default_assessment_score_in_baseline_band() {
    let result = scoring::compute_score(&Assessment::default());
    assert!(result.score >= dec!(25) && result.score <= dec!(40));
}

#[test]
fn test_seven_advanced_codes_stay_under_cap() {
    let a = intake(
        r#"{"selected_strategies": [
            "s_corp_election", "augusta_rule", "cash_balance_plan", "short_term_rental",
            "ptet_election", "cost_segregation", "charitable_bunching"
        ]}"#,
    );
    let result = scoring::compute_score(&a);
    assert!(result.breakdown.get(ScoreCategory::Advanced) <= ADVANCED_CAP);
    assert!(result.score <= dec!(100));
}

// ===========================================================================
// Ranking and assembly
// ===========================================================================

fn outcome(code: &str, savings: Decimal) -> StrategyOutcome {
    StrategyOutcome {
        code: code.into(),
        title: code.into(),
        estimate: Some(StrategyEstimate::new(code, savings)),
    }
}

#[test]
fn test_ranking_is_stable_for_equal_savings() {
    let ranked = ranking::rank(&[
        outcome("cost_segregation", dec!(4_000)),
        outcome("augusta_rule", dec!(4_000)),
        outcome("retirement_gap", dec!(9_000)),
    ]);
    let codes: Vec<&str> = ranked.iter().map(|o| o.code.as_str()).collect();
    assert_eq!(codes, vec!["retirement_gap", "cost_segregation", "augusta_rule"]);
}

#[test]
fn test_w9_appears_once_across_strategies() {
    let mut augusta = outcome("augusta_rule", dec!(1_680));
    augusta.estimate = augusta.estimate.map(|e| e.document(" w-9"));
    let mut children = outcome("hire_your_children", dec!(2_000));
    children.estimate = children.estimate.map(|e| e.document("W-9 "));

    let plan = ranking::rank_and_assemble(
        &[augusta, children],
        &["augusta_rule".to_string(), "hire_your_children".to_string()],
    );
    let w9 = plan
        .documents
        .iter()
        .filter(|d| d.trim().eq_ignore_ascii_case("w-9"))
        .count();
    assert_eq!(w9, 1);
    assert_eq!(plan.total_savings_est, dec!(3680));
}

// ===========================================================================
// Full pipeline
// ===========================================================================

#[test]
fn test_calculators_run_in_registration_order() {
    let a = intake(
        r#"{
            "profile": {"filing_status": "married_filing_jointly", "state": "ny", "dependents": 2},
            "income": {"w2": "140000", "pass_through_income": ["220000"]},
            "entities": [{"name": "Partners LLC", "type": "partnership", "reasonable_compensation": "0"}],
            "cashflow": {"monthly_surplus": "6000", "emergency_fund_months": "6"}
        }"#,
    );
    let gates = gating::evaluate_gates(&a);
    let table: StateParamTable = serde_json::from_str(
        r#"{"NY": {"ptet_available": true, "ptet_rate": "0.0685", "top_income_tax_rate": "0.109"}}"#,
    )
    .unwrap();
    let outcomes = strategies::run_calculators(&a, &gates, &table, as_of());
    assert_eq!(outcomes.len(), 9);
    let ptet = outcomes.iter().find(|o| o.code == "ptet_election").unwrap();
    assert!(ptet.is_eligible());
}

#[test]
fn test_intake_rejects_out_of_range_apr() {
    let err = assessment::assessment_from_json(
        r#"{"debts": [{"balance": "100", "apr": "100", "min_payment": "10"}]}"#,
    )
    .unwrap_err();
    assert!(matches!(err, PlannerError::InvalidInput { .. }));
}
