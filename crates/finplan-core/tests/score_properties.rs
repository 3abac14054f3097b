use finplan_core::assessment::*;
use finplan_core::gating;
use finplan_core::scoring::{self, ScoreCategory, ADVANCED_CODES, MAX_SCORE};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn money(cents: u64) -> Decimal {
    Decimal::new(cents as i64, 2)
}

prop_compose! {
    fn arb_assessment()(
        w2 in 0u64..50_000_000,
        se in 0u64..80_000_000,
        surplus in 0u64..5_000_000,
        efm in 0u32..24,
        deferrals in 0u64..4_000_000,
        ira in 0u64..1_000_000,
        hsa in 0u64..900_000,
        giving in 0u64..5_000_000,
        brokerage in 0u64..100_000_000,
        debt_balance in 0u64..10_000_000,
        apr_bp in 0u32..9_999,
        protections in any::<[bool; 4]>(),
        advanced in proptest::sample::subsequence(ADVANCED_CODES.to_vec(), 0..=ADVANCED_CODES.len()),
        extra_codes in proptest::collection::vec("[a-z_]{1,12}", 0..4),
    ) -> Assessment {
        let mut a = Assessment::default();
        a.income.w2 = money(w2);
        a.income.self_employment_net = money(se);
        a.cashflow.monthly_surplus = money(surplus);
        a.cashflow.emergency_fund_months = Decimal::from(efm);
        a.retirement.employee_deferrals = money(deferrals);
        a.retirement.ira_contributions = money(ira);
        a.retirement.hsa_contributions = money(hsa);
        a.preferences.giving_annual = money(giving);
        a.investments.taxable_brokerage = money(brokerage);
        a.debts.push(Debt {
            balance: money(debt_balance),
            apr: Decimal::new(apr_bp as i64, 2),
            min_payment: money(debt_balance / 30 + 1),
            ..Default::default()
        });
        a.protection = Protection {
            has_umbrella_policy: protections[0],
            has_disability_cover: protections[1],
            has_term_life: protections[2],
            has_estate_documents: protections[3],
        };
        a.selected_strategies = advanced.into_iter().map(String::from).chain(extra_codes).collect();
        a
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_score_and_categories_stay_in_bounds(a in arb_assessment()) {
        let result = scoring::compute_score(&a);
        prop_assert!(result.score >= Decimal::ZERO);
        prop_assert!(result.score <= MAX_SCORE);
        for category in ScoreCategory::ALL {
            let value = result.breakdown.get(category);
            prop_assert!(value >= Decimal::ZERO);
            prop_assert!(value <= category.cap());
        }
    }

    #[test]
    fn prop_gates_are_idempotent(a in arb_assessment()) {
        prop_assert_eq!(gating::evaluate_gates(&a), gating::evaluate_gates(&a));
    }
}
