//! Gating evaluator: eligibility signals derived fresh from an [`Assessment`].

pub mod thresholds;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::assessment::Assessment;
use crate::tax_tables;
use crate::types::{Money, Percent};

pub use thresholds::GateThresholds;

/// Derived eligibility signals. A value object: recompute it from the
/// Assessment whenever needed, never persist it on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gates {
    /// Balance-weighted APR (percent) across debts with a positive balance.
    pub weighted_apr: Percent,
    pub liquidity_adequate: bool,
    pub s_corp_now: bool,
    pub augusta_now: bool,
    pub cash_balance_plan_soon: bool,
    pub short_term_rental_now: bool,
    pub pass_through_election_eligible: bool,
    pub itemize_likely: bool,

    // Inputs that fed the flags, kept for traceability
    pub annualized_surplus: Money,
    pub entity_wages: Money,
    pub business_income: Money,
    pub standard_deduction: Money,
    pub itemized_estimate: Money,
}

/// Evaluate gates with the default policy thresholds.
pub fn evaluate_gates(assessment: &Assessment) -> Gates {
    evaluate_gates_with(assessment, &GateThresholds::default())
}

/// Evaluate gates against caller-supplied thresholds. Total: never fails.
pub fn evaluate_gates_with(assessment: &Assessment, thresholds: &GateThresholds) -> Gates {
    let income = &assessment.income;
    let annualized_surplus = assessment.cashflow.annualized_surplus();

    let entity_wages: Money = assessment
        .entities
        .iter()
        .map(|e| e.reasonable_compensation)
        .sum();
    let earned_business_income = income.self_employment_net + entity_wages;
    let business_income = earned_business_income + income.pass_through_total();

    let status = assessment.profile.filing_status;
    let standard_deduction = tax_tables::standard_deduction(status);
    let itemized_estimate = assessment.preferences.giving_annual
        + assessment.itemized.mortgage_interest
        + assessment
            .itemized
            .state_and_local_taxes
            .min(tax_tables::salt_cap(status));

    let has_pass_through_entity = assessment
        .entities
        .iter()
        .any(|e| e.entity_type.is_pass_through());

    let prefs = &assessment.preferences;

    let gates = Gates {
        weighted_apr: weighted_apr(assessment),
        liquidity_adequate: assessment.cashflow.emergency_fund_months
            >= thresholds.liquidity_months,
        s_corp_now: earned_business_income >= thresholds.s_corp_min_business_income
            && annualized_surplus >= thresholds.s_corp_min_annual_surplus,
        augusta_now: assessment.has_business() && assessment.owns_primary_residence(),
        cash_balance_plan_soon: business_income >= thresholds.cash_balance_min_business_income
            && annualized_surplus >= thresholds.cash_balance_min_annual_surplus,
        short_term_rental_now: annualized_surplus
            >= thresholds.short_term_rental_min_annual_surplus
            && prefs.wants_short_term_rental
            && prefs.willing_to_self_manage,
        pass_through_election_eligible: has_pass_through_entity
            && income.pass_through_total() > Decimal::ZERO,
        itemize_likely: itemized_estimate >= standard_deduction,
        annualized_surplus,
        entity_wages,
        business_income,
        standard_deduction,
        itemized_estimate,
    };

    tracing::debug!(
        weighted_apr = %gates.weighted_apr,
        s_corp_now = gates.s_corp_now,
        short_term_rental_now = gates.short_term_rental_now,
        "gates evaluated"
    );

    gates
}

/// Σ(balance·APR) / Σ(balance) over debts with a positive balance; zero when there are none.
pub fn weighted_apr(assessment: &Assessment) -> Percent {
    let (weighted, total) = assessment
        .debts
        .iter()
        .filter(|d| d.balance > Decimal::ZERO)
        .fold((Decimal::ZERO, Decimal::ZERO), |(w, t), d| {
            (w + d.balance * d.apr, t + d.balance)
        });
    if total.is_zero() {
        Decimal::ZERO
    } else {
        weighted / total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn consultant() -> Assessment {
        Assessment {
            income: Income {
                self_employment_net: dec!(45_000),
                ..Default::default()
            },
            entities: vec![Entity {
                name: "Consulting LLC".into(),
                entity_type: EntityType::SingleMemberLlc,
                ownership_pct: dec!(100),
                reasonable_compensation: dec!(5_000),
            }],
            cashflow: Cashflow {
                monthly_surplus: dec!(2_000),
                emergency_fund_months: dec!(3),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_weighted_apr() {
        let mut a = Assessment::default();
        a.debts = vec![
            Debt {
                balance: dec!(18_000),
                apr: dec!(24),
                min_payment: dec!(360),
                ..Default::default()
            },
            Debt {
                balance: dec!(12_000),
                apr: dec!(12),
                min_payment: dec!(240),
                ..Default::default()
            },
            Debt {
                balance: dec!(0),
                apr: dec!(99),
                ..Default::default()
            },
        ];
        // (18k*24 + 12k*12) / 30k = 19.2
        assert_eq!(weighted_apr(&a), dec!(19.2));
    }

    #[test]
    fn test_weighted_apr_without_debts_is_zero() {
        assert_eq!(weighted_apr(&Assessment::default()), Decimal::ZERO);
    }

    #[test]
    fn test_s_corp_gate_boundary() {
        let a = consultant();
        let gates = evaluate_gates(&a);
        // 45k + 5k = 50k and 24k surplus: both thresholds met exactly or above
        assert!(gates.s_corp_now);
        assert!(gates.liquidity_adequate);

        let mut poorer = consultant();
        poorer.cashflow.monthly_surplus = dec!(1_666);
        assert!(!evaluate_gates(&poorer).s_corp_now);
    }

    #[test]
    fn test_short_term_rental_needs_both_preferences() {
        let mut a = Assessment::default();
        a.cashflow.monthly_surplus = dec!(9_000);
        a.preferences.wants_short_term_rental = true;
        assert!(!evaluate_gates(&a).short_term_rental_now);

        a.preferences.willing_to_self_manage = true;
        assert!(evaluate_gates(&a).short_term_rental_now);
    }

    #[test]
    fn test_thresholds_are_overridable() {
        let a = consultant();
        let strict = GateThresholds {
            s_corp_min_business_income: dec!(80_000),
            ..Default::default()
        };
        assert!(!evaluate_gates_with(&a, &strict).s_corp_now);
    }

    #[test]
    fn test_augusta_requires_business_and_home() {
        let mut a = consultant();
        assert!(!evaluate_gates(&a).augusta_now);
        a.properties.push(Property {
            use_class: PropertyUse::PrimaryResidence,
            cost_basis: dec!(600_000),
            ..Default::default()
        });
        assert!(evaluate_gates(&a).augusta_now);
    }

    #[test]
    fn test_itemize_likely_with_large_giving() {
        let mut a = Assessment::default();
        a.preferences.giving_annual = dec!(10_000);
        a.itemized.state_and_local_taxes = dec!(8_000);
        assert!(evaluate_gates(&a).itemize_likely);
        assert_eq!(evaluate_gates(&a).itemized_estimate, dec!(18_000));
    }

    #[test]
    fn test_default_assessment_gates_are_all_closed() {
        let gates = evaluate_gates(&Assessment::default());
        assert!(!gates.liquidity_adequate);
        assert!(!gates.s_corp_now);
        assert!(!gates.augusta_now);
        assert!(!gates.cash_balance_plan_soon);
        assert!(!gates.short_term_rental_now);
        assert!(!gates.pass_through_election_eligible);
        assert!(!gates.itemize_likely);
        assert_eq!(gates.weighted_apr, Decimal::ZERO);
    }
}
