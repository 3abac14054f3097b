use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::assessment::{EntityType, FilingStatus};
use crate::strategies::context::AssessmentContext;
use crate::strategies::estimate::StrategyEstimate;
use crate::tax_tables::{self, SE_TAX_RATE};
use crate::types::{Money, Rate};

pub const S_CORP_ELECTION: &str = "s_corp_election";
pub const AUGUSTA_RULE: &str = "augusta_rule";
pub const HIRE_YOUR_CHILDREN: &str = "hire_your_children";

/// Share of self-employment profit paid out as owner salary after the election.
pub const REASONABLE_COMP_SHARE: Rate = dec!(0.40);
/// Payroll service, extra return and state fees per year.
pub const S_CORP_ANNUAL_ADMIN_COST: Money = dec!(2_500);
pub const S_CORP_SETUP_COST: Money = dec!(1_200);

/// Maximum rental days excluded from the owner's income.
pub const AUGUSTA_MAX_DAYS: u32 = 14;
/// Proxy fair-market daily rate for a residence used for business meetings.
pub const AUGUSTA_DAILY_RATE: Money = dec!(1_000);

/// Share of earned business income that can plausibly fund children's wages.
pub const CHILD_WAGES_BUSINESS_SHARE: Rate = dec!(0.25);

// ---------------------------------------------------------------------------
// S-corp election
// ---------------------------------------------------------------------------

/// Self-employment tax avoided on distributions above a reasonable salary,
/// net of the annual cost of running payroll.
pub fn s_corp_election(ctx: &AssessmentContext<'_>) -> Option<StrategyEstimate> {
    let a = ctx.assessment;
    let se_net = a.income.self_employment_net;
    if !ctx.gates.s_corp_now || se_net <= Decimal::ZERO || a.has_entity(EntityType::SCorp) {
        return None;
    }

    let salary = (se_net * REASONABLE_COMP_SHARE).round_dp(0);
    let distributions = se_net - salary;
    let se_tax_avoided = distributions * SE_TAX_RATE;
    let savings = se_tax_avoided - S_CORP_ANNUAL_ADMIN_COST;
    if savings <= Decimal::ZERO {
        return None;
    }

    let mut est = StrategyEstimate::new(S_CORP_ELECTION, savings)
        .risk(2)
        .complexity(3)
        .outlay(S_CORP_SETUP_COST);
    if a.entities.is_empty() {
        est = est.step("Form an LLC and obtain an EIN", None);
    }
    Some(
        est.step("File Form 2553", ctx.next_deadline(3, 15))
            .step(format!("Start payroll at a ${salary} salary"), None)
            .step("Run quarterly payroll filings", None)
            .flag("salary", salary)
            .flag("distributions", distributions)
            .flag("se_tax_avoided", se_tax_avoided.round_dp(2)),
    )
}

// ---------------------------------------------------------------------------
// Augusta rule
// ---------------------------------------------------------------------------

/// Up to 14 days of home rental paid by the business: deductible to the
/// business, excluded from the owner's income.
pub fn augusta_rule(ctx: &AssessmentContext<'_>) -> Option<StrategyEstimate> {
    if !ctx.gates.augusta_now {
        return None;
    }

    let full_rent = AUGUSTA_DAILY_RATE * Decimal::from(AUGUSTA_MAX_DAYS);
    let rent = full_rent.min(ctx.gates.business_income);
    if rent <= Decimal::ZERO {
        return None;
    }

    let rate = ctx.marginal_rate();
    Some(
        StrategyEstimate::new(AUGUSTA_RULE, rent * rate)
            .risk(2)
            .complexity(2)
            .step("Collect comparable daily rental quotes for the residence", None)
            .step(
                format!("Schedule up to {AUGUSTA_MAX_DAYS} documented business meetings at home"),
                None,
            )
            .step(
                "Pay the rent from the business account",
                ctx.next_deadline(12, 31),
            )
            .flag("rent", rent)
            .flag("marginal_rate", rate),
    )
}

// ---------------------------------------------------------------------------
// Hiring children
// ---------------------------------------------------------------------------

/// Wages paid to dependent children up to their standard deduction shift
/// income out of the parents' bracket. Unincorporated businesses also skip
/// payroll taxes on a minor child's wages.
pub fn hire_your_children(ctx: &AssessmentContext<'_>) -> Option<StrategyEstimate> {
    let a = ctx.assessment;
    if a.profile.dependents == 0 || !a.has_business() {
        return None;
    }

    let earned = a.income.self_employment_net + ctx.gates.entity_wages;
    let per_child = tax_tables::standard_deduction(FilingStatus::Single);
    let wages = (per_child * Decimal::from(a.profile.dependents))
        .min(earned * CHILD_WAGES_BUSINESS_SHARE)
        .round_dp(0);
    if wages <= Decimal::ZERO {
        return None;
    }

    let payroll_tax_exempt = a.entities.iter().all(|e| {
        matches!(
            e.entity_type,
            EntityType::SoleProprietorship | EntityType::SingleMemberLlc
        )
    });
    let rate = ctx.marginal_rate();
    let effective = if payroll_tax_exempt {
        rate + SE_TAX_RATE
    } else {
        rate
    };

    Some(
        StrategyEstimate::new(HIRE_YOUR_CHILDREN, wages * effective)
            .risk(2)
            .complexity(2)
            .step("Write age-appropriate job descriptions", None)
            .step("Track hours worked on timesheets", None)
            .step("Issue W-2s to each child", ctx.next_deadline(1, 31))
            .flag("wages", wages)
            .flag("children", a.profile.dependents)
            .flag("payroll_tax_exempt", payroll_tax_exempt),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::*;
    use crate::strategies::calculators::test_support::run;
    use rust_decimal_macros::dec;

    fn freelancer(se: Decimal, monthly_surplus: Decimal) -> Assessment {
        Assessment {
            income: Income {
                self_employment_net: se,
                ..Default::default()
            },
            cashflow: Cashflow {
                monthly_surplus,
                emergency_fund_months: dec!(4),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_s_corp_savings_net_of_admin() {
        let est = run(s_corp_election, &freelancer(dec!(100_000), dec!(3_000))).unwrap();
        // salary 40k, distributions 60k * 15.3% = 9,180 less 2,500 admin
        assert_eq!(est.savings_est, dec!(6680));
        assert_eq!(est.cash_outlay_est, Some(dec!(1200)));
        assert_eq!(est.steps[0].label, "Form an LLC and obtain an EIN");
    }

    #[test]
    fn test_s_corp_abstains_below_gate() {
        assert!(run(s_corp_election, &freelancer(dec!(100_000), dec!(1_000))).is_none());
    }

    #[test]
    fn test_s_corp_abstains_when_already_elected() {
        let mut a = freelancer(dec!(100_000), dec!(3_000));
        a.entities.push(Entity {
            name: "Studio Inc".into(),
            entity_type: EntityType::SCorp,
            ownership_pct: dec!(100),
            reasonable_compensation: dec!(50_000),
        });
        assert!(run(s_corp_election, &a).is_none());
    }

    #[test]
    fn test_augusta_uses_fourteen_days() {
        let mut a = freelancer(dec!(45_000), dec!(500));
        a.properties.push(Property {
            use_class: PropertyUse::PrimaryResidence,
            cost_basis: dec!(450_000),
            ..Default::default()
        });
        let est = run(augusta_rule, &a).unwrap();
        // 14 * 1,000 at 12%
        assert_eq!(est.savings_est, dec!(1680));
    }

    #[test]
    fn test_augusta_abstains_without_home() {
        assert!(run(augusta_rule, &freelancer(dec!(45_000), dec!(500))).is_none());
    }

    #[test]
    fn test_hire_children_capped_by_business_share() {
        let mut a = freelancer(dec!(100_000), dec!(3_000));
        a.profile.dependents = 2;
        let est = run(hire_your_children, &a).unwrap();
        // wages min(31,500, 25,000) at 22% + 15.3%
        assert_eq!(est.flags["wages"], "25000");
        assert_eq!(est.savings_est, dec!(9325));
    }

    #[test]
    fn test_hire_children_abstains_without_dependents() {
        assert!(run(hire_your_children, &freelancer(dec!(100_000), dec!(3_000))).is_none());
    }
}
