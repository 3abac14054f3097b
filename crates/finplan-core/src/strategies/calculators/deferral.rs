use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::strategies::context::AssessmentContext;
use crate::strategies::estimate::StrategyEstimate;
use crate::types::Money;

pub const CASH_BALANCE_PLAN: &str = "cash_balance_plan";

/// Actuary, third-party administrator and PBGC filing costs per year.
pub const CASH_BALANCE_ANNUAL_ADMIN_COST: Money = dec!(2_500);
pub const CASH_BALANCE_SETUP_COST: Money = dec!(3_500);

/// Rough maximum deductible contribution by owner age. The allowable
/// contribution rises steeply with age because the benefit is funded over
/// fewer years.
fn contribution_ceiling(age: Option<u32>) -> Money {
    match age {
        Some(a) if a >= 60 => dec!(300_000),
        Some(a) if a >= 50 => dec!(250_000),
        Some(a) if a >= 40 => dec!(150_000),
        _ => dec!(100_000),
    }
}

/// Deductible pension contribution funded from up to half the annual
/// surplus, valued at the marginal rate and net of plan administration.
pub fn cash_balance_plan(ctx: &AssessmentContext<'_>) -> Option<StrategyEstimate> {
    if !ctx.gates.cash_balance_plan_soon {
        return None;
    }

    let ceiling = contribution_ceiling(ctx.assessment.profile.age);
    let affordable = (ctx.gates.annualized_surplus / dec!(2)).round_dp(0);
    let contribution = ceiling.min(affordable);
    if contribution <= Decimal::ZERO {
        return None;
    }

    let rate = ctx.marginal_rate();
    let savings = contribution * rate - CASH_BALANCE_ANNUAL_ADMIN_COST;
    if savings <= Decimal::ZERO {
        return None;
    }

    let mut est = StrategyEstimate::new(CASH_BALANCE_PLAN, savings)
        .risk(3)
        .complexity(4)
        .outlay(CASH_BALANCE_SETUP_COST)
        .step("Engage a plan actuary for a contribution illustration", None)
        .step("Sign the plan adoption agreement", ctx.next_deadline(12, 31))
        .step("Fund the first-year contribution", None)
        .flag("contribution", contribution)
        .flag("ceiling", ceiling)
        .flag("marginal_rate", rate);
    if !ctx.assessment.entities.is_empty() {
        est = est.document("Payroll register for all eligible employees");
    }
    Some(est)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::*;
    use crate::strategies::calculators::test_support::run;

    fn high_earner(age: Option<u32>, monthly_surplus: Decimal) -> Assessment {
        Assessment {
            profile: Profile {
                age,
                ..Default::default()
            },
            income: Income {
                self_employment_net: dec!(400_000),
                ..Default::default()
            },
            cashflow: Cashflow {
                monthly_surplus,
                emergency_fund_months: dec!(6),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_contribution_limited_by_surplus() {
        // 10k/month => 120k/year, half is 60k; below the 250k age-55 ceiling
        let est = run(cash_balance_plan, &high_earner(Some(55), dec!(10_000))).unwrap();
        assert_eq!(est.flags["contribution"], "60000");
        // 400k - 15,750 => 35% bracket: 60k * 0.35 - 2,500
        assert_eq!(est.savings_est, dec!(18500));
    }

    #[test]
    fn test_contribution_limited_by_age_band() {
        let est = run(cash_balance_plan, &high_earner(Some(35), dec!(30_000))).unwrap();
        assert_eq!(est.flags["contribution"], "100000");
    }

    #[test]
    fn test_abstains_below_gate() {
        assert!(run(cash_balance_plan, &high_earner(Some(55), dec!(4_000))).is_none());
    }

    #[test]
    fn test_ceiling_bands() {
        assert_eq!(contribution_ceiling(None), dec!(100_000));
        assert_eq!(contribution_ceiling(Some(49)), dec!(150_000));
        assert_eq!(contribution_ceiling(Some(60)), dec!(300_000));
    }
}
