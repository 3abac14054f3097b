use rust_decimal::Decimal;

use crate::strategies::context::AssessmentContext;
use crate::strategies::estimate::StrategyEstimate;
use crate::tax_tables::{CATCH_UP_AGE, CATCH_UP_LIMIT, ELECTIVE_DEFERRAL_LIMIT};

pub const RETIREMENT_GAP: &str = "retirement_gap";

/// Unused elective deferral room valued at the household's marginal rate.
///
/// Abstains when there is no W-2 income or no remaining room.
pub fn retirement_gap(ctx: &AssessmentContext<'_>) -> Option<StrategyEstimate> {
    let a = ctx.assessment;
    if a.income.w2 <= Decimal::ZERO {
        return None;
    }

    let catch_up = match a.profile.age {
        Some(age) if age >= CATCH_UP_AGE => CATCH_UP_LIMIT,
        _ => Decimal::ZERO,
    };
    let limit = (ELECTIVE_DEFERRAL_LIMIT + catch_up).min(a.income.w2);
    let gap = limit - a.retirement.employee_deferrals;
    if gap <= Decimal::ZERO {
        return None;
    }

    let rate = ctx.marginal_rate();
    let per_month = (gap / Decimal::from(12)).round_dp(0);

    Some(
        StrategyEstimate::new(RETIREMENT_GAP, gap * rate)
            .risk(1)
            .complexity(1)
            .step(
                format!("Raise payroll deferrals by about ${per_month} per month"),
                None,
            )
            .step(
                "Confirm year-to-date deferrals before the final payroll",
                ctx.next_deadline(12, 31),
            )
            .flag("limit", limit)
            .flag("current_deferrals", a.retirement.employee_deferrals)
            .flag("gap", gap)
            .flag("marginal_rate", rate),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::*;
    use crate::strategies::calculators::test_support::run;
    use rust_decimal_macros::dec;

    fn employee(w2: Decimal, deferrals: Decimal) -> Assessment {
        Assessment {
            income: Income {
                w2,
                ..Default::default()
            },
            retirement: RetirementContributions {
                employee_deferrals: deferrals,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_gap_times_marginal_rate() {
        // 120k W-2 single: taxable 104,250 -> 24% bracket
        let est = run(retirement_gap, &employee(dec!(120_000), dec!(10_000))).unwrap();
        assert_eq!(est.savings_est, dec!(3240)); // 13,500 * 0.24
        assert_eq!(est.flags["gap"], "13500");
    }

    #[test]
    fn test_abstains_without_w2() {
        assert!(run(retirement_gap, &employee(dec!(0), dec!(0))).is_none());
    }

    #[test]
    fn test_abstains_when_maxed() {
        assert!(run(retirement_gap, &employee(dec!(200_000), dec!(23_500))).is_none());
    }

    #[test]
    fn test_catch_up_raises_limit() {
        let mut a = employee(dec!(200_000), dec!(23_500));
        a.profile.age = Some(55);
        let est = run(retirement_gap, &a).unwrap();
        assert_eq!(est.flags["gap"], "7500");
    }

    #[test]
    fn test_limit_capped_at_wages() {
        let est = run(retirement_gap, &employee(dec!(10_000), dec!(0))).unwrap();
        assert_eq!(est.flags["limit"], "10000");
    }
}
