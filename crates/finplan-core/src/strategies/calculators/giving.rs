use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::strategies::context::AssessmentContext;
use crate::strategies::estimate::StrategyEstimate;
use crate::tax_tables;

pub const CHARITABLE_BUNCHING: &str = "charitable_bunching";

/// Years of giving pre-funded into a donor-advised fund in one tax year.
pub const BUNCHING_YEARS: u32 = 3;

/// Households that give but take the standard deduction can pre-fund several
/// years of gifts in one year, itemize that year and take the standard
/// deduction in the others.
pub fn charitable_bunching(ctx: &AssessmentContext<'_>) -> Option<StrategyEstimate> {
    let a = ctx.assessment;
    let giving = a.preferences.giving_annual;
    if giving <= Decimal::ZERO || ctx.gates.itemize_likely {
        return None;
    }

    let years = Decimal::from(BUNCHING_YEARS);
    let salt = a
        .itemized
        .state_and_local_taxes
        .min(tax_tables::salt_cap(a.profile.filing_status));
    let bunched_itemized = giving * years + a.itemized.mortgage_interest + salt;
    let extra_deduction = bunched_itemized - ctx.gates.standard_deduction;
    if extra_deduction <= Decimal::ZERO {
        return None;
    }

    let rate = ctx.marginal_rate();
    let per_year = (extra_deduction / years).round_dp(2);
    Some(
        StrategyEstimate::new(CHARITABLE_BUNCHING, per_year * rate)
            .risk(1)
            .complexity(2)
            .step("Open a donor-advised fund account", None)
            .step(
                format!(
                    "Contribute ${} covering {BUNCHING_YEARS} years of giving",
                    (giving * years).round_dp(0)
                ),
                ctx.next_deadline(12, 31),
            )
            .step("Grant from the fund on the usual schedule", None)
            .flag("bunched_contribution", (giving * years).round_dp(0))
            .flag("extra_deduction", extra_deduction.round_dp(0))
            .flag("cycle_years", BUNCHING_YEARS)
            .flag(
                "break_even_gift",
                break_even_gift(ctx.gates.standard_deduction),
            )
            .flag("marginal_rate", rate),
    )
}

/// Minimum annual gift at which bunching beats the standard deduction,
/// ignoring other itemized items.
pub fn break_even_gift(standard_deduction: Decimal) -> Decimal {
    (standard_deduction / Decimal::from(BUNCHING_YEARS)).round_dp(0) + dec!(1)
}
