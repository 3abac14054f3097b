//! Coarse federal reference figures used by the gates, calculators and roadmap.
//!
//! These drive order-of-magnitude estimates only. Nothing here computes a
//! liability; the marginal rate is a bracket lookup on an approximate taxable
//! income.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::assessment::{Assessment, FilingStatus};
use crate::types::{Money, Rate};

/// Employee elective deferral limit for 401(k)/403(b) plans.
pub const ELECTIVE_DEFERRAL_LIMIT: Money = dec!(23_500);
/// Additional deferral allowed from age 50.
pub const CATCH_UP_LIMIT: Money = dec!(7_500);
pub const CATCH_UP_AGE: u32 = 50;
/// IRA contribution limit (under 50).
pub const IRA_LIMIT: Money = dec!(7_000);

/// Self-employment tax rate applied below the wage base.
pub const SE_TAX_RATE: Rate = dec!(0.153);

/// Cap on the state and local tax itemized deduction.
pub const SALT_DEDUCTION_CAP: Money = dec!(40_000);

pub fn standard_deduction(status: FilingStatus) -> Money {
    match status {
        FilingStatus::Single | FilingStatus::MarriedFilingSeparately => dec!(15_750),
        FilingStatus::MarriedFilingJointly => dec!(31_500),
        FilingStatus::HeadOfHousehold => dec!(23_625),
    }
}

pub fn salt_cap(status: FilingStatus) -> Money {
    match status {
        FilingStatus::MarriedFilingSeparately => SALT_DEDUCTION_CAP / dec!(2),
        _ => SALT_DEDUCTION_CAP,
    }
}

/// Upper bounds of the 10/12/22/24/32/35% brackets; income above the last bound is taxed at 37%.
fn bracket_bounds(status: FilingStatus) -> [Money; 6] {
    match status {
        FilingStatus::Single => [
            dec!(11_925),
            dec!(48_475),
            dec!(103_350),
            dec!(197_300),
            dec!(250_525),
            dec!(626_350),
        ],
        FilingStatus::MarriedFilingJointly => [
            dec!(23_850),
            dec!(96_950),
            dec!(206_700),
            dec!(394_600),
            dec!(501_050),
            dec!(751_600),
        ],
        FilingStatus::MarriedFilingSeparately => [
            dec!(11_925),
            dec!(48_475),
            dec!(103_350),
            dec!(197_300),
            dec!(250_525),
            dec!(375_800),
        ],
        FilingStatus::HeadOfHousehold => [
            dec!(17_000),
            dec!(64_850),
            dec!(103_350),
            dec!(197_300),
            dec!(250_500),
            dec!(626_350),
        ],
    }
}

const BRACKET_RATES: [Rate; 7] = [
    dec!(0.10),
    dec!(0.12),
    dec!(0.22),
    dec!(0.24),
    dec!(0.32),
    dec!(0.35),
    dec!(0.37),
];

/// Federal marginal rate for a taxable income.
pub fn marginal_rate_for(status: FilingStatus, taxable_income: Money) -> Rate {
    let bounds = bracket_bounds(status);
    bounds
        .iter()
        .position(|bound| taxable_income <= *bound)
        .map(|i| BRACKET_RATES[i])
        .unwrap_or(BRACKET_RATES[6])
}

/// Marginal rate proxy for the household: total income less the standard deduction.
pub fn marginal_rate_proxy(assessment: &Assessment) -> Rate {
    let status = assessment.profile.filing_status;
    let taxable = (assessment.income.total() - standard_deduction(status)).max(Decimal::ZERO);
    marginal_rate_for(status, taxable)
}
