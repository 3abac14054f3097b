use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Money;

/// Emergency-fund months at or above which liquidity counts as adequate.
pub const LIQUIDITY_MONTHS: Decimal = dec!(3);

/// Self-employment net plus entity wages needed before an S-corp election pays off.
pub const S_CORP_MIN_BUSINESS_INCOME: Money = dec!(50_000);
/// Annualized surplus needed to absorb S-corp payroll and filing overhead.
pub const S_CORP_MIN_ANNUAL_SURPLUS: Money = dec!(20_000);

/// Business income at which a cash balance plan is worth scoping.
pub const CASH_BALANCE_MIN_BUSINESS_INCOME: Money = dec!(200_000);
/// Annualized surplus needed to fund a cash balance plan contribution.
pub const CASH_BALANCE_MIN_ANNUAL_SURPLUS: Money = dec!(60_000);

/// Annualized surplus needed before recommending a short-term rental acquisition.
pub const SHORT_TERM_RENTAL_MIN_ANNUAL_SURPLUS: Money = dec!(100_000);

/// Policy thresholds for the gating evaluator.
///
/// `Default` reproduces the named constants above; hosts override individual
/// values through configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateThresholds {
    pub liquidity_months: Decimal,
    pub s_corp_min_business_income: Money,
    pub s_corp_min_annual_surplus: Money,
    pub cash_balance_min_business_income: Money,
    pub cash_balance_min_annual_surplus: Money,
    pub short_term_rental_min_annual_surplus: Money,
}

impl Default for GateThresholds {
    fn default() -> Self {
        Self {
            liquidity_months: LIQUIDITY_MONTHS,
            s_corp_min_business_income: S_CORP_MIN_BUSINESS_INCOME,
            s_corp_min_annual_surplus: S_CORP_MIN_ANNUAL_SURPLUS,
            cash_balance_min_business_income: CASH_BALANCE_MIN_BUSINESS_INCOME,
            cash_balance_min_annual_surplus: CASH_BALANCE_MIN_ANNUAL_SURPLUS,
            short_term_rental_min_annual_surplus: SHORT_TERM_RENTAL_MIN_ANNUAL_SURPLUS,
        }
    }
}
