use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// All monetary values at the engine boundary. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%).
pub type Rate = Decimal;

/// Percentages expressed as percent (24.99 = 24.99%). Used for APRs and ownership shares.
pub type Percent = Decimal;

/// Integer minor units (cents). The debt simulator works exclusively in this unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cents(pub i64);

impl Cents {
    pub const ZERO: Cents = Cents(0);

    /// Convert dollars to cents, rounding half away from zero and saturating at the i64 range.
    pub fn from_money(amount: Money) -> Cents {
        let saturated = if amount.is_sign_negative() {
            Cents(i64::MIN)
        } else {
            Cents(i64::MAX)
        };
        match amount.checked_mul(Decimal::ONE_HUNDRED) {
            Some(scaled) => scaled
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64().map(Cents).unwrap_or(saturated),
            None => saturated,
        }
    }

    pub fn to_money(self) -> Money {
        Decimal::new(self.0, 2)
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn saturating_add(self, other: Cents) -> Cents {
        Cents(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Cents) -> Cents {
        Cents(self.0.saturating_sub(other.0))
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_money())
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit; debt simulation in integer cents".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cents_round_trip_boundary() {
        assert_eq!(Cents::from_money(dec!(18_000)), Cents(1_800_000));
        assert_eq!(Cents::from_money(dec!(0.005)), Cents(1));
        assert_eq!(Cents(1_234_56).to_money(), dec!(1234.56));
    }

    #[test]
    fn test_cents_saturates_instead_of_overflowing() {
        assert_eq!(Cents::from_money(Decimal::MAX), Cents(i64::MAX));
        assert_eq!(Cents::from_money(Decimal::MIN), Cents(i64::MIN));
        assert_eq!(Cents(i64::MAX).saturating_add(Cents(5)), Cents(i64::MAX));
    }
}
