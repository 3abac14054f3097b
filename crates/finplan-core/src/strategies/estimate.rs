use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::Money;

/// How often `savings_est` recurs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SavingsCadence {
    #[default]
    Annual,
    Monthly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyStep {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

/// One calculator's recommendation. Produced only when the calculator found a
/// basis for it; "not applicable" is the absence of an estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyEstimate {
    pub code: String,
    pub savings_est: Money,
    pub cadence: SavingsCadence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cash_outlay_est: Option<Money>,
    /// 1 (low) to 5 (high)
    pub risk_score: u8,
    /// 1 (simple) to 5 (involved)
    pub complexity: u8,
    pub steps: Vec<StrategyStep>,
    /// Household-specific supporting documents, in addition to the registry's.
    pub documents: Vec<String>,
    pub flags: BTreeMap<String, String>,
}

impl StrategyEstimate {
    pub fn new(code: &str, savings_est: Money) -> Self {
        Self {
            code: code.to_string(),
            savings_est: savings_est.round_dp(2),
            cadence: SavingsCadence::Annual,
            cash_outlay_est: None,
            risk_score: 1,
            complexity: 1,
            steps: Vec::new(),
            documents: Vec::new(),
            flags: BTreeMap::new(),
        }
    }

    pub fn monthly(mut self) -> Self {
        self.cadence = SavingsCadence::Monthly;
        self
    }

    pub fn risk(mut self, score: u8) -> Self {
        self.risk_score = score.clamp(1, 5);
        self
    }

    pub fn complexity(mut self, score: u8) -> Self {
        self.complexity = score.clamp(1, 5);
        self
    }

    pub fn outlay(mut self, amount: Money) -> Self {
        self.cash_outlay_est = Some(amount.round_dp(2));
        self
    }

    pub fn step(mut self, label: impl Into<String>, due_date: Option<NaiveDate>) -> Self {
        self.steps.push(StrategyStep {
            label: label.into(),
            due_date,
        });
        self
    }

    pub fn document(mut self, name: impl Into<String>) -> Self {
        self.documents.push(name.into());
        self
    }

    pub fn flag(mut self, key: &str, value: impl ToString) -> Self {
        self.flags.insert(key.to_string(), value.to_string());
        self
    }

    /// Savings normalised to a yearly figure for ranking.
    pub fn annualized_savings(&self) -> Money {
        match self.cadence {
            SavingsCadence::Annual => self.savings_est,
            SavingsCadence::Monthly => self.savings_est * Decimal::from(12),
        }
    }
}

/// The result of running one registered calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyOutcome {
    pub code: String,
    pub title: String,
    pub estimate: Option<StrategyEstimate>,
}

impl StrategyOutcome {
    pub fn is_eligible(&self) -> bool {
        self.estimate.is_some()
    }

    pub fn annualized_savings(&self) -> Option<Money> {
        self.estimate.as_ref().map(StrategyEstimate::annualized_savings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_monthly_cadence_annualizes() {
        let est = StrategyEstimate::new("x", dec!(250)).monthly();
        assert_eq!(est.annualized_savings(), dec!(3000));
    }

    #[test]
    fn test_scores_are_clamped() {
        let est = StrategyEstimate::new("x", dec!(1)).risk(9).complexity(0);
        assert_eq!(est.risk_score, 5);
        assert_eq!(est.complexity, 1);
    }
}
