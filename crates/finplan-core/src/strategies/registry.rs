use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use super::calculators;
use super::context::AssessmentContext;
use super::estimate::StrategyEstimate;
use crate::error::PlannerError;
use crate::PlannerResult;

/// A strategy calculator: abstains with `None` or returns an estimate.
pub type Calculator = fn(&AssessmentContext<'_>) -> Option<StrategyEstimate>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyCategory {
    Retirement,
    Entity,
    Deductions,
    RealEstate,
    Deferral,
    StateTax,
}

/// Tagged function-table entry: a stable code, display metadata and the calculator.
#[derive(Clone, Copy)]
pub struct StrategyEntry {
    pub code: &'static str,
    pub title: &'static str,
    pub category: StrategyCategory,
    pub documents: &'static [&'static str],
    pub deadlines: &'static [&'static str],
    pub calculator: Calculator,
}

impl fmt::Debug for StrategyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyEntry")
            .field("code", &self.code)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

/// Ordered collection of calculators. Registration order is the tie-break
/// order used by ranking.
#[derive(Debug, Clone, Default)]
pub struct StrategyRegistry {
    entries: Vec<StrategyEntry>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Codes must be unique.
    pub fn register(&mut self, entry: StrategyEntry) -> PlannerResult<()> {
        if self.get(entry.code).is_some() {
            return Err(PlannerError::invalid(
                "code",
                format!("Strategy '{}' is already registered", entry.code),
            ));
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn get(&self, code: &str) -> Option<&StrategyEntry> {
        self.entries.iter().find(|e| e.code == code)
    }

    pub fn entries(&self) -> &[StrategyEntry] {
        &self.entries
    }

    pub fn codes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The built-in calculator set, resolved once per process.
    pub fn standard() -> &'static StrategyRegistry {
        static STANDARD: OnceLock<StrategyRegistry> = OnceLock::new();
        STANDARD.get_or_init(|| StrategyRegistry {
            entries: STANDARD_ENTRIES.to_vec(),
        })
    }
}

const STANDARD_ENTRIES: [StrategyEntry; 9] = [
    StrategyEntry {
        code: calculators::retirement::RETIREMENT_GAP,
        title: "Close the workplace retirement contribution gap",
        category: StrategyCategory::Retirement,
        documents: &["Most recent pay stub", "401(k) plan summary"],
        deadlines: &["December 31: final payroll deferral election"],
        calculator: calculators::retirement::retirement_gap,
    },
    StrategyEntry {
        code: calculators::entity::S_CORP_ELECTION,
        title: "Elect S-corporation tax status",
        category: StrategyCategory::Entity,
        documents: &[
            "Form 2553",
            "EIN confirmation letter",
            "Reasonable compensation study",
        ],
        deadlines: &["March 15: Form 2553 for a current-year election"],
        calculator: calculators::entity::s_corp_election,
    },
    StrategyEntry {
        code: calculators::entity::AUGUSTA_RULE,
        title: "Rent your home to your business (14-day rule)",
        category: StrategyCategory::Entity,
        documents: &[
            "Rental agreement",
            "Comparable rental quotes",
            "Meeting minutes and agendas",
            "W-9",
        ],
        deadlines: &["December 31: business pays rent for the year's meetings"],
        calculator: calculators::entity::augusta_rule,
    },
    StrategyEntry {
        code: calculators::deferral::CASH_BALANCE_PLAN,
        title: "Adopt a cash balance pension plan",
        category: StrategyCategory::Deferral,
        documents: &[
            "Employee census",
            "Prior-year business tax return",
            "Plan adoption agreement",
        ],
        deadlines: &[
            "December 31: adopt the plan document",
            "Extended business return due date: fund the contribution",
        ],
        calculator: calculators::deferral::cash_balance_plan,
    },
    StrategyEntry {
        code: calculators::real_estate::SHORT_TERM_RENTAL,
        title: "Acquire a self-managed short-term rental",
        category: StrategyCategory::RealEstate,
        documents: &[
            "Closing disclosure",
            "Cost segregation study",
            "Material participation time log",
        ],
        deadlines: &["December 31: place the property in service"],
        calculator: calculators::real_estate::short_term_rental,
    },
    StrategyEntry {
        code: calculators::state_tax::PTET_ELECTION,
        title: "Make the pass-through entity tax election",
        category: StrategyCategory::StateTax,
        documents: &["Schedule K-1", "State PTET election form"],
        deadlines: &["State election deadline (commonly March 15)"],
        calculator: calculators::state_tax::ptet_election,
    },
    StrategyEntry {
        code: calculators::real_estate::COST_SEGREGATION,
        title: "Commission a cost segregation study",
        category: StrategyCategory::RealEstate,
        documents: &["Closing disclosure", "Depreciation schedule"],
        deadlines: &["October 15: extended return (Form 3115 if catching up)"],
        calculator: calculators::real_estate::cost_segregation,
    },
    StrategyEntry {
        code: calculators::giving::CHARITABLE_BUNCHING,
        title: "Bunch charitable giving through a donor-advised fund",
        category: StrategyCategory::Deductions,
        documents: &[
            "Donor-advised fund statement",
            "Charitable contribution receipts",
        ],
        deadlines: &["December 31: fund the donor-advised account"],
        calculator: calculators::giving::charitable_bunching,
    },
    StrategyEntry {
        code: calculators::entity::HIRE_YOUR_CHILDREN,
        title: "Employ your children in the business",
        category: StrategyCategory::Entity,
        documents: &["Job descriptions", "Timesheets", "Form W-4"],
        deadlines: &["January 31: issue W-2s to employed children"],
        calculator: calculators::entity::hire_your_children,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_codes_are_unique_and_ordered() {
        let registry = StrategyRegistry::standard();
        let codes: Vec<&str> = registry.codes().collect();
        assert_eq!(codes.len(), 9);
        assert_eq!(codes[0], "retirement_gap");

        let mut rebuilt = StrategyRegistry::new();
        for entry in registry.entries() {
            rebuilt.register(*entry).unwrap();
        }
        assert_eq!(rebuilt.len(), registry.len());
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = StrategyRegistry::new();
        let entry = StrategyRegistry::standard().entries()[0];
        registry.register(entry).unwrap();
        assert!(registry.register(entry).is_err());
    }
}
