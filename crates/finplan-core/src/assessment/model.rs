use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Percent};

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    #[default]
    Single,
    MarriedFilingJointly,
    MarriedFilingSeparately,
    HeadOfHousehold,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Profile {
    pub filing_status: FilingStatus,
    /// Two-letter upper-case jurisdiction code, empty when unknown.
    pub state: String,
    pub dependents: u32,
    pub age: Option<u32>,
}

// ---------------------------------------------------------------------------
// Income and entities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Income {
    pub w2: Money,
    pub self_employment_net: Money,
    pub pass_through_income: Vec<Money>,
    pub rental_net_income: Vec<Money>,
}

impl Income {
    pub fn pass_through_total(&self) -> Money {
        self.pass_through_income.iter().copied().sum()
    }

    pub fn rental_total(&self) -> Money {
        self.rental_net_income.iter().copied().sum()
    }

    /// W-2 plus every business and rental line. Used for bracket lookups only.
    pub fn total(&self) -> Money {
        self.w2 + self.self_employment_net + self.pass_through_total() + self.rental_total()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    #[default]
    SoleProprietorship,
    SingleMemberLlc,
    Partnership,
    SCorp,
    CCorp,
}

impl EntityType {
    /// Entities whose income flows through to the owner's return.
    pub fn is_pass_through(self) -> bool {
        matches!(self, EntityType::Partnership | EntityType::SCorp)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Entity {
    pub name: String,
    pub entity_type: EntityType,
    pub ownership_pct: Percent,
    pub reasonable_compensation: Money,
}

// ---------------------------------------------------------------------------
// Real estate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyUse {
    #[default]
    PrimaryResidence,
    LongTermRental,
    ShortTermRental,
    Commercial,
    Vacation,
}

impl PropertyUse {
    /// Use classes that generate depreciable business basis.
    pub fn is_depreciable(self) -> bool {
        matches!(
            self,
            PropertyUse::LongTermRental | PropertyUse::ShortTermRental | PropertyUse::Commercial
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Property {
    pub name: String,
    pub use_class: PropertyUse,
    pub cost_basis: Money,
    pub land_allocation_pct: Percent,
    pub placed_in_service: Option<NaiveDate>,
    pub bonus_depreciation_eligible: bool,
}

impl Property {
    /// Cost basis net of the land allocation. Land never depreciates.
    pub fn building_basis(&self) -> Money {
        let land_share = self.land_allocation_pct / Decimal::ONE_HUNDRED;
        (self.cost_basis * (Decimal::ONE - land_share)).max(Decimal::ZERO)
    }
}

// ---------------------------------------------------------------------------
// Debts and cash flow
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtKind {
    CreditCard,
    AutoLoan,
    StudentLoan,
    PersonalLoan,
    Mortgage,
    Heloc,
    #[default]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Debt {
    pub name: String,
    pub kind: DebtKind,
    pub balance: Money,
    /// Annual percentage rate as a percent, in [0, 100).
    pub apr: Percent,
    pub min_payment: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Cashflow {
    pub monthly_surplus: Money,
    pub emergency_fund_months: Decimal,
}

impl Cashflow {
    pub fn annualized_surplus(&self) -> Money {
        self.monthly_surplus * Decimal::from(12)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Preferences {
    pub wants_short_term_rental: bool,
    pub willing_to_self_manage: bool,
    pub giving_annual: Money,
}

// ---------------------------------------------------------------------------
// Supplemental facts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RetirementContributions {
    pub employee_deferrals: Money,
    pub ira_contributions: Money,
    pub hsa_contributions: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ItemizedInputs {
    pub mortgage_interest: Money,
    pub state_and_local_taxes: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Protection {
    pub has_umbrella_policy: bool,
    pub has_disability_cover: bool,
    pub has_term_life: bool,
    pub has_estate_documents: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Investments {
    pub taxable_brokerage: Money,
    pub retirement_balances: Money,
}

/// Canonical, validated household snapshot. Build one through
/// [`crate::assessment::validate_intake`] at the system boundary; every engine
/// function assumes the invariants that step enforces.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Assessment {
    pub profile: Profile,
    pub income: Income,
    pub entities: Vec<Entity>,
    pub properties: Vec<Property>,
    pub debts: Vec<Debt>,
    pub cashflow: Cashflow,
    pub preferences: Preferences,
    pub retirement: RetirementContributions,
    pub itemized: ItemizedInputs,
    pub protection: Protection,
    pub investments: Investments,
    /// Lower-case strategy codes the household has selected or already runs.
    pub selected_strategies: Vec<String>,
}

impl Assessment {
    pub fn has_business(&self) -> bool {
        self.income.self_employment_net > Decimal::ZERO || !self.entities.is_empty()
    }

    pub fn owns_primary_residence(&self) -> bool {
        self.properties
            .iter()
            .any(|p| p.use_class == PropertyUse::PrimaryResidence)
    }

    pub fn has_entity(&self, entity_type: EntityType) -> bool {
        self.entities.iter().any(|e| e.entity_type == entity_type)
    }

    pub fn has_selected(&self, code: &str) -> bool {
        self.selected_strategies.iter().any(|c| c == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_building_basis_excludes_land() {
        let property = Property {
            cost_basis: dec!(500_000),
            land_allocation_pct: dec!(20),
            ..Default::default()
        };
        assert_eq!(property.building_basis(), dec!(400_000));
    }

    #[test]
    fn test_income_totals() {
        let income = Income {
            w2: dec!(100_000),
            self_employment_net: dec!(20_000),
            pass_through_income: vec![dec!(5_000), dec!(7_500)],
            rental_net_income: vec![dec!(3_000)],
        };
        assert_eq!(income.pass_through_total(), dec!(12_500));
        assert_eq!(income.total(), dec!(135_500));
    }
}
