use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::model::*;
use crate::error::PlannerError;
use crate::types::{Money, Percent};
use crate::PlannerResult;

const MAX_AGE: u32 = 120;

/// Largest amount accepted for any money field ($1 trillion). Keeps every
/// downstream product and the simulator's integer cents in range.
pub const MAX_MONEY: Money = dec!(1_000_000_000_000);

// ---------------------------------------------------------------------------
// Loosely-typed intake, as posted by the web layer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileIntake {
    pub filing_status: Option<String>,
    pub state: Option<String>,
    pub dependents: Option<u32>,
    pub age: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IncomeIntake {
    pub w2: Option<Money>,
    pub self_employment_net: Option<Money>,
    pub pass_through_income: Vec<Money>,
    pub rental_net_income: Vec<Money>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityIntake {
    pub name: Option<String>,
    #[serde(rename = "type", alias = "entity_type")]
    pub entity_type: Option<String>,
    pub ownership_pct: Option<Percent>,
    pub reasonable_compensation: Option<Money>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyIntake {
    pub name: Option<String>,
    pub use_class: Option<String>,
    pub cost_basis: Option<Money>,
    pub land_allocation_pct: Option<Percent>,
    pub placed_in_service: Option<String>,
    pub bonus_depreciation_eligible: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DebtIntake {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub balance: Option<Money>,
    pub apr: Option<Percent>,
    pub min_payment: Option<Money>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CashflowIntake {
    pub monthly_surplus: Option<Money>,
    pub emergency_fund_months: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferencesIntake {
    pub wants_short_term_rental: Option<bool>,
    pub willing_to_self_manage: Option<bool>,
    pub giving_annual: Option<Money>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RetirementIntake {
    pub employee_deferrals: Option<Money>,
    pub ira_contributions: Option<Money>,
    pub hsa_contributions: Option<Money>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemizedIntake {
    pub mortgage_interest: Option<Money>,
    pub state_and_local_taxes: Option<Money>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtectionIntake {
    pub has_umbrella_policy: Option<bool>,
    pub has_disability_cover: Option<bool>,
    pub has_term_life: Option<bool>,
    pub has_estate_documents: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvestmentsIntake {
    pub taxable_brokerage: Option<Money>,
    pub retirement_balances: Option<Money>,
}

/// Untrusted household intake. Every field is optional; absent values
/// normalise to zero, false or empty during validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentIntake {
    pub profile: ProfileIntake,
    pub income: IncomeIntake,
    pub entities: Vec<EntityIntake>,
    pub properties: Vec<PropertyIntake>,
    pub debts: Vec<DebtIntake>,
    pub cashflow: CashflowIntake,
    pub preferences: PreferencesIntake,
    pub retirement: RetirementIntake,
    pub itemized: ItemizedIntake,
    pub protection: ProtectionIntake,
    pub investments: InvestmentsIntake,
    pub selected_strategies: Vec<String>,
}

// ---------------------------------------------------------------------------
// Validation boundary
// ---------------------------------------------------------------------------

/// Validate and normalise an intake into a fully-typed [`Assessment`].
///
/// Rejects negative money or money above [`MAX_MONEY`], APRs outside [0, 100),
/// percentages outside [0, 100], negative emergency-fund months, malformed
/// state codes and dates. Optional fields default to zero/false/empty.
pub fn validate_intake(intake: &AssessmentIntake) -> PlannerResult<Assessment> {
    let profile = validate_profile(&intake.profile)?;

    let income = Income {
        w2: money("income.w2", intake.income.w2)?,
        self_employment_net: money(
            "income.self_employment_net",
            intake.income.self_employment_net,
        )?,
        pass_through_income: money_list(
            "income.pass_through_income",
            &intake.income.pass_through_income,
        )?,
        rental_net_income: money_list("income.rental_net_income", &intake.income.rental_net_income)?,
    };

    let entities = intake
        .entities
        .iter()
        .enumerate()
        .map(|(i, e)| validate_entity(i, e))
        .collect::<PlannerResult<Vec<_>>>()?;

    let properties = intake
        .properties
        .iter()
        .enumerate()
        .map(|(i, p)| validate_property(i, p))
        .collect::<PlannerResult<Vec<_>>>()?;

    let debts = intake
        .debts
        .iter()
        .enumerate()
        .map(|(i, d)| validate_debt(i, d))
        .collect::<PlannerResult<Vec<_>>>()?;

    let emergency_fund_months = intake
        .cashflow
        .emergency_fund_months
        .unwrap_or(Decimal::ZERO);
    if emergency_fund_months < Decimal::ZERO {
        return Err(PlannerError::invalid(
            "cashflow.emergency_fund_months",
            "Emergency fund months cannot be negative",
        ));
    }
    let cashflow = Cashflow {
        monthly_surplus: money("cashflow.monthly_surplus", intake.cashflow.monthly_surplus)?,
        emergency_fund_months,
    };

    let preferences = Preferences {
        wants_short_term_rental: intake.preferences.wants_short_term_rental.unwrap_or(false),
        willing_to_self_manage: intake.preferences.willing_to_self_manage.unwrap_or(false),
        giving_annual: money("preferences.giving_annual", intake.preferences.giving_annual)?,
    };

    let retirement = RetirementContributions {
        employee_deferrals: money(
            "retirement.employee_deferrals",
            intake.retirement.employee_deferrals,
        )?,
        ira_contributions: money(
            "retirement.ira_contributions",
            intake.retirement.ira_contributions,
        )?,
        hsa_contributions: money(
            "retirement.hsa_contributions",
            intake.retirement.hsa_contributions,
        )?,
    };

    let itemized = ItemizedInputs {
        mortgage_interest: money("itemized.mortgage_interest", intake.itemized.mortgage_interest)?,
        state_and_local_taxes: money(
            "itemized.state_and_local_taxes",
            intake.itemized.state_and_local_taxes,
        )?,
    };

    let protection = Protection {
        has_umbrella_policy: intake.protection.has_umbrella_policy.unwrap_or(false),
        has_disability_cover: intake.protection.has_disability_cover.unwrap_or(false),
        has_term_life: intake.protection.has_term_life.unwrap_or(false),
        has_estate_documents: intake.protection.has_estate_documents.unwrap_or(false),
    };

    let investments = Investments {
        taxable_brokerage: money(
            "investments.taxable_brokerage",
            intake.investments.taxable_brokerage,
        )?,
        retirement_balances: money(
            "investments.retirement_balances",
            intake.investments.retirement_balances,
        )?,
    };

    Ok(Assessment {
        profile,
        income,
        entities,
        properties,
        debts,
        cashflow,
        preferences,
        retirement,
        itemized,
        protection,
        investments,
        selected_strategies: normalize_codes(&intake.selected_strategies),
    })
}

/// Parse an intake JSON document and validate it in one step.
pub fn assessment_from_json(json: &str) -> PlannerResult<Assessment> {
    let intake: AssessmentIntake = serde_json::from_str(json)?;
    validate_intake(&intake)
}

fn validate_profile(intake: &ProfileIntake) -> PlannerResult<Profile> {
    let filing_status = match intake.filing_status.as_deref() {
        Some(raw) => parse_filing_status(raw)?,
        None => FilingStatus::default(),
    };

    let state = intake
        .state
        .as_deref()
        .map(|s| s.trim().to_ascii_uppercase())
        .unwrap_or_default();
    if !state.is_empty() && (state.len() != 2 || !state.chars().all(|c| c.is_ascii_alphabetic()))
    {
        return Err(PlannerError::invalid(
            "profile.state",
            format!("'{state}' is not a two-letter jurisdiction code"),
        ));
    }

    if let Some(age) = intake.age {
        if age > MAX_AGE {
            return Err(PlannerError::invalid(
                "profile.age",
                format!("Age must be at most {MAX_AGE}"),
            ));
        }
    }

    Ok(Profile {
        filing_status,
        state,
        dependents: intake.dependents.unwrap_or(0),
        age: intake.age,
    })
}

fn validate_entity(index: usize, intake: &EntityIntake) -> PlannerResult<Entity> {
    let field = |name: &str| format!("entities[{index}].{name}");

    let entity_type = match intake.entity_type.as_deref() {
        Some(raw) => parse_entity_type(raw).ok_or_else(|| {
            PlannerError::invalid(field("type"), format!("Unknown entity type '{raw}'"))
        })?,
        None => EntityType::default(),
    };

    let ownership_pct = intake.ownership_pct.unwrap_or(Decimal::ONE_HUNDRED);
    percent(&field("ownership_pct"), ownership_pct)?;

    Ok(Entity {
        name: intake
            .name
            .clone()
            .unwrap_or_else(|| format!("Entity {}", index + 1)),
        entity_type,
        ownership_pct,
        reasonable_compensation: money(
            &field("reasonable_compensation"),
            intake.reasonable_compensation,
        )?,
    })
}

fn validate_property(index: usize, intake: &PropertyIntake) -> PlannerResult<Property> {
    let field = |name: &str| format!("properties[{index}].{name}");

    let use_class = match intake.use_class.as_deref() {
        Some(raw) => parse_property_use(raw).ok_or_else(|| {
            PlannerError::invalid(field("use_class"), format!("Unknown use class '{raw}'"))
        })?,
        None => PropertyUse::default(),
    };

    let land_allocation_pct = intake.land_allocation_pct.unwrap_or(Decimal::ZERO);
    percent(&field("land_allocation_pct"), land_allocation_pct)?;

    let placed_in_service = match intake.placed_in_service.as_deref() {
        Some(raw) if !raw.trim().is_empty() => Some(
            NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| {
                PlannerError::DateError(format!("{}: '{raw}' ({e})", field("placed_in_service")))
            })?,
        ),
        _ => None,
    };

    Ok(Property {
        name: intake
            .name
            .clone()
            .unwrap_or_else(|| format!("Property {}", index + 1)),
        use_class,
        cost_basis: money(&field("cost_basis"), intake.cost_basis)?,
        land_allocation_pct,
        placed_in_service,
        bonus_depreciation_eligible: intake.bonus_depreciation_eligible.unwrap_or(false),
    })
}

fn validate_debt(index: usize, intake: &DebtIntake) -> PlannerResult<Debt> {
    let field = |name: &str| format!("debts[{index}].{name}");

    let apr = intake.apr.unwrap_or(Decimal::ZERO);
    if apr < Decimal::ZERO || apr >= Decimal::ONE_HUNDRED {
        return Err(PlannerError::invalid(
            field("apr"),
            "APR must be a percentage in [0, 100)",
        ));
    }

    Ok(Debt {
        name: intake
            .name
            .clone()
            .unwrap_or_else(|| format!("Debt {}", index + 1)),
        kind: intake
            .kind
            .as_deref()
            .map(parse_debt_kind)
            .unwrap_or_default(),
        balance: money(&field("balance"), intake.balance)?,
        apr,
        min_payment: money(&field("min_payment"), intake.min_payment)?,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn money(field: &str, value: Option<Money>) -> PlannerResult<Money> {
    let value = value.unwrap_or(Decimal::ZERO);
    if value < Decimal::ZERO {
        return Err(PlannerError::invalid(field, "Amount cannot be negative"));
    }
    if value > MAX_MONEY {
        return Err(PlannerError::invalid(
            field,
            format!("Amount cannot exceed {MAX_MONEY}"),
        ));
    }
    Ok(value)
}

fn money_list(field: &str, values: &[Money]) -> PlannerResult<Vec<Money>> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| money(&format!("{field}[{i}]"), Some(*v)))
        .collect()
}

fn percent(field: &str, value: Percent) -> PlannerResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(PlannerError::invalid(
            field,
            "Percentage must be between 0 and 100",
        ));
    }
    Ok(())
}

/// Lower-case and trim codes, dropping blanks and repeats while keeping order.
pub(crate) fn normalize_codes(codes: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(codes.len());
    for code in codes {
        let code = code.trim().to_ascii_lowercase();
        if !code.is_empty() && !out.contains(&code) {
            out.push(code);
        }
    }
    out
}

fn slug(raw: &str) -> String {
    raw.trim()
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn parse_filing_status(raw: &str) -> PlannerResult<FilingStatus> {
    match slug(raw).as_str() {
        "single" | "s" => Ok(FilingStatus::Single),
        "married_filing_jointly" | "married_joint" | "mfj" | "joint" => {
            Ok(FilingStatus::MarriedFilingJointly)
        }
        "married_filing_separately" | "married_separate" | "mfs" => {
            Ok(FilingStatus::MarriedFilingSeparately)
        }
        "head_of_household" | "hoh" => Ok(FilingStatus::HeadOfHousehold),
        _ => Err(PlannerError::UnknownFilingStatus(raw.to_string())),
    }
}

fn parse_entity_type(raw: &str) -> Option<EntityType> {
    match slug(raw).as_str() {
        "sole_proprietorship" | "sole_prop" | "schedule_c" => Some(EntityType::SoleProprietorship),
        "llc" | "single_member_llc" | "smllc" => Some(EntityType::SingleMemberLlc),
        "partnership" | "multi_member_llc" | "lp" => Some(EntityType::Partnership),
        "s_corp" | "scorp" | "s_corporation" => Some(EntityType::SCorp),
        "c_corp" | "ccorp" | "c_corporation" => Some(EntityType::CCorp),
        _ => None,
    }
}

fn parse_property_use(raw: &str) -> Option<PropertyUse> {
    match slug(raw).as_str() {
        "primary" | "primary_residence" | "home" => Some(PropertyUse::PrimaryResidence),
        "rental" | "long_term_rental" | "ltr" => Some(PropertyUse::LongTermRental),
        "short_term_rental" | "str" | "vacation_rental" => Some(PropertyUse::ShortTermRental),
        "commercial" => Some(PropertyUse::Commercial),
        "vacation" | "second_home" => Some(PropertyUse::Vacation),
        _ => None,
    }
}

/// Unrecognised debt kinds fall back to `Other`; the kind is descriptive only.
fn parse_debt_kind(raw: &str) -> DebtKind {
    match slug(raw).as_str() {
        "credit_card" | "card" => DebtKind::CreditCard,
        "auto" | "auto_loan" | "car" => DebtKind::AutoLoan,
        "student" | "student_loan" => DebtKind::StudentLoan,
        "personal" | "personal_loan" => DebtKind::PersonalLoan,
        "mortgage" => DebtKind::Mortgage,
        "heloc" => DebtKind::Heloc,
        _ => DebtKind::Other,
    }
}
