//! Composite financial health score: six independently capped categories.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::assessment::{Assessment, EntityType};
use crate::gating::{evaluate_gates, Gates};
use crate::strategies::calculators::{deferral, entity, giving, real_estate, state_tax};
use crate::tax_tables::{CATCH_UP_AGE, CATCH_UP_LIMIT, ELECTIVE_DEFERRAL_LIMIT, IRA_LIMIT};

pub const RETIREMENT_CAP: Decimal = dec!(20);
pub const ENTITY_CAP: Decimal = dec!(20);
pub const DEDUCTIONS_CAP: Decimal = dec!(15);
pub const INVESTMENTS_CAP: Decimal = dec!(15);
pub const HYGIENE_CAP: Decimal = dec!(10);
pub const ADVANCED_CAP: Decimal = dec!(20);
pub const MAX_SCORE: Decimal = dec!(100);

/// Points per recognised advanced strategy in the selected list.
pub const ADVANCED_POINTS_PER_CODE: Decimal = dec!(4);

/// Strategy codes that count toward the advanced planning category.
pub const ADVANCED_CODES: [&str; 8] = [
    entity::S_CORP_ELECTION,
    entity::AUGUSTA_RULE,
    entity::HIRE_YOUR_CHILDREN,
    deferral::CASH_BALANCE_PLAN,
    real_estate::SHORT_TERM_RENTAL,
    real_estate::COST_SEGREGATION,
    state_tax::PTET_ELECTION,
    giving::CHARITABLE_BUNCHING,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
    Retirement,
    Entity,
    Deductions,
    Investments,
    Hygiene,
    Advanced,
}

impl ScoreCategory {
    pub const ALL: [ScoreCategory; 6] = [
        ScoreCategory::Retirement,
        ScoreCategory::Entity,
        ScoreCategory::Deductions,
        ScoreCategory::Investments,
        ScoreCategory::Hygiene,
        ScoreCategory::Advanced,
    ];

    pub fn cap(self) -> Decimal {
        match self {
            ScoreCategory::Retirement => RETIREMENT_CAP,
            ScoreCategory::Entity => ENTITY_CAP,
            ScoreCategory::Deductions => DEDUCTIONS_CAP,
            ScoreCategory::Investments => INVESTMENTS_CAP,
            ScoreCategory::Hygiene => HYGIENE_CAP,
            ScoreCategory::Advanced => ADVANCED_CAP,
        }
    }
}

/// Per-category points, each already clamped to `[0, cap]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub retirement: Decimal,
    pub entity: Decimal,
    pub deductions: Decimal,
    pub investments: Decimal,
    pub hygiene: Decimal,
    pub advanced: Decimal,
}

impl ScoreBreakdown {
    pub fn get(&self, category: ScoreCategory) -> Decimal {
        match category {
            ScoreCategory::Retirement => self.retirement,
            ScoreCategory::Entity => self.entity,
            ScoreCategory::Deductions => self.deductions,
            ScoreCategory::Investments => self.investments,
            ScoreCategory::Hygiene => self.hygiene,
            ScoreCategory::Advanced => self.advanced,
        }
    }

    pub fn total(&self) -> Decimal {
        ScoreCategory::ALL.iter().map(|c| self.get(*c)).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Clamped sum of the breakdown, in `[0, 100]`.
    pub score: Decimal,
    pub breakdown: ScoreBreakdown,
}

pub fn compute_score(assessment: &Assessment) -> ScoreResult {
    compute_score_with(assessment, &evaluate_gates(assessment))
}

/// Score against precomputed gates.
pub fn compute_score_with(assessment: &Assessment, gates: &Gates) -> ScoreResult {
    let breakdown = ScoreBreakdown {
        retirement: capped(ScoreCategory::Retirement, retirement_points(assessment)),
        entity: capped(ScoreCategory::Entity, entity_points(assessment, gates)),
        deductions: capped(ScoreCategory::Deductions, deduction_points(assessment, gates)),
        investments: capped(ScoreCategory::Investments, investment_points(assessment)),
        hygiene: capped(ScoreCategory::Hygiene, hygiene_points(assessment, gates)),
        advanced: capped(ScoreCategory::Advanced, advanced_points(assessment)),
    };
    let score = breakdown.total().clamp(Decimal::ZERO, MAX_SCORE);

    tracing::debug!(score = %score, "score computed");
    ScoreResult { score, breakdown }
}

fn capped(category: ScoreCategory, raw: Decimal) -> Decimal {
    raw.clamp(Decimal::ZERO, category.cap()).round_dp(1)
}

fn progress(current: Decimal, target: Decimal) -> Decimal {
    if target <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (current / target).clamp(Decimal::ZERO, Decimal::ONE)
}

// ---------------------------------------------------------------------------
// Category rules
// ---------------------------------------------------------------------------

/// Partial credit toward the deferral and IRA limits.
fn retirement_points(a: &Assessment) -> Decimal {
    let r = &a.retirement;
    let catch_up = match a.profile.age {
        Some(age) if age >= CATCH_UP_AGE => CATCH_UP_LIMIT,
        _ => Decimal::ZERO,
    };
    let deferral_room = (ELECTIVE_DEFERRAL_LIMIT + catch_up).min(a.income.w2);

    let mut points = dec!(12) * progress(r.employee_deferrals, deferral_room);
    points += dec!(4) * progress(r.ira_contributions, IRA_LIMIT);
    if r.hsa_contributions > Decimal::ZERO {
        points += dec!(2);
    }
    if a.investments.retirement_balances > Decimal::ZERO {
        points += dec!(2);
    }
    points
}

/// Households without business income get a neutral midpoint.
fn entity_points(a: &Assessment, gates: &Gates) -> Decimal {
    if !a.has_business() {
        return dec!(10);
    }
    let mut points = dec!(6);
    if !a.entities.is_empty() {
        points += dec!(6);
    }
    if !gates.s_corp_now || a.has_entity(EntityType::SCorp) {
        points += dec!(6);
    }
    if gates.augusta_now && a.has_selected(entity::AUGUSTA_RULE) {
        points += dec!(2);
    }
    points
}

fn deduction_points(a: &Assessment, gates: &Gates) -> Decimal {
    let mut points = dec!(6);
    if a.preferences.giving_annual > Decimal::ZERO {
        points += dec!(4);
    }
    if gates.itemize_likely {
        points += dec!(3);
    }
    if a.retirement.hsa_contributions > Decimal::ZERO {
        points += dec!(2);
    }
    points
}

fn investment_points(a: &Assessment) -> Decimal {
    let surplus = a.cashflow.monthly_surplus;
    let mut points = Decimal::ZERO;
    if surplus >= Decimal::ZERO {
        points += dec!(3);
    }
    if surplus > Decimal::ZERO {
        points += dec!(3);
    }
    if a.investments.taxable_brokerage > Decimal::ZERO {
        points += dec!(4);
    }
    if a.investments.retirement_balances > Decimal::ZERO {
        points += dec!(3);
    }
    if a.cashflow.emergency_fund_months >= dec!(6) {
        points += dec!(2);
    }
    points
}

/// Debt cost, liquidity and insurance coverage. The raw sum can exceed the
/// cap; the clamp absorbs it.
fn hygiene_points(a: &Assessment, gates: &Gates) -> Decimal {
    let has_debt = a.debts.iter().any(|d| d.balance > Decimal::ZERO);
    let mut points = if !has_debt {
        dec!(8)
    } else if gates.weighted_apr < dec!(8) {
        dec!(6)
    } else if gates.weighted_apr < dec!(15) {
        dec!(4)
    } else {
        dec!(2)
    };
    if gates.liquidity_adequate {
        points += dec!(2);
    }
    let p = &a.protection;
    let covered = [
        p.has_umbrella_policy,
        p.has_disability_cover,
        p.has_term_life,
        p.has_estate_documents,
    ]
    .iter()
    .filter(|c| **c)
    .count();
    points + Decimal::from(covered)
}

fn advanced_points(a: &Assessment) -> Decimal {
    let recognised = ADVANCED_CODES
        .iter()
        .filter(|code| a.has_selected(code))
        .count();
    ADVANCED_POINTS_PER_CODE * Decimal::from(recognised)
}
