//! Five-year roadmap: one milestone per year, sequenced by the gates.
//!
//! Milestone figures come from a deliberately coarse path rounded to the
//! nearest $1,000. They are directional and never reuse calculator output.

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::assessment::Assessment;
use crate::gating::thresholds::{LIQUIDITY_MONTHS, S_CORP_MIN_BUSINESS_INCOME};
use crate::gating::Gates;
use crate::tax_tables::{self, ELECTIVE_DEFERRAL_LIMIT, IRA_LIMIT, SE_TAX_RATE};
use crate::types::{Money, Rate};

pub const ROADMAP_YEARS: usize = 5;

const ESTIMATE_NOTE: &str = "Figures are rounded, order-of-magnitude estimates.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub year: i32,
    pub summary: String,
    pub actions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_tax_savings: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_net_worth_change: Option<Money>,
    pub notes: Vec<String>,
}

impl Milestone {
    fn new(year: i32, summary: impl Into<String>) -> Self {
        Self {
            year,
            summary: summary.into(),
            actions: Vec::new(),
            expected_tax_savings: None,
            expected_net_worth_change: None,
            notes: Vec::new(),
        }
    }

    fn action(mut self, action: impl Into<String>) -> Self {
        self.actions.push(action.into());
        self
    }

    fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    fn tax_savings(mut self, amount: Money) -> Self {
        self.expected_tax_savings = positive_thousands(amount);
        if self.expected_tax_savings.is_some() {
            self.notes.push(ESTIMATE_NOTE.to_string());
        }
        self
    }

    fn net_worth_change(mut self, amount: Money) -> Self {
        self.expected_net_worth_change = positive_thousands(amount);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiveYearPlan {
    pub start_year: i32,
    pub milestones: Vec<Milestone>,
}

/// Round to the nearest $1,000; `None` when that leaves nothing positive.
fn positive_thousands(amount: Money) -> Option<Money> {
    let rounded = (amount / dec!(1000))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        * dec!(1000);
    (rounded > Decimal::ZERO).then_some(rounded)
}

/// Build the roadmap from scratch. Nothing from a previous plan is carried
/// over.
pub fn build_five_year_roadmap(assessment: &Assessment, gates: &Gates, as_of: NaiveDate) -> FiveYearPlan {
    let start_year = as_of.year();
    let rate = tax_tables::marginal_rate_proxy(assessment);
    let surplus = gates.annualized_surplus;

    let milestones = vec![
        foundation(assessment, gates, start_year, rate, surplus),
        entity_year(assessment, gates, start_year + 1, rate, surplus),
        acquisition_year(gates, start_year + 2, rate, surplus),
        deferral_year(assessment, gates, start_year + 3, rate, surplus),
        legacy_year(assessment, start_year + 4),
    ];
    debug_assert_eq!(milestones.len(), ROADMAP_YEARS);

    tracing::debug!(start_year, "roadmap built");
    FiveYearPlan {
        start_year,
        milestones,
    }
}

// ---------------------------------------------------------------------------
// Year builders
// ---------------------------------------------------------------------------

fn foundation(a: &Assessment, gates: &Gates, year: i32, rate: Rate, surplus: Money) -> Milestone {
    let mut m = Milestone::new(year, "Stabilize cash flow and liquidity");
    if !gates.liquidity_adequate {
        m = m.action(format!(
            "Build the emergency fund to at least {LIQUIDITY_MONTHS} months of expenses"
        ));
    }
    let has_debt = a.debts.iter().any(|d| d.balance > Decimal::ZERO);
    if has_debt {
        m = m.action(format!(
            "Pay down debt highest-APR first (weighted APR {}%)",
            gates.weighted_apr.round_dp(2)
        ));
    }
    m = m.action("Automate monthly transfers of the surplus");

    let deferral_room = if a.income.w2 > Decimal::ZERO {
        (ELECTIVE_DEFERRAL_LIMIT.min(a.income.w2) - a.retirement.employee_deferrals)
            .max(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };
    if deferral_room > Decimal::ZERO {
        m = m.action("Raise workplace retirement deferrals toward the annual limit");
    }
    m.tax_savings(deferral_room * rate).net_worth_change(surplus)
}

fn entity_year(a: &Assessment, gates: &Gates, year: i32, rate: Rate, surplus: Money) -> Milestone {
    if gates.s_corp_now {
        let distributions = a.income.self_employment_net * dec!(0.6);
        let mut m = Milestone::new(year, "Restructure the business for tax efficiency")
            .action("Elect S-corporation status and start owner payroll");
        let mut savings = distributions * SE_TAX_RATE;
        if gates.augusta_now {
            m = m.action("Document business use of the home under the 14-day rental rule");
            savings += dec!(14_000) * rate;
        }
        return m.tax_savings(savings).net_worth_change(surplus);
    }

    let m = Milestone::new(year, "Strengthen bookkeeping and records")
        .action("Separate business and personal accounts")
        .action("Reconcile books monthly and keep receipts digitized");
    if a.has_business() {
        m.note(format!(
            "Revisit an S-corp election once business income reaches ${S_CORP_MIN_BUSINESS_INCOME}"
        ))
        .net_worth_change(surplus)
    } else {
        m.net_worth_change(surplus)
    }
}

fn acquisition_year(gates: &Gates, year: i32, rate: Rate, surplus: Money) -> Milestone {
    if gates.short_term_rental_now {
        let building = (surplus * dec!(5)).min(dec!(1_000_000)) * dec!(0.8);
        return Milestone::new(year, "Acquire a self-managed short-term rental")
            .action("Purchase and furnish the property")
            .action("Commission a cost segregation study")
            .action("Track material participation hours")
            .tax_savings(building * dec!(0.25) * rate)
            .net_worth_change(surplus);
    }
    Milestone::new(year, "Automate long-term investing")
        .action("Open or consolidate a taxable brokerage account")
        .action("Schedule automatic monthly index fund purchases")
        .net_worth_change(surplus)
}

fn deferral_year(a: &Assessment, gates: &Gates, year: i32, rate: Rate, surplus: Money) -> Milestone {
    if gates.cash_balance_plan_soon {
        let contribution = (surplus / dec!(2)).min(dec!(100_000));
        return Milestone::new(year, "Layer on a cash balance pension plan")
            .action("Engage an actuary and adopt the plan by year end")
            .action("Fund the annual contribution")
            .tax_savings(contribution * rate)
            .net_worth_change(surplus);
    }
    if a.has_business() {
        return Milestone::new(year, "Open a Solo 401(k)")
            .action("Contribute employee deferrals and the employer profit share")
            .tax_savings(ELECTIVE_DEFERRAL_LIMIT.min(a.income.self_employment_net) * rate)
            .net_worth_change(surplus);
    }
    let room = (IRA_LIMIT - a.retirement.ira_contributions).max(Decimal::ZERO);
    Milestone::new(year, "Maximize IRA contributions")
        .action("Contribute the full IRA limit each year")
        .tax_savings(room * rate)
        .net_worth_change(surplus)
}

fn legacy_year(a: &Assessment, year: i32) -> Milestone {
    let mut m = Milestone::new(year, "Review giving and estate plans");
    if a.preferences.giving_annual > Decimal::ZERO {
        m = m.action("Evaluate a donor-advised fund for bunching gifts");
    }
    if !a.protection.has_estate_documents {
        m = m.action("Draft wills, powers of attorney and healthcare directives");
    }
    m.action("Review beneficiary designations on every account")
        .action("Re-run the assessment and refresh this roadmap")
}
