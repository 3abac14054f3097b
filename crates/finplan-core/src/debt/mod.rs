//! Avalanche debt payoff simulator compared against a minimum-payment baseline.

mod simulation;

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::assessment::{Debt, DebtKind};
use crate::types::{Cents, Money, Percent};

use simulation::{Allocation, Tranche};

pub use simulation::MAX_HORIZON_MONTHS;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoffMethod {
    #[default]
    Avalanche,
}

/// Minimum-payment-only outcome for one debt simulated in isolation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BaselineOutcome {
    PaidOff { months: u32, interest: Money },
    DidNotConverge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Convergence {
    Converged { months: u32 },
    /// Some debt was still open when the simulation stopped, either at the
    /// horizon or because its interest could never be outpaced.
    DidNotConverge { months_simulated: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtPlanItem {
    pub name: String,
    pub kind: DebtKind,
    pub apr: Percent,
    pub starting_balance: Money,
    pub minimum_payment: Money,
    /// 1-based position by completion month; `None` if never paid off.
    pub payoff_order: Option<u32>,
    pub months_to_payoff: Option<u32>,
    /// Interest accrued under the plan over the simulated months.
    pub plan_interest: Money,
    pub baseline: BaselineOutcome,
    /// `None` when either side of the comparison did not converge.
    pub interest_saved: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleMonth {
    pub month: u32,
    pub total_balance: Money,
    pub interest: Money,
    pub paid: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtPlan {
    pub method: PayoffMethod,
    /// Surplus left after all minimums, floored at zero.
    pub monthly_budget: Money,
    /// Amount by which minimums exceed the surplus, if they do.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_shortfall: Option<Money>,
    /// Simulated debts in avalanche priority order (APR descending).
    pub items: Vec<DebtPlanItem>,
    pub total_interest_saved: Money,
    /// True when some item's savings are undefined and left out of the total.
    pub incomplete_comparison: bool,
    pub debt_free_by: Option<NaiveDate>,
    pub convergence: Convergence,
    pub schedule: Vec<ScheduleMonth>,
}

/// Simulate an avalanche payoff of `debts` from `monthly_surplus`.
///
/// Debts with a non-positive balance or minimum payment are excluded; returns
/// `None` when nothing is left to simulate.
pub fn simulate_debt_plan(
    debts: &[Debt],
    monthly_surplus: Money,
    as_of: NaiveDate,
) -> Option<DebtPlan> {
    let mut open: Vec<&Debt> = debts
        .iter()
        .filter(|d| d.balance > Decimal::ZERO && d.min_payment > Decimal::ZERO)
        .collect();
    if open.is_empty() {
        return None;
    }
    // Stable sort keeps input order for equal APRs.
    open.sort_by(|a, b| b.apr.cmp(&a.apr));

    let tranches: Vec<Tranche> = open
        .iter()
        .map(|d| Tranche {
            balance: Cents::from_money(d.balance),
            apr_scaled: Tranche::scale_apr(d.apr),
            minimum: Cents::from_money(d.min_payment),
        })
        .collect();

    let minimums = tranches
        .iter()
        .fold(Cents::ZERO, |acc, t| acc.saturating_add(t.minimum));
    let surplus = Cents::from_money(monthly_surplus);
    let budget = surplus.saturating_sub(minimums).max(Cents::ZERO);
    let budget_shortfall = (minimums > surplus).then(|| minimums.saturating_sub(surplus).to_money());

    // Without discretionary money there is nothing to reallocate, so the plan
    // is the minimum-only schedule.
    let allocation = if budget.is_positive() {
        Allocation::Avalanche
    } else {
        Allocation::MinimumOnly
    };
    let plan = simulation::run(&tranches, budget, allocation);

    let baselines: Vec<BaselineOutcome> = tranches
        .iter()
        .map(|t| {
            let solo = simulation::run(std::slice::from_ref(t), Cents::ZERO, Allocation::MinimumOnly);
            match solo.closed_month[0] {
                Some(months) => BaselineOutcome::PaidOff {
                    months,
                    interest: solo.interest[0].to_money(),
                },
                None => BaselineOutcome::DidNotConverge,
            }
        })
        .collect();

    let payoff_order = payoff_order(&plan.closed_month);

    let mut total_interest_saved = Decimal::ZERO;
    let mut incomplete_comparison = false;
    let items: Vec<DebtPlanItem> = open
        .iter()
        .enumerate()
        .map(|(i, debt)| {
            let plan_interest = plan.interest[i].to_money();
            let interest_saved = match (&baselines[i], plan.closed_month[i]) {
                (BaselineOutcome::PaidOff { interest, .. }, Some(_)) => {
                    Some((*interest - plan_interest).max(Decimal::ZERO))
                }
                _ => None,
            };
            match interest_saved {
                Some(saved) => total_interest_saved += saved,
                None => incomplete_comparison = true,
            }
            DebtPlanItem {
                name: debt.name.clone(),
                kind: debt.kind,
                apr: debt.apr,
                starting_balance: debt.balance,
                minimum_payment: debt.min_payment,
                payoff_order: payoff_order[i],
                months_to_payoff: plan.closed_month[i],
                plan_interest,
                baseline: baselines[i].clone(),
                interest_saved,
            }
        })
        .collect();

    let (convergence, debt_free_by) = if plan.converged() {
        let months = plan.closed_month.iter().flatten().copied().max().unwrap_or(0);
        (
            Convergence::Converged { months },
            as_of.checked_add_months(Months::new(months)),
        )
    } else {
        (
            Convergence::DidNotConverge {
                months_simulated: plan.months_simulated,
            },
            None,
        )
    };

    tracing::debug!(
        debts = items.len(),
        budget = %budget,
        converged = plan.converged(),
        total_interest_saved = %total_interest_saved,
        "debt plan simulated"
    );

    Some(DebtPlan {
        method: PayoffMethod::Avalanche,
        monthly_budget: budget.to_money(),
        budget_shortfall,
        items,
        total_interest_saved,
        incomplete_comparison,
        debt_free_by,
        convergence,
        schedule: plan
            .months
            .iter()
            .map(|m| ScheduleMonth {
                month: m.month,
                total_balance: m.balance.to_money(),
                interest: m.interest.to_money(),
                paid: m.paid.to_money(),
            })
            .collect(),
    })
}

/// Rank closed debts by completion month; ties keep priority order.
fn payoff_order(closed_month: &[Option<u32>]) -> Vec<Option<u32>> {
    let mut closed: Vec<(usize, u32)> = closed_month
        .iter()
        .enumerate()
        .filter_map(|(i, m)| m.map(|m| (i, m)))
        .collect();
    closed.sort_by_key(|&(_, month)| month);

    let mut order = vec![None; closed_month.len()];
    for (rank, (i, _)) in closed.into_iter().enumerate() {
        order[i] = Some(rank as u32 + 1);
    }
    order
}
