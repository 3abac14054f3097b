//! Month-by-month payoff loop in integer cents.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::types::{Cents, Percent};

/// Hard cap on simulated months (100 years).
pub const MAX_HORIZON_MONTHS: u32 = 1_200;

/// APR percent scaled by 10^4, so 24.99% is 249_900.
const APR_SCALE: i64 = 10_000;
/// 100 (percent) x APR_SCALE x 12 months.
const MONTHLY_DIVISOR: i128 = 100 * APR_SCALE as i128 * 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Tranche {
    pub balance: Cents,
    pub apr_scaled: i64,
    pub minimum: Cents,
}

impl Tranche {
    pub fn scale_apr(apr_percent: Percent) -> i64 {
        (apr_percent * Decimal::from(APR_SCALE))
            .round()
            .to_i64()
            .unwrap_or(0)
            .max(0)
    }
}

/// `floor(balance x APR / 12)`. Saturates instead of overflowing.
pub(crate) fn monthly_interest(balance: Cents, apr_scaled: i64) -> Cents {
    if balance.0 <= 0 || apr_scaled <= 0 {
        return Cents::ZERO;
    }
    let interest = i128::from(balance.0) * i128::from(apr_scaled) / MONTHLY_DIVISOR;
    Cents(i64::try_from(interest).unwrap_or(i64::MAX))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Allocation {
    /// Minimums on every debt, the rest of the household's capacity to the
    /// highest-priority open debt, rolling over within the month.
    Avalanche,
    /// Each debt receives only its own minimum; nothing is reallocated.
    MinimumOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MonthTotals {
    pub month: u32,
    pub balance: Cents,
    pub interest: Cents,
    pub paid: Cents,
}

#[derive(Debug, Clone)]
pub(crate) struct RunOutcome {
    pub closed_month: Vec<Option<u32>>,
    pub interest: Vec<Cents>,
    pub months: Vec<MonthTotals>,
    pub months_simulated: u32,
}

impl RunOutcome {
    pub fn converged(&self) -> bool {
        self.closed_month.iter().all(Option::is_some)
    }
}

/// Simulate `tranches`, already sorted by payoff priority.
///
/// A tranche whose interest meets or exceeds everything it could ever be paid
/// (its minimum alone, or the household's whole capacity under avalanche) can
/// never shrink and stops the simulation for that tranche immediately.
pub(crate) fn run(tranches: &[Tranche], budget: Cents, allocation: Allocation) -> RunOutcome {
    let n = tranches.len();
    let mut balance: Vec<Cents> = tranches.iter().map(|t| t.balance).collect();
    let mut interest = vec![Cents::ZERO; n];
    let mut closed_month: Vec<Option<u32>> = vec![None; n];
    let mut stalled = vec![false; n];
    let mut months = Vec::new();

    let capacity = tranches
        .iter()
        .fold(budget, |acc, t| acc.saturating_add(t.minimum));

    let mut month = 0u32;
    while month < MAX_HORIZON_MONTHS {
        let accrued: Vec<(usize, Cents)> = (0..n)
            .filter(|&i| closed_month[i].is_none() && !stalled[i])
            .map(|i| (i, monthly_interest(balance[i], tranches[i].apr_scaled)))
            .collect();

        let mut any_stalled = false;
        for &(i, acc) in &accrued {
            let ceiling = match allocation {
                Allocation::Avalanche => capacity,
                Allocation::MinimumOnly => tranches[i].minimum,
            };
            if acc >= ceiling {
                stalled[i] = true;
                any_stalled = true;
            }
        }
        if any_stalled && allocation == Allocation::Avalanche {
            tracing::debug!(month, "avalanche cannot outpace interest");
            break;
        }

        let active: Vec<(usize, Cents)> =
            accrued.into_iter().filter(|&(i, _)| !stalled[i]).collect();
        if active.is_empty() {
            break;
        }
        month += 1;

        let mut month_interest = Cents::ZERO;
        for &(i, acc) in &active {
            balance[i] = balance[i].saturating_add(acc);
            interest[i] = interest[i].saturating_add(acc);
            month_interest = month_interest.saturating_add(acc);
        }

        let mut paid = Cents::ZERO;
        for &(i, _) in &active {
            let pay = tranches[i].minimum.min(balance[i]);
            balance[i] = balance[i].saturating_sub(pay);
            paid = paid.saturating_add(pay);
        }

        if allocation == Allocation::Avalanche {
            // Freed and capped minimums stay in the pool alongside the budget.
            let mut pool = capacity.saturating_sub(paid);
            for &(i, _) in &active {
                if !pool.is_positive() {
                    break;
                }
                let pay = pool.min(balance[i]);
                balance[i] = balance[i].saturating_sub(pay);
                pool = pool.saturating_sub(pay);
                paid = paid.saturating_add(pay);
            }
        }

        for &(i, _) in &active {
            if !balance[i].is_positive() {
                closed_month[i] = Some(month);
            }
        }

        months.push(MonthTotals {
            month,
            balance: balance
                .iter()
                .fold(Cents::ZERO, |acc, b| acc.saturating_add(*b)),
            interest: month_interest,
            paid,
        });
    }

    RunOutcome {
        closed_month,
        interest,
        months,
        months_simulated: month,
    }
}
