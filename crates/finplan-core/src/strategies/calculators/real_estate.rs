use chrono::Datelike;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::assessment::PropertyUse;
use crate::strategies::context::AssessmentContext;
use crate::strategies::estimate::StrategyEstimate;
use crate::types::{Money, Rate};

pub const SHORT_TERM_RENTAL: &str = "short_term_rental";
pub const COST_SEGREGATION: &str = "cost_segregation";

/// Purchase price modelled as a multiple of annual surplus.
pub const STR_PRICE_TO_SURPLUS: Decimal = dec!(5);
pub const STR_MAX_PURCHASE_PRICE: Money = dec!(1_000_000);
pub const STR_BUILDING_SHARE: Rate = dec!(0.80);
pub const STR_DOWN_PAYMENT: Rate = dec!(0.20);

/// Share of building basis a study typically moves into 5/7/15-year property.
pub const RECLASSIFIED_SHARE: Rate = dec!(0.25);
/// First-year depreciation on reclassified property without bonus.
pub const NON_BONUS_FIRST_YEAR_SHARE: Rate = dec!(0.20);
/// Minimum total building basis for a study to pay for itself.
pub const COST_SEG_MIN_BUILDING_BASIS: Money = dec!(250_000);
pub const COST_SEG_STUDY_FEE: Money = dec!(5_000);

const RESIDENTIAL_RECOVERY_YEARS: Decimal = dec!(27.5);
const NONRESIDENTIAL_RECOVERY_YEARS: Decimal = dec!(39);

/// Short-term rentals (average stay of seven days or less) fall outside the
/// residential class.
fn recovery_years(use_class: PropertyUse) -> Decimal {
    match use_class {
        PropertyUse::LongTermRental => RESIDENTIAL_RECOVERY_YEARS,
        _ => NONRESIDENTIAL_RECOVERY_YEARS,
    }
}

// ---------------------------------------------------------------------------
// Short-term rental
// ---------------------------------------------------------------------------

/// First-year loss from a self-managed short-term rental with a cost
/// segregation study, usable against active income under material
/// participation.
pub fn short_term_rental(ctx: &AssessmentContext<'_>) -> Option<StrategyEstimate> {
    if !ctx.gates.short_term_rental_now {
        return None;
    }

    let price = (ctx.gates.annualized_surplus * STR_PRICE_TO_SURPLUS)
        .min(STR_MAX_PURCHASE_PRICE)
        .round_dp(0);
    if price <= Decimal::ZERO {
        return None;
    }

    let building = price * STR_BUILDING_SHARE;
    let reclassified = building * RECLASSIFIED_SHARE;
    let straight_line = ((building - reclassified) / NONRESIDENTIAL_RECOVERY_YEARS).round_dp(0);
    let first_year_deduction = (reclassified + straight_line).round_dp(0);

    let rate = ctx.marginal_rate();
    Some(
        StrategyEstimate::new(SHORT_TERM_RENTAL, first_year_deduction * rate)
            .risk(4)
            .complexity(4)
            .outlay(price * STR_DOWN_PAYMENT)
            .step("Underwrite markets and get pre-approved financing", None)
            .step("Close and place the property in service", ctx.next_deadline(12, 31))
            .step("Commission a cost segregation study", None)
            .step("Log at least 100 hours of hands-on management", None)
            .document("Short-term rental market analysis")
            .flag("purchase_price", price)
            .flag("first_year_deduction", first_year_deduction)
            .flag("first_year_only", true),
    )
}

// ---------------------------------------------------------------------------
// Cost segregation
// ---------------------------------------------------------------------------

/// Accelerated first-year depreciation on properties already owned, compared
/// with straight-line recovery of the same reclassified basis.
pub fn cost_segregation(ctx: &AssessmentContext<'_>) -> Option<StrategyEstimate> {
    let depreciable: Vec<_> = ctx
        .assessment
        .properties
        .iter()
        .filter(|p| p.use_class.is_depreciable())
        .collect();
    let total_building: Money = depreciable.iter().map(|p| p.building_basis()).sum();
    if depreciable.is_empty() || total_building < COST_SEG_MIN_BUILDING_BASIS {
        return None;
    }

    let mut extra_deduction = Decimal::ZERO;
    let mut catch_up = Vec::new();
    for property in &depreciable {
        let reclassified = property.building_basis() * RECLASSIFIED_SHARE;
        let accelerated = if property.bonus_depreciation_eligible {
            reclassified
        } else {
            reclassified * NON_BONUS_FIRST_YEAR_SHARE
        };
        let straight_line = (reclassified / recovery_years(property.use_class)).round_dp(0);
        extra_deduction += (accelerated - straight_line).max(Decimal::ZERO);

        if let Some(placed) = property.placed_in_service {
            if placed.year() < ctx.as_of.year() {
                catch_up.push(property.name.clone());
            }
        }
    }
    let extra_deduction = extra_deduction.round_dp(0);
    if extra_deduction <= Decimal::ZERO {
        return None;
    }

    let rate = ctx.marginal_rate();
    let mut est = StrategyEstimate::new(COST_SEGREGATION, extra_deduction * rate)
        .risk(2)
        .complexity(3)
        .outlay(COST_SEG_STUDY_FEE * Decimal::from(depreciable.len()))
        .step("Order an engineering-based cost segregation study", None)
        .step(
            "Claim the reclassified depreciation on the extended return",
            ctx.next_deadline(10, 15),
        )
        .flag("properties", depreciable.len())
        .flag("building_basis", total_building.round_dp(0))
        .flag("extra_deduction", extra_deduction);
    for name in &catch_up {
        est = est.step(
            format!("File Form 3115 catch-up adjustment for {name}"),
            ctx.next_deadline(10, 15),
        );
    }
    if !catch_up.is_empty() {
        est = est.document("Form 3115");
    }
    Some(est)
}
