//! Core pricing calculation functions.
//!
//! Pure functions for the derived booking fields - no database access.
//! Every field-change hook funnels through [`quote`] so the nights and
//! price formulas live in exactly one place.

use chrono::NaiveDate;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use super::services::PricingError;

/// Multiplier applied when a stored amount is shown to the user.
pub const DISPLAY_SCALE: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// Round to the given number of decimal places, halves away from zero.
///
/// This is the rounding the admin framework's number formatting uses, so
/// derived values never disagree with what the form displays.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use booking_pricing::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(3));
/// assert_eq!(round_money(dec!(-2.5), 0), dec!(-3));
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

/// Number of nights between two dates.
///
/// Always the absolute difference, so swapping the arguments gives the
/// same result. Ordering is checked separately by [`quote`].
pub fn compute_nights(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    (check_out - check_in).num_days().abs()
}

/// Hotel base rate as shown in the price-per-night field.
pub fn compute_display_nightly_rate(base_rate: Decimal) -> Result<Decimal, PricingError> {
    base_rate
        .checked_mul(DISPLAY_SCALE)
        .map(|amount| round_money(amount, 2))
        .ok_or(PricingError::Overflow("price_per_night"))
}

/// Total booking price as shown in the total-price field.
///
/// Returns `Ok(None)` when any input is missing or zero: partial input
/// must leave the previously displayed total untouched.
pub fn compute_display_total_price(
    rooms: i64,
    nights: i64,
    base_rate: Option<Decimal>,
) -> Result<Option<Decimal>, PricingError> {
    let rate = match base_rate {
        Some(rate) if !rate.is_zero() => rate,
        _ => return Ok(None),
    };
    if rooms == 0 || nights == 0 {
        return Ok(None);
    }

    Decimal::from(rooms)
        .checked_mul(Decimal::from(nights))
        .and_then(|units| units.checked_mul(rate))
        .and_then(|total| total.checked_mul(DISPLAY_SCALE))
        .map(|total| Some(round_money(total, 2)))
        .ok_or(PricingError::Overflow("total_price"))
}

/// Snapshot of the inputs the derived fields depend on.
#[derive(Debug, Clone, Default)]
pub struct PricingInputs {
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    /// Last known night count, used when a date is still empty
    pub stored_nights: Option<i64>,
    pub rooms: i64,
    /// Hotel base rate; `None` when no hotel is selected
    pub base_rate: Option<Decimal>,
}

/// Derived field values for one form snapshot
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Quote {
    /// Set only when both dates are known
    pub nights: Option<i64>,
    pub nightly_rate: Option<Decimal>,
    pub total_price: Option<Decimal>,
}

/// Recompute every derived field from a form snapshot.
///
/// A check-out before check-in is rejected instead of silently producing
/// the absolute difference.
pub fn quote(inputs: &PricingInputs) -> Result<Quote, PricingError> {
    let nights = match (inputs.check_in, inputs.check_out) {
        (Some(check_in), Some(check_out)) => {
            if check_out < check_in {
                return Err(PricingError::InvalidDateRange { check_in, check_out });
            }
            Some(compute_nights(check_in, check_out))
        }
        _ => None,
    };

    let nightly_rate = inputs
        .base_rate
        .map(compute_display_nightly_rate)
        .transpose()?;

    let effective_nights = nights.or(inputs.stored_nights).unwrap_or(0);
    let total_price =
        compute_display_total_price(inputs.rooms, effective_nights, inputs.base_rate)?;

    Ok(Quote {
        nights,
        nightly_rate,
        total_price,
    })
}
