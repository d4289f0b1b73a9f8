//! Amount parsing, bounds, and budget suggestions.

use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::error::ValidationError;

/// Upper bound for a monthly goal.
pub const MAX_MONTHLY_GOAL: Decimal = dec!(10000);
/// Upper bound for a daily budget.
pub const MAX_DAILY_BUDGET: Decimal = dec!(500);
/// Fixed quick-pick amounts on the daily budget page.
pub const DAILY_QUICK_PICKS: [Decimal; 3] = [dec!(10), dec!(25), dec!(50)];

/// Accepted amounts are rounded to this many decimal places.
pub const AMOUNT_DP: u32 = 2;

const DAYS_PER_MONTH: Decimal = dec!(30);

/// Parse a raw amount, round it to cents and check it lies in `(0, max]`.
///
/// Checks run in order: unparseable or non-positive first, then too large.
/// A positive number beyond `Decimal`'s range is too large, not unparseable.
pub fn parse_amount(raw: &str, max: Decimal) -> Result<Decimal, ValidationError> {
    let raw = raw.trim();
    let amount = match Decimal::from_str(raw) {
        Ok(amount) => amount,
        Err(_) => match raw.parse::<f64>() {
            Ok(v) if v.is_finite() && v > 0.0 => Decimal::from_f64(v)
                .unwrap_or(if v < 1.0 { Decimal::ZERO } else { Decimal::MAX }),
            _ => return Err(ValidationError::EmptyOrNonPositive),
        },
    };
    let amount = amount.round_dp_with_strategy(AMOUNT_DP, RoundingStrategy::MidpointAwayFromZero);
    if amount <= Decimal::ZERO {
        return Err(ValidationError::EmptyOrNonPositive);
    }
    if amount > max {
        return Err(ValidationError::TooLarge { max });
    }
    Ok(amount)
}

/// Suggested daily budget: the monthly goal spread over 30 days, to one
/// decimal place.
pub fn suggested_daily_budget(monthly_goal: Decimal) -> Decimal {
    (monthly_goal / DAYS_PER_MONTH)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

/// Daily budget quick-picks: the fixed amounts plus a positive suggestion,
/// without duplicates.
pub fn daily_quick_picks(suggestion: Option<Decimal>) -> Vec<Decimal> {
    let mut picks = DAILY_QUICK_PICKS.to_vec();
    if let Some(s) = suggestion.filter(|s| *s > Decimal::ZERO) {
        if !picks.contains(&s) {
            picks.push(s);
        }
    }
    picks
}
