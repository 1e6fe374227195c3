//! Money conversions between stored minor units and `Decimal`.
//!
//! The database holds integer cents; all arithmetic happens on `Decimal` so amortization
//! rounding never drifts through binary floating point.

use crate::errors::{Error, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places carried by stored money values
pub const SCALE: u32 = 2;

/// Converts stored minor units to a decimal amount, e.g. `123456` to `1234.56`.
#[must_use]
pub fn from_minor(minor: i64) -> Decimal {
    Decimal::new(minor, SCALE)
}

/// Rounds to the nearest cent with halves going away from zero.
#[must_use]
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Converts a decimal amount to minor units, rounding to the nearest cent first.
///
/// # Errors
/// Returns [`Error::InvalidAmount`] if the amount does not fit in an `i64` of cents.
pub fn to_minor(amount: Decimal) -> Result<i64> {
    round_cents(amount)
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|minor| minor.to_i64())
        .ok_or(Error::InvalidAmount { amount })
}

/// Converts a user supplied `f64` (Discord number option) to a cent-rounded decimal.
///
/// # Errors
/// Returns [`Error::InvalidAmount`] for NaN, infinities, and values outside the `Decimal` range.
pub fn from_f64(value: f64) -> Result<Decimal> {
    if !value.is_finite() {
        return Err(Error::InvalidAmount {
            amount: Decimal::ZERO,
        });
    }
    Decimal::from_f64_retain(value)
        .map(round_cents)
        .ok_or(Error::InvalidAmount {
            amount: Decimal::ZERO,
        })
}

/// Formats an amount with two decimals and comma thousands separators, e.g. `1,234.56`.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = round_cents(amount);
    rounded.rescale(SCALE);
    let text = rounded.abs().to_string();
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{fraction}")
}
