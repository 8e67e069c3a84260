//! Currency and percentage arithmetic.
//!
//! Amounts are stored as `f64` dollars but every calculation that decides a stored
//! value goes through [`Decimal`], so half-up rounding is exact and percentage sums
//! never pick up binary float noise.

use crate::errors::{Error, Result};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;

/// How a paycheck amount is split across allocation rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoundingPolicy {
    /// Each row rounded half-up to cents on its own; the rows may drift from the
    /// budgeted total by a few cents.
    #[default]
    HalfUp,
    /// Rows floored to cents, leftover cents handed to the largest fractional
    /// remainders so the rows add up exactly.
    LargestRemainder,
}

/// Converts a user supplied float into a [`Decimal`], rejecting NaN and infinities.
pub fn to_decimal(value: f64, what: &str) -> Result<Decimal> {
    if !value.is_finite() {
        return Err(Error::validation(format!("{what} must be a valid number")));
    }
    Decimal::from_f64(value)
        .ok_or_else(|| Error::validation(format!("{what} is out of range: {value}")))
}

/// Converts back to the `f64` stored in the database.
#[must_use]
pub fn to_f64(value: Decimal) -> f64 {
    // Decimal -> f64 is total; the fallback is unreachable in practice.
    value.to_f64().unwrap_or_default()
}

/// Rounds half-up to whole cents.
#[must_use]
pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a stored dollar figure to cents, used for aggregated sums.
#[must_use]
pub fn round_currency(value: f64) -> f64 {
    Decimal::from_f64(value).map_or(value, |d| to_f64(round_cents(d)))
}

/// Rounds a percentage half-up to one decimal place.
#[must_use]
pub fn round_percentage(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Stored percentage expressed in tenths of a percent (`33.3` -> `333`).
#[must_use]
pub fn percentage_tenths(percentage: f64) -> i64 {
    Decimal::from_f64(percentage)
        .map(|p| round_percentage(p) * Decimal::TEN)
        .and_then(|t| t.to_i64())
        .unwrap_or_default()
}

/// Splits `amount` (already whole cents) into one share per percentage.
///
/// The returned vector is index-aligned with `percentages`.
#[must_use]
pub fn split_amount(
    amount: Decimal,
    percentages: &[Decimal],
    policy: RoundingPolicy,
) -> Vec<Decimal> {
    match policy {
        RoundingPolicy::HalfUp => percentages
            .iter()
            .map(|p| round_cents(amount * p / Decimal::ONE_HUNDRED))
            .collect(),
        RoundingPolicy::LargestRemainder => split_largest_remainder(amount, percentages),
    }
}

fn split_largest_remainder(amount: Decimal, percentages: &[Decimal]) -> Vec<Decimal> {
    let total_cents = amount * Decimal::ONE_HUNDRED;
    let exact: Vec<Decimal> = percentages
        .iter()
        .map(|p| total_cents * p / Decimal::ONE_HUNDRED)
        .collect();
    let mut cents: Vec<Decimal> = exact.iter().map(|e| e.floor()).collect();

    let percentage_sum: Decimal = percentages.iter().sum();
    let target = (total_cents * percentage_sum / Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let floored: Decimal = cents.iter().sum();
    let leftover = (target - floored).to_usize().unwrap_or_default();

    let mut order: Vec<usize> = (0..percentages.len()).collect();
    order.sort_by(|&a, &b| {
        let frac_a = exact[a] - cents[a];
        let frac_b = exact[b] - cents[b];
        frac_b
            .cmp(&frac_a)
            .then_with(|| percentages[b].cmp(&percentages[a]))
            .then_with(|| a.cmp(&b))
    });
    for &index in order.iter().take(leftover) {
        cents[index] += Decimal::ONE;
    }

    cents
        .into_iter()
        .map(|c| c / Decimal::ONE_HUNDRED)
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_to_decimal_rejects_non_finite() {
        assert!(to_decimal(f64::NAN, "Amount").is_err());
        assert!(to_decimal(f64::INFINITY, "Amount").is_err());
        assert_eq!(to_decimal(999.99, "Amount").unwrap(), dec("999.99"));
    }

    #[test]
    fn test_round_cents_is_half_up() {
        assert_eq!(round_cents(dec("1.005")), dec("1.01"));
        assert_eq!(round_cents(dec("329.9967")), dec("330.00"));
        assert_eq!(round_cents(dec("2.004")), dec("2.00"));
    }

    #[test]
    fn test_percentage_tenths() {
        assert_eq!(percentage_tenths(33.3), 333);
        assert_eq!(percentage_tenths(100.0), 1000);
        assert_eq!(percentage_tenths(0.1), 1);
    }

    #[test]
    fn test_half_up_split_drifts() {
        let shares = split_amount(
            dec("999.99"),
            &[dec("33"), dec("33"), dec("34")],
            RoundingPolicy::HalfUp,
        );
        assert_eq!(shares, vec![dec("330.00"), dec("330.00"), dec("340.00")]);
        let total: Decimal = shares.iter().sum();
        assert_eq!(total, dec("1000.00"));
    }

    #[test]
    fn test_largest_remainder_split_is_exact() {
        let shares = split_amount(
            dec("999.99"),
            &[dec("33"), dec("33"), dec("34")],
            RoundingPolicy::LargestRemainder,
        );
        assert_eq!(shares, vec![dec("330.00"), dec("330.00"), dec("339.99")]);
        let total: Decimal = shares.iter().sum();
        assert_eq!(total, dec("999.99"));
    }

    #[test]
    fn test_largest_remainder_partial_budget() {
        // Only 50% allocated: rows add up to half the paycheck, not all of it.
        let shares = split_amount(
            dec("100.01"),
            &[dec("25"), dec("25")],
            RoundingPolicy::LargestRemainder,
        );
        let total: Decimal = shares.iter().sum();
        assert_eq!(total, dec("50.01"));
        assert_eq!(shares, vec![dec("25.01"), dec("25.00")]);
    }

    #[test]
    fn test_split_with_no_categories() {
        assert!(split_amount(dec("10"), &[], RoundingPolicy::LargestRemainder).is_empty());
        assert!(split_amount(dec("10"), &[], RoundingPolicy::HalfUp).is_empty());
    }
}
