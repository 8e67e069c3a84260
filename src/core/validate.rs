//! Input checks shared by the paycheck and transaction operations.

use crate::errors::{Error, Result};
use crate::core::money;
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;

/// Longest accepted free-form description.
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// The caller's calendar day; dates after it are "in the future".
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Rejects dates after [`today`].
pub fn ensure_not_future(date: NaiveDate, what: &str) -> Result<()> {
    let today = today();
    if date > today {
        return Err(Error::validation(format!(
            "{what} date {date} is in the future (today is {today})"
        )));
    }
    Ok(())
}

/// Parses a positive dollar amount and rounds it to cents.
///
/// The amount must still be positive after rounding, so `0.004` is rejected.
pub fn positive_amount(value: f64, what: &str) -> Result<Decimal> {
    let amount = money::round_cents(money::to_decimal(value, what)?);
    if amount <= Decimal::ZERO {
        return Err(Error::validation(format!(
            "{what} must be greater than zero, got {value}"
        )));
    }
    Ok(amount)
}

/// Trims a description, mapping blank input to `None`.
pub fn normalize_description(description: Option<String>) -> Result<Option<String>> {
    let Some(text) = description else {
        return Ok(None);
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(Error::validation(format!(
            "Description must be at most {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(Some(trimmed.to_string()))
}

/// Parses an optional `YYYY-MM-DD` string, defaulting to [`today`].
pub fn parse_date(input: Option<&str>) -> Result<NaiveDate> {
    match input.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(today()),
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|e| {
            Error::validation(format!("Invalid date '{text}' (expected YYYY-MM-DD): {e}"))
        }),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use chrono::Days;
    use std::str::FromStr;

    #[test]
    fn test_ensure_not_future() {
        assert!(ensure_not_future(today(), "Paycheck").is_ok());
        let tomorrow = today().checked_add_days(Days::new(1)).unwrap();
        assert!(matches!(
            ensure_not_future(tomorrow, "Paycheck"),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_positive_amount() {
        assert_eq!(
            positive_amount(12.345, "Amount").unwrap(),
            Decimal::from_str("12.35").unwrap()
        );
        assert!(positive_amount(0.0, "Amount").is_err());
        assert!(positive_amount(-5.0, "Amount").is_err());
        assert!(positive_amount(0.004, "Amount").is_err());
        assert!(positive_amount(f64::NAN, "Amount").is_err());
    }

    #[test]
    fn test_normalize_description() {
        assert_eq!(normalize_description(None).unwrap(), None);
        assert_eq!(normalize_description(Some("   ".to_string())).unwrap(), None);
        assert_eq!(
            normalize_description(Some("  lunch ".to_string())).unwrap(),
            Some("lunch".to_string())
        );
        assert!(normalize_description(Some("x".repeat(MAX_DESCRIPTION_LEN + 1))).is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date(None).unwrap(), today());
        assert_eq!(parse_date(Some(" ")).unwrap(), today());
        assert_eq!(
            parse_date(Some("2024-02-29")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(parse_date(Some("2023-02-29")).is_err());
        assert!(parse_date(Some("yesterday")).is_err());
    }
}
