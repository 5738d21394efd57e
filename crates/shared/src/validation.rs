//! Common validation utilities.

use chrono::NaiveDate;
use validator::ValidationError;

lazy_static::lazy_static! {
    static ref WHITESPACE_RUN: regex::Regex = regex::Regex::new(r"\s+").unwrap();
    static ref SERIAL_NUMBER_REGEX: regex::Regex = regex::Regex::new(r"^[A-Za-z0-9._\-/]+$").unwrap();
    static ref DIMENSIONS_REGEX: regex::Regex = regex::Regex::new(r"(?i)^\d{1,4}\s*x\s*\d{1,4}$").unwrap();
}

/// Trims the value and collapses inner whitespace runs to a single space.
///
/// Returns `None` when nothing is left, so blank input behaves like an absent field.
pub fn normalize_text(value: Option<&str>) -> Option<String> {
    let value = value?;
    let collapsed = WHITESPACE_RUN.replace_all(value.trim(), " ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed.into_owned())
    }
}

/// Validates that a character count lies within `min..=max`.
pub fn validate_char_length(
    value: &str,
    min: usize,
    max: usize,
    code: &'static str,
    message: &str,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if (min..=max).contains(&len) {
        Ok(())
    } else {
        let mut err = ValidationError::new(code);
        err.message = Some(message.to_string().into());
        Err(err)
    }
}

/// Validates a serial number: 3-60 characters from `[A-Za-z0-9._-/]`, no whitespace.
pub fn validate_serial_number(serial: &str) -> Result<(), ValidationError> {
    validate_char_length(
        serial,
        3,
        60,
        "serial_number_length",
        "Serial number must be between 3 and 60 characters",
    )?;

    if SERIAL_NUMBER_REGEX.is_match(serial) {
        Ok(())
    } else {
        let mut err = ValidationError::new("serial_number_format");
        err.message = Some(
            "Serial number may only contain letters, digits, dots, underscores, hyphens and slashes"
                .into(),
        );
        Err(err)
    }
}

/// Validates furniture dimensions in the form `120x60` or `120 x 60`.
pub fn validate_dimensions(dimensions: &str) -> Result<(), ValidationError> {
    if dimensions.chars().count() <= 30 && DIMENSIONS_REGEX.is_match(dimensions) {
        Ok(())
    } else {
        let mut err = ValidationError::new("dimensions_format");
        err.message = Some("Dimensions must look like 120x60 (up to 4 digits per side)".into());
        Err(err)
    }
}

/// Validates that a business date is not after `today`.
pub fn validate_not_after(date: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    if date <= today {
        Ok(())
    } else {
        let mut err = ValidationError::new("date_in_future");
        err.message = Some("Date cannot be in the future".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text_collapses_whitespace() {
        assert_eq!(
            normalize_text(Some("  Dell   Latitude\t5420 ")),
            Some("Dell Latitude 5420".to_string())
        );
    }

    #[test]
    fn test_normalize_text_blank_is_none() {
        assert_eq!(normalize_text(Some("   \n ")), None);
        assert_eq!(normalize_text(None), None);
    }

    #[test]
    fn test_validate_char_length() {
        assert!(validate_char_length("abc", 3, 5, "len", "bad").is_ok());
        assert!(validate_char_length("ab", 3, 5, "len", "bad").is_err());
        assert!(validate_char_length("ñandú", 3, 5, "len", "bad").is_ok());
    }

    #[test]
    fn test_validate_serial_number() {
        assert!(validate_serial_number("SN-123/45_a.b").is_ok());
        assert!(validate_serial_number("AB").is_err());
        assert!(validate_serial_number("SN 123").is_err());
        assert!(validate_serial_number("SN#123").is_err());
    }

    #[test]
    fn test_validate_dimensions() {
        assert!(validate_dimensions("120x60").is_ok());
        assert!(validate_dimensions("120 X 60").is_ok());
        assert!(validate_dimensions("12345x60").is_err());
        assert!(validate_dimensions("120 by 60").is_err());
    }

    #[test]
    fn test_validate_not_after() {
        let today = NaiveDate::from_ymd_opt(2025, 12, 3).unwrap();
        assert!(validate_not_after(today, today).is_ok());
        assert!(validate_not_after(today.pred_opt().unwrap(), today).is_ok());
        let err = validate_not_after(today.succ_opt().unwrap(), today).unwrap_err();
        assert_eq!(err.code, "date_in_future");
    }
}
