use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Calendar date in `yyyy-mm-dd` form
    /// - Valid: "2025-01-31", "2024-02-29"
    /// - Invalid: "2025-1-31", "31-01-2025", "2025/01/31"
    pub static ref DATE_REGEX: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
}

/// Parse a `yyyy-mm-dd` string into a real calendar date.
///
/// Rejects well-formed strings that name a day that does not exist
/// (e.g. "2025-02-30").
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    if !DATE_REGEX.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

pub fn validate_date(value: &str) -> Result<(), ValidationError> {
    match parse_date(value) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("date_format")
            .with_message("Deadline must be in yyyy-mm-dd format".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_regex_valid() {
        assert!(DATE_REGEX.is_match("2025-01-31"));
        assert!(DATE_REGEX.is_match("1999-12-01"));
    }

    #[test]
    fn test_date_regex_invalid() {
        assert!(!DATE_REGEX.is_match("2025-1-31"));
        assert!(!DATE_REGEX.is_match("31-01-2025"));
        assert!(!DATE_REGEX.is_match("2025/01/31"));
        assert!(!DATE_REGEX.is_match("2025-01-31T00:00:00Z"));
        assert!(!DATE_REGEX.is_match(""));
    }

    #[test]
    fn test_parse_date_rejects_impossible_days() {
        assert_eq!(
            parse_date("2024-02-29"),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(parse_date("2025-02-29"), None);
        assert_eq!(parse_date("2025-13-01"), None);
        assert!(validate_date("2025-04-31").is_err());
    }
}
