//! Input validation helpers
//!
//! Centralized text length constants and validation functions for the
//! registration and self-service handlers. Postgres TEXT has no built-in
//! length enforcement, so limits are applied here.

use chrono::{Datelike, NaiveDate, Utc};
use shared::error::{AppError, ErrorCode};
use shared::models::VehicleCreate;

// ── Text length limits ──────────────────────────────────────────────

/// Person names
pub const MAX_NAME_LEN: usize = 200;

/// Short identifiers: phone, postal code, vendor names, deal item labels
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Street addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Number plates
pub const MAX_PLATE_LEN: usize = 16;

// ── Domain rules ─────────────────────────────────────────────────────

/// Minimum password length
pub const MIN_PASSWORD_LEN: usize = 8;

/// Minimum age to join the club
pub const MIN_MEMBER_AGE: u32 = 16;

/// Oldest accepted vehicle model year
pub const MIN_VEHICLE_YEAR: i32 = 1900;

// ── Validation helpers ───────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Syntactic email check: one `@`, non-empty local part, dotted domain.
/// The emailed verification link is the real proof of ownership.
pub fn validate_email(email: &str) -> Result<(), AppError> {
    validate_required_text(email, "email", MAX_EMAIL_LEN)?;

    let Some((local, domain)) = email.split_once('@') else {
        return Err(AppError::validation("email is not a valid address"));
    };
    if local.is_empty()
        || domain.is_empty()
        || !domain.contains('.')
        || email.chars().any(char::is_whitespace)
    {
        return Err(AppError::validation("email is not a valid address"));
    }
    Ok(())
}

/// Password rules: 8..=128 chars, at least one letter and one digit.
pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < MIN_PASSWORD_LEN || password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::new(ErrorCode::PasswordTooWeak));
    }
    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err(AppError::new(ErrorCode::PasswordTooWeak));
    }
    Ok(())
}

/// Date of birth: ISO date, applicant at least [`MIN_MEMBER_AGE`] years old today.
pub fn validate_date_of_birth(value: &str) -> Result<(), AppError> {
    check_minimum_age(value, Utc::now().date_naive())
}

fn check_minimum_age(value: &str, today: NaiveDate) -> Result<(), AppError> {
    let dob = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        AppError::with_message(
            ErrorCode::InvalidFormat,
            "date_of_birth must be formatted YYYY-MM-DD",
        )
    })?;

    // years_since is None when the date lies in the future
    let age = today.years_since(dob).unwrap_or(0);
    if age < MIN_MEMBER_AGE {
        return Err(AppError::new(ErrorCode::UnderMinimumAge));
    }
    Ok(())
}

/// Postal code plausibility: 3-10 characters, alphanumeric plus space/hyphen.
/// Loose on purpose, the club has members across several countries.
pub fn validate_postal_code(value: &str) -> Result<(), AppError> {
    let trimmed = value.trim();
    if !(3..=10).contains(&trimmed.len())
        || !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '-')
    {
        return Err(AppError::validation("postal_code is not a valid postcode"));
    }
    Ok(())
}

/// Vehicle payload: make/model required, model year within plausible bounds.
pub fn validate_vehicle(vehicle: &VehicleCreate) -> Result<(), AppError> {
    validate_required_text(&vehicle.make, "make", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&vehicle.model, "model", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&vehicle.plate, "plate", MAX_PLATE_LEN)?;

    let next_year = Utc::now().year() + 1;
    if vehicle.year < MIN_VEHICLE_YEAR || vehicle.year > next_year {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("year must be between {MIN_VEHICLE_YEAR} and {next_year}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Jo Driver", "full_name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("", "full_name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("   ", "full_name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(201), "full_name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "plate", MAX_PLATE_LEN).is_ok());
        assert!(validate_optional_text(&Some("AB12 CDE".into()), "plate", MAX_PLATE_LEN).is_ok());
        assert!(validate_optional_text(&Some("x".repeat(17)), "plate", MAX_PLATE_LEN).is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("jo@example.com").is_ok());
        assert!(validate_email("jo.driver+club@mail.example.co.uk").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign.example.com").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("jo@").is_err());
        assert!(validate_email("jo@localhost").is_err());
        assert!(validate_email("jo driver@example.com").is_err());
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password("paddock99").is_ok());
        assert!(validate_password("A1b2c3d4").is_ok());

        // Too short
        assert!(validate_password("abc123").is_err());
        // Letters only
        assert!(validate_password("onlyletters").is_err());
        // Digits only
        assert!(validate_password("1234567890").is_err());
        // Over the cap
        let long = format!("a1{}", "x".repeat(MAX_PASSWORD_LEN));
        assert!(validate_password(&long).is_err());
    }

    #[test]
    fn test_password_error_code() {
        let err = validate_password("short1").unwrap_err();
        assert_eq!(err.code, ErrorCode::PasswordTooWeak);
    }

    #[test]
    fn test_minimum_age_boundary() {
        let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();

        // Sixteenth birthday today: accepted
        assert!(check_minimum_age("2010-06-01", today).is_ok());
        // Turns sixteen tomorrow: rejected
        let err = check_minimum_age("2010-06-02", today).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnderMinimumAge);
        // Comfortably old enough
        assert!(check_minimum_age("1990-01-15", today).is_ok());
    }

    #[test]
    fn test_dob_rejects_future_and_garbage() {
        let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();

        let err = check_minimum_age("2030-01-01", today).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnderMinimumAge);

        let err = check_minimum_age("01/06/2010", today).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);

        let err = check_minimum_age("not-a-date", today).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
    }

    #[test]
    fn test_postal_code() {
        assert!(validate_postal_code("NN12 8TN").is_ok());
        assert!(validate_postal_code("75008").is_ok());
        assert!(validate_postal_code("K1A-0B1").is_ok());

        assert!(validate_postal_code("").is_err());
        assert!(validate_postal_code("AB").is_err());
        assert!(validate_postal_code("12345678901").is_err());
        assert!(validate_postal_code("75:008").is_err());
    }

    #[test]
    fn test_vehicle() {
        let vehicle = VehicleCreate {
            make: "Lotus".to_string(),
            model: "Elise".to_string(),
            year: 2004,
            plate: Some("AB12 CDE".to_string()),
        };
        assert!(validate_vehicle(&vehicle).is_ok());

        let mut missing_make = vehicle.clone();
        missing_make.make = String::new();
        assert!(validate_vehicle(&missing_make).is_err());

        let mut too_old = vehicle.clone();
        too_old.year = 1899;
        assert_eq!(
            validate_vehicle(&too_old).unwrap_err().code,
            ErrorCode::ValueOutOfRange
        );

        let mut far_future = vehicle;
        far_future.year = 3000;
        assert!(validate_vehicle(&far_future).is_err());
    }
}
