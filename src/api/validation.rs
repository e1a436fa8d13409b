//! Input validation for API requests.
//!
//! For collecting multiple validation errors and returning them as an
//! ApiError, use the `ValidationErrorBuilder` from the `error` module.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Good-enough email shape check: one @, no whitespace, dotted domain.
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_DIFFICULTY: i64 = 5;

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 255 {
        return Err("Email is too long (max 255 characters)".to_string());
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate a password at registration time
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        ));
    }

    Ok(())
}

/// Validate a required free-text name field
pub fn validate_name(value: &str, label: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{label} is required"));
    }

    if value.len() > 100 {
        return Err(format!("{label} is too long (max 100 characters)"));
    }

    Ok(())
}

/// Difficulty is graded on a 0-5 scale, both ends inclusive
pub fn validate_difficulty(difficulty: i64) -> Result<(), String> {
    if !(0..=MAX_DIFFICULTY).contains(&difficulty) {
        return Err(format!("Difficulty must be between 0 and {MAX_DIFFICULTY}"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("gwen@example.com").is_ok());
        assert!(validate_email("g.davies+tag@sub.example.co.uk").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("two@@example.com").is_err());
        assert!(validate_email("spaces in@example.com").is_err());
        assert!(validate_email("no-domain@").is_err());
        assert!(validate_email(&format!("{}@example.com", "a".repeat(250))).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("longenough").is_ok());
        assert!(validate_password("12345678").is_ok());

        assert!(validate_password("").is_err());
        assert!(validate_password("short").is_err());
        assert!(validate_password("1234567").is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Cheddar", "Ingredient name").is_ok());

        let err = validate_name("", "Ingredient name").unwrap_err();
        assert!(err.contains("Ingredient name"));
        assert!(validate_name("   ", "First name").is_err());
        assert!(validate_name(&"x".repeat(101), "First name").is_err());
    }

    #[test]
    fn test_validate_difficulty_bounds_are_inclusive() {
        assert!(validate_difficulty(0).is_ok());
        assert!(validate_difficulty(3).is_ok());
        assert!(validate_difficulty(5).is_ok());

        assert!(validate_difficulty(-1).is_err());
        assert!(validate_difficulty(6).is_err());
    }
}
