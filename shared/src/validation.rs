//! Input validation functions
//!
//! Each validator reports the offending field so the API can render
//! RealWorld-style `{"errors": {"field": ["message"]}}` bodies.

use crate::errors::FieldError;
use regex_lite::Regex;
use std::sync::OnceLock;
use validator::ValidateEmail;

pub const MAX_EMAIL_LEN: usize = 255;
pub const MAX_USERNAME_LEN: usize = 64;
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;
pub const MAX_TAG_LEN: usize = 64;

fn username_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("username pattern is valid"))
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), FieldError> {
    if email.trim().is_empty() {
        return Err(FieldError::blank("email"));
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err(FieldError::new("email", "is too long"));
    }
    if !email.validate_email() {
        return Err(FieldError::new("email", "is invalid"));
    }
    Ok(())
}

/// Validate username: non-blank, letters, digits, `_` and `-` only
pub fn validate_username(username: &str) -> Result<(), FieldError> {
    if username.trim().is_empty() {
        return Err(FieldError::blank("username"));
    }
    if username.len() > MAX_USERNAME_LEN {
        return Err(FieldError::new(
            "username",
            format!("is too long (maximum is {} characters)", MAX_USERNAME_LEN),
        ));
    }
    if !username_regex().is_match(username) {
        return Err(FieldError::new("username", "is invalid"));
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), FieldError> {
    if password.is_empty() {
        return Err(FieldError::blank("password"));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(FieldError::new(
            "password",
            format!("is too short (minimum is {} characters)", MIN_PASSWORD_LEN),
        ));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(FieldError::new(
            "password",
            format!("is too long (maximum is {} characters)", MAX_PASSWORD_LEN),
        ));
    }
    Ok(())
}

/// Reject blank values for a required text field
pub fn validate_required(field: &'static str, value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        Err(FieldError::blank(field))
    } else {
        Ok(())
    }
}

/// Validate every tag of an article's tag list
pub fn validate_tags(tags: &[String]) -> Result<(), FieldError> {
    for tag in tags {
        if tag.trim().is_empty() {
            return Err(FieldError::new("tagList", "can't contain blank tags"));
        }
        if tag.len() > MAX_TAG_LEN {
            return Err(FieldError::new(
                "tagList",
                format!("tags are limited to {} characters", MAX_TAG_LEN),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::{SafeEmail, Username};
    use fake::Fake;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("user.name@domain.co.uk").is_ok());
        assert_eq!(validate_email("").unwrap_err(), FieldError::blank("email"));
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("spaces in@email.com").is_err());
    }

    #[test]
    fn test_fake_emails_are_valid() {
        for _ in 0..20 {
            let email: String = SafeEmail().fake();
            assert!(validate_email(&email).is_ok(), "{} should be valid", email);
        }
    }

    #[rstest]
    #[case("jake", true)]
    #[case("jake_the-dog42", true)]
    #[case("", false)]
    #[case("   ", false)]
    #[case("has space", false)]
    #[case("semi;colon", false)]
    fn test_validate_username(#[case] username: &str, #[case] valid: bool) {
        assert_eq!(validate_username(username).is_ok(), valid);
    }

    #[test]
    fn test_username_too_long() {
        let err = validate_username(&"a".repeat(MAX_USERNAME_LEN + 1)).unwrap_err();
        assert_eq!(err.field, "username");
    }

    #[test]
    fn test_fake_usernames_accepted_after_cleanup() {
        for _ in 0..20 {
            let raw: String = Username().fake();
            let cleaned: String = raw
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
                .collect();
            if !cleaned.is_empty() {
                assert!(validate_username(&cleaned).is_ok());
            }
        }
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("password123").is_ok());
        assert!(validate_password("12345678").is_ok());
        assert!(validate_password("short").is_err());
        assert_eq!(validate_password("").unwrap_err(), FieldError::blank("password"));
        assert!(validate_password(&"a".repeat(129)).is_err());
    }

    #[test]
    fn test_validate_required() {
        assert!(validate_required("title", "Dragons").is_ok());
        assert_eq!(
            validate_required("body", "  \n").unwrap_err(),
            FieldError::blank("body")
        );
    }

    #[test]
    fn test_validate_tags() {
        assert!(validate_tags(&[]).is_ok());
        assert!(validate_tags(&["rust".to_string(), "axum".to_string()]).is_ok());
        assert!(validate_tags(&[" ".to_string()]).is_err());
        assert!(validate_tags(&["x".repeat(MAX_TAG_LEN + 1)]).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_password_length_valid(len in MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN) {
            let password: String = (0..len).map(|_| 'a').collect();
            prop_assert!(validate_password(&password).is_ok());
        }

        #[test]
        fn prop_password_too_short(len in 1usize..MIN_PASSWORD_LEN) {
            let password: String = (0..len).map(|_| 'a').collect();
            prop_assert!(validate_password(&password).is_err());
        }

        #[test]
        fn prop_simple_usernames_valid(username in "[A-Za-z0-9_-]{1,64}") {
            prop_assert!(validate_username(&username).is_ok());
        }
    }
}
