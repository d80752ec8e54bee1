//! Input validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

/// `local@domain.tld`, no whitespace and no extra `@` in any part
static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"));

/// Digits, `+`, `-`, parentheses and spaces only
static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9+\-() ]+$").expect("phone regex is valid"));

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

/// Validate a customer email address (format only)
pub fn validate_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Validate a customer phone number (character class only, not carrier validation)
pub fn validate_phone(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}

/// URL slug for a display name: whitespace runs become `-`, then lower-case
pub fn slugify(name: &str) -> String {
    WHITESPACE_RUN.replace_all(name, "-").to_lowercase()
}

/// True when the value is absent or blank
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
