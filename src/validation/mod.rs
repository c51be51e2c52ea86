//! Field validation shared by every entity form.
//!
//! Rules live in one declarative table ([`rules`]); the [`form::FormState`]
//! engine consumes it uniformly. Money and date helpers hold the clamping and
//! derived-value arithmetic.

pub mod dates;
pub mod form;
pub mod money;
pub mod rules;

pub use form::FormState;
pub use rules::{DateRule, EntityKind, FieldKind, FieldRule};

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use validator::ValidationError;

/// Minimum length of every operator-supplied identifier.
pub const MIN_ID_LEN: usize = 3;

/// Identifier charset and minimum length.
pub static ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{3,}$").expect("identifier pattern is valid"));

/// `HH:MM`, 24-hour clock.
pub static TIME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").expect("time pattern is valid"));

pub fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Drops every keystroke outside the identifier charset.
pub fn sanitize_identifier(raw: &str) -> String {
    raw.chars().filter(|c| is_identifier_char(*c)).collect()
}

pub fn is_valid_identifier(value: &str) -> bool {
    ID_PATTERN.is_match(value)
}

pub(crate) fn validate_positive_money(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() || value.is_zero() {
        let mut err = ValidationError::new("positive_money");
        err.message = Some("must be greater than zero".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizer_drops_invalid_keystrokes() {
        assert_eq!(sanitize_identifier("RO-0 01/é_x"), "RO-001_x");
        assert_eq!(sanitize_identifier("!!"), "");
    }

    #[test]
    fn identifier_rule_requires_three_chars() {
        assert!(is_valid_identifier("W_1"));
        assert!(is_valid_identifier("order-2024"));
        assert!(!is_valid_identifier("ab"));
        assert!(!is_valid_identifier("ab c"));
        assert!(!is_valid_identifier(""));
    }
}
