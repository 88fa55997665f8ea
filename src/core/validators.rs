//! Input validators
//!
//! Pure checks over raw operator input. The `parse_*` helpers return the
//! parsed value so the engine never parses the same string twice.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Minimum password length
pub const MIN_PASSWORD_LEN: usize = 8;

/// Number of digits in a buyer phone number
pub const PHONE_DIGITS: usize = 11;

/// True iff `password` has a lowercase letter, an uppercase letter, a digit
/// and at least [`MIN_PASSWORD_LEN`] characters
pub fn password_meets_policy(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

/// True iff `phone` is exactly [`PHONE_DIGITS`] decimal digits
pub fn phone_is_valid(phone: &str) -> bool {
    phone.len() == PHONE_DIGITS && phone.bytes().all(|b| b.is_ascii_digit())
}

/// True iff `value` parses (as an integer when `as_integer`, otherwise as a
/// real number) to something greater than zero
///
/// Unparseable input is simply `false`.
pub fn is_positive_number(value: &str, as_integer: bool) -> bool {
    if as_integer {
        parse_positive_integer(value).is_some()
    } else {
        parse_positive_real(value).is_some()
    }
}

/// Parse a positive integer quantity, ignoring surrounding whitespace
pub fn parse_positive_integer(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|n| *n > 0)
}

/// Parse a positive decimal amount, ignoring surrounding whitespace
///
/// Accepts plain (`19.99`) and scientific (`1.5e2`) notation.
pub fn parse_positive_real(value: &str) -> Option<Decimal> {
    let value = value.trim();
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .ok()
        .filter(|amount| amount.is_sign_positive() && !amount.is_zero())
}
