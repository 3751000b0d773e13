//! Phone number validation and masking.

use once_cell::sync::Lazy;
use regex::Regex;

/// Domestic mobile numbers: leading 1, second digit 3-9, 11 digits total.
/// Registration is domestic-only, so this is deliberately not a general
/// E.164 validator.
static MOBILE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^1[3-9]\d{9}$").unwrap());

/// Validates a phone number against the domestic mobile format.
pub fn validate_phone(phone: &str) -> bool {
    MOBILE_REGEX.is_match(phone)
}

/// Masks the middle digits of a phone number for logs and error messages.
pub fn mask_phone(phone: &str) -> String {
    if phone.len() >= 7 {
        format!("{}****{}", &phone[..3], &phone[phone.len() - 4..])
    } else {
        "****".to_string()
    }
}
