// File: piiscrub-core/src/validators.rs
//! Programmatic validation functions for each PII type.
//!
//! Detection patterns are tuned for recall; the functions here are tuned for precision.
//! Each validator normalizes a raw candidate and decides whether it is a structurally
//! valid instance of its type. A candidate that fails validation is treated as non-PII
//! and left untouched by the engine.
//!
//! License: MIT OR APACHE 2.0

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::PiiType;

lazy_static! {
    /// Three or more groups of four digits: the shape of a card number, not a phone.
    static ref CARD_LIKE_GROUPING: Regex = Regex::new(r"(?:\d{4}[-\s]?){3,}").unwrap();
}

/// The outcome of validating one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated {
    /// Canonical form used for tokenization and masking.
    pub normalized: String,
    pub valid: bool,
}

impl Validated {
    fn new(normalized: String, valid: bool) -> Self {
        Self { normalized, valid }
    }
}

/// Keeps only ASCII digits.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Validates a number using the Luhn algorithm.
///
/// The Luhn algorithm, also known as the Mod 10 algorithm, is a simple checksum
/// formula used to validate a variety of identification numbers, such as
/// credit card numbers.
///
/// # Arguments
///
/// * `num_str` - A string slice containing only digits.
///
/// # Returns
///
/// `true` if the number is valid according to the Luhn algorithm, `false` otherwise.
pub fn is_valid_luhn(num_str: &str) -> bool {
    let mut sum = 0;
    let mut alternate = false;

    for c in num_str.chars().rev() {
        let Some(mut digit) = c.to_digit(10) else { return false; };

        if alternate {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
        alternate = !alternate;
    }

    sum % 10 == 0
}

/// Issuance rules for US Social Security Numbers.
///
/// Area numbers 000, 666 and 900-999 are never issued, nor is group 00 or
/// serial 0000. Each argument is the digit string of its component.
pub fn is_issuable_ssn(area: &str, group: &str, serial: &str) -> bool {
    if area.len() != 3 || group.len() != 2 || serial.len() != 4 {
        return false;
    }

    let Some(area_num) = area.parse::<u16>().ok() else { return false; };
    let Some(group_num) = group.parse::<u8>().ok() else { return false; };
    let Some(serial_num) = serial.parse::<u16>().ok() else { return false; };

    let invalid_area = (area_num == 0) || (area_num == 666) || (area_num >= 900);
    let invalid_group = group_num == 0;
    let invalid_serial = serial_num == 0;

    !(invalid_area || invalid_group || invalid_serial)
}

/// Card numbers: 13-19 digits that pass the Luhn checksum.
pub fn validate_credit_card(raw: &str) -> Validated {
    let digits = digits_only(raw);
    let valid = (13..=19).contains(&digits.len()) && is_valid_luhn(&digits);
    Validated::new(digits, valid)
}

/// SSNs: exactly nine digits. The issuance exclusions live in the detection pattern.
pub fn validate_ssn(raw: &str) -> Validated {
    let digits = digits_only(raw);
    let valid = digits.len() == 9;
    Validated::new(digits, valid)
}

/// Phones: 10-15 digits, and not grouped like a card number.
pub fn validate_phone(raw: &str) -> Validated {
    let digits = digits_only(raw);
    if CARD_LIKE_GROUPING.is_match(raw) {
        return Validated::new(digits, false);
    }
    let valid = (10..=15).contains(&digits.len());
    Validated::new(digits, valid)
}

pub fn validate_email(raw: &str) -> Validated {
    Validated::new(raw.to_lowercase(), true)
}

/// Addresses are valid whenever the house-number + street + suffix pattern matched.
pub fn validate_address(raw: &str) -> Validated {
    Validated::new(raw.to_string(), true)
}

/// Names are only trusted in a name-hinted column or when free-text name
/// detection is switched on; the capitalized-word pattern alone is far too loose.
pub fn validate_name(raw: &str, names_permitted: bool) -> Validated {
    if names_permitted {
        Validated::new(raw.trim().to_string(), true)
    } else {
        Validated::new(raw.to_string(), false)
    }
}

/// Dispatches to the validator for `pii_type`.
///
/// `names_permitted` is only consulted for `PiiType::Name`.
pub fn validate(pii_type: PiiType, raw: &str, names_permitted: bool) -> Validated {
    match pii_type {
        PiiType::CreditCard => validate_credit_card(raw),
        PiiType::Ssn => validate_ssn(raw),
        PiiType::Phone => validate_phone(raw),
        PiiType::Email => validate_email(raw),
        PiiType::Address => validate_address(raw),
        PiiType::Name => validate_name(raw, names_permitted),
    }
}
