// piiscrub-core/src/transformers.rs
//! Replacement text for confirmed matches: mask, scramble, redact, and tokenize.
//!
//! Masking is tuned per type to keep a little utility (the email domain, the last four
//! digits, the street suffix). Only tokenization needs the secret key.
//!
//! License: MIT OR APACHE 2.0

use lazy_static::lazy_static;
use rand::seq::SliceRandom;
use regex::Regex;

use crate::patterns::{ADDRESS_HOUSENUM, ADDRESS_STREET, ADDRESS_SUFFIX};
use crate::tokenizer::TokenGenerator;
use crate::types::{Action, PiiType};

pub const REDACTED_MARKER: &str = "[REDACTED]";
pub const MASKED_MARKER: &str = "[MASKED]";

/// Substring every partial mask contains.
pub const MASK_FILL: &str = "***";

lazy_static! {
    static ref ADDRESS_PARTS: Regex = {
        let head = format!(r"(?P<num>{ADDRESS_HOUSENUM})\s+(?P<street>{ADDRESS_STREET})");
        Regex::new(&format!(r"(?s)^{head}\s(?P<suf>{ADDRESS_SUFFIX})\b(?P<trail>.*)$")).unwrap()
    };

    /// A `+` calling code followed by a separator, e.g. `+44 20 ...` or `+1-415-...`.
    static ref CALLING_CODE: Regex = Regex::new(r"^\+(?P<cc>\d{1,3})[\s.\-(]").unwrap();
}

fn last4(digits: &str) -> &str {
    let start = digits.len().saturating_sub(4);
    &digits[start..]
}

fn mask_email(raw: &str) -> String {
    match raw.split_once('@') {
        Some((user, domain)) => {
            let first = user
                .trim()
                .chars()
                .next()
                .map_or_else(|| "*".to_string(), |c| c.to_string());
            format!("{first}{MASK_FILL}@{domain}")
        }
        None => MASKED_MARKER.to_string(),
    }
}

/// The international calling code, only when the raw value starts with `+`.
fn calling_code(raw: &str, digits: &str) -> Option<String> {
    let trimmed = raw.trim_start();
    if !trimmed.starts_with('+') {
        return None;
    }
    if let Some(caps) = CALLING_CODE.captures(trimmed) {
        return caps.name("cc").map(|cc| cc.as_str().to_string());
    }
    // Unseparated: whatever precedes a 10-digit national number, capped at 3 digits.
    let extra = digits.len().saturating_sub(10).min(3);
    (extra > 0).then(|| digits[..extra].to_string())
}

fn mask_phone(raw: &str, digits: &str) -> String {
    let tail = last4(digits);
    match calling_code(raw, digits) {
        Some(cc) => format!("+{cc} {MASK_FILL}-{MASK_FILL}-{tail}"),
        None => format!("{MASK_FILL}-{MASK_FILL}-{tail}"),
    }
}

fn mask_name(raw: &str) -> String {
    raw.split_whitespace()
        .map(|part| {
            let first: String = part.chars().take(1).collect();
            format!("{first}{MASK_FILL}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn mask_address(raw: &str) -> String {
    match ADDRESS_PARTS.captures(raw) {
        Some(caps) => {
            let suffix = caps.name("suf").map_or("", |m| m.as_str());
            let trail = caps.name("trail").map_or("", |m| m.as_str());
            format!("### {MASK_FILL} {suffix}{trail}")
        }
        None => MASKED_MARKER.to_string(),
    }
}

/// Partial masking of `raw`; `normalized` is the validator's canonical form.
pub fn mask(pii_type: PiiType, raw: &str, normalized: &str) -> String {
    match pii_type {
        PiiType::Email => mask_email(raw),
        PiiType::Phone => mask_phone(raw, normalized),
        PiiType::CreditCard => format!("**** **** **** {}", last4(normalized)),
        PiiType::Ssn => format!("***-**-{}", last4(normalized)),
        PiiType::Name => mask_name(raw),
        PiiType::Address => mask_address(raw),
    }
}

/// Uniformly random permutation of the characters of `value`.
///
/// Non-deterministic and trivially weaker than tokenization.
pub fn scramble(value: &str) -> String {
    let mut chars: Vec<char> = value.chars().collect();
    chars.shuffle(&mut rand::rng());
    chars.into_iter().collect()
}

pub fn redact(_value: &str) -> String {
    REDACTED_MARKER.to_string()
}

/// Applies `action` to one confirmed match.
pub fn apply(
    action: Action,
    pii_type: PiiType,
    raw: &str,
    normalized: &str,
    tokens: &TokenGenerator,
) -> String {
    match action {
        Action::Tokenize => tokens.tokenize(pii_type, normalized),
        Action::Mask => mask(pii_type, raw, normalized),
        Action::Scramble => scramble(raw),
        Action::Redact => redact(raw),
    }
}

/// Heuristic: does `text` already look like the output of a transformer?
///
/// A token prefix at the start, a fixed marker, or any mask fill means the text was
/// produced by an earlier pass or call and must not be transformed again.
pub fn looks_sanitized(text: &str) -> bool {
    if PiiType::all_token_prefixes().iter().any(|p| text.starts_with(p)) {
        return true;
    }
    if text == MASKED_MARKER || text == REDACTED_MARKER {
        return true;
    }
    text.contains(MASK_FILL)
}
