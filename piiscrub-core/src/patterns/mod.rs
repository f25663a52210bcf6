// piiscrub-core/src/patterns/mod.rs
//! The pattern registry: one detection rule per PII type, iterated in a fixed order.
//!
//! Patterns are permissive on purpose and only locate *candidates*; every candidate
//! still goes through its type's validator before it is treated as PII.
//!
//! Each pattern exposes the candidate through a capture group named `m`. Digit
//! boundaries (a card number must not be glued to more digits) are written as a
//! consumed non-digit or text edge on either side of that group, and the scan resumes
//! at the end of `m` so a boundary character can serve the next candidate too.
//!
//! License: MIT OR APACHE 2.0

pub mod compiler;

use regex::{Captures, Regex};
use std::collections::HashMap;

use crate::errors::PiiScrubError;
use crate::types::PiiType;
use crate::validators;

/// Street suffixes recognized by the address pattern. Longer spellings come first so
/// alternation prefers `Terrace` over `Ter`.
pub const ADDRESS_SUFFIX: &str = "(?:Street|St|Road|Rd|Avenue|Ave|Boulevard|Blvd|Lane|Ln|\
Drive|Dr|Court|Ct|Way|Highway|Hwy|Terrace|Ter|Place|Pl|Parkway|Pkwy|Circle|Cir|Trail|Trl|\
Crescent|Cres|Close|Cl)";

/// House number: digits with an optional letter, or a simple range/fraction (`10-12`, `12/3`).
pub const ADDRESS_HOUSENUM: &str = r"\d{1,6}[A-Za-z]?(?:[/-]\d{1,4})?";

/// Street name: letters, digits, spaces, dots, hyphens, apostrophes (lazy).
pub const ADDRESS_STREET: &str = r"[A-Za-z0-9.\-'\s]+?";

const CREDIT_CARD_PATTERN: &str = r"(?:^|\D)(?P<m>\d(?:[ -]?\d){12,18})(?:\D|$)";

const SSN_PATTERN: &str =
    r"\b(?P<m>(?P<area>\d{3})[- ]?(?P<group>\d{2})[- ]?(?P<serial>\d{4}))\b";

const EMAIL_PATTERN: &str = r"\b(?P<m>[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[A-Za-z]{2,})\b";

const PHONE_PATTERN: &str =
    r"(?:^|\D)(?P<m>(?:\+?\d{1,3}[-.\s]?)?(?:\(?\d{2,4}\)?[-.\s]?)\d{3,4}[-.\s]?\d{4})(?:\D|$)";

const NAME_PATTERN: &str = r"\b(?P<m>[A-Z][a-z]+(?:\s+[A-Z][a-z]+){0,3})\b";

fn address_pattern() -> String {
    let head = address_head();
    format!(r"(?P<m>{head}[ ,A-Za-z0-9.\-#]*)")
}

/// House number, street name and suffix, without the trailing locality.
fn address_head() -> String {
    format!(r"\b{ADDRESS_HOUSENUM}\s+{ADDRESS_STREET}\s{ADDRESS_SUFFIX}\b")
}

/// A pattern-level check on a raw regex match, evaluated before validation.
type CandidateGuard = fn(&Captures<'_>) -> bool;

/// SSN area/group/serial issuance exclusions, applied on the captured components.
fn ssn_guard(caps: &Captures<'_>) -> bool {
    match (caps.name("area"), caps.name("group"), caps.name("serial")) {
        (Some(area), Some(group), Some(serial)) => {
            validators::is_issuable_ssn(area.as_str(), group.as_str(), serial.as_str())
        }
        _ => false,
    }
}

/// A located candidate substring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<'t> {
    pub start: usize,
    pub end: usize,
    pub raw: &'t str,
}

/// One detection record: the type, its compiled pattern, and an optional guard.
///
/// `split` marks where a new candidate starts inside a match. The address trail would
/// otherwise run into a second address in the same text and swallow it.
#[derive(Debug)]
pub struct DetectionRule {
    pub pii_type: PiiType,
    pub regex: Regex,
    guard: Option<CandidateGuard>,
    split: Option<Regex>,
}

impl DetectionRule {
    /// Finds all non-overlapping candidates in `text`, left to right.
    pub fn find_candidates<'t>(&self, text: &'t str) -> Vec<Candidate<'t>> {
        let mut out = Vec::new();
        let mut pos = 0;

        while pos <= text.len() {
            let Some(caps) = self.regex.captures_at(text, pos) else { break };
            let Some(m) = caps.name("m") else { break };

            let end = m.start() + self.split_len(m.as_str());
            let next = if end > pos {
                end
            } else {
                // Never stall on an empty group.
                match text[pos..].chars().next() {
                    Some(c) => pos + c.len_utf8(),
                    None => break,
                }
            };

            if self.guard.map_or(true, |guard| guard(&caps)) {
                out.push(Candidate { start: m.start(), end, raw: &text[m.start()..end] });
            }
            pos = next;
        }
        out
    }

    /// Length of `raw` up to the start of the next candidate it contains, with the
    /// separating spaces and commas dropped.
    fn split_len(&self, raw: &str) -> usize {
        let Some(split) = &self.split else { return raw.len() };
        let Some(first) = split.find(raw) else { return raw.len() };
        match split.find_at(raw, first.end()) {
            Some(second) => raw[..second.start()]
                .trim_end_matches(|c: char| c.is_whitespace() || c == ',')
                .len(),
            None => raw.len(),
        }
    }
}

/// All detection rules, one per `PiiType`.
#[derive(Debug)]
pub struct PatternRegistry {
    rules: HashMap<PiiType, DetectionRule>,
}

impl PatternRegistry {
    /// Compiles every pattern. Prefer `compiler::get_or_compile_registry`, which shares
    /// a single compiled registry across engines.
    pub fn compile() -> Result<Self, PiiScrubError> {
        let address = address_pattern();
        let specs: [(PiiType, &str, Option<CandidateGuard>); 6] = [
            (PiiType::CreditCard, CREDIT_CARD_PATTERN, None),
            (PiiType::Ssn, SSN_PATTERN, Some(ssn_guard)),
            (PiiType::Email, EMAIL_PATTERN, None),
            (PiiType::Phone, PHONE_PATTERN, None),
            (PiiType::Address, address.as_str(), None),
            (PiiType::Name, NAME_PATTERN, None),
        ];

        let mut rules = HashMap::with_capacity(specs.len());
        for (pii_type, pattern, guard) in specs {
            let regex = compiler::compile_pattern(pii_type, pattern)?;
            let split = match pii_type {
                PiiType::Address => Some(compiler::compile_pattern(pii_type, &address_head())?),
                _ => None,
            };
            rules.insert(pii_type, DetectionRule { pii_type, regex, guard, split });
        }
        Ok(Self { rules })
    }

    pub fn rule(&self, pii_type: PiiType) -> Option<&DetectionRule> {
        self.rules.get(&pii_type)
    }

    /// Rules in the fixed scan priority order.
    pub fn rules_in_scan_order(&self) -> impl Iterator<Item = &DetectionRule> {
        PiiType::SCAN_ORDER.iter().filter_map(move |t| self.rules.get(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_candidates(pii_type: PiiType, text: &str) -> Vec<String> {
        let registry = PatternRegistry::compile().unwrap();
        registry
            .rule(pii_type)
            .unwrap()
            .find_candidates(text)
            .into_iter()
            .map(|c| c.raw.to_string())
            .collect()
    }

    #[test]
    fn test_registry_order_matches_scan_order() {
        let registry = PatternRegistry::compile().unwrap();
        let order: Vec<PiiType> = registry.rules_in_scan_order().map(|r| r.pii_type).collect();
        assert_eq!(order, PiiType::SCAN_ORDER.to_vec());
    }

    #[test]
    fn test_credit_card_candidates_exclude_trailing_separator() {
        let found = raw_candidates(PiiType::CreditCard, "Card 4111 1111 1111 1111 and more");
        assert_eq!(found, vec!["4111 1111 1111 1111"]);
    }

    #[test]
    fn test_credit_card_rejects_longer_digit_runs() {
        assert!(raw_candidates(PiiType::CreditCard, "id 12345678901234567890123").is_empty());
    }

    #[test]
    fn test_adjacent_cards_share_one_boundary() {
        let found = raw_candidates(PiiType::CreditCard, "4111111111111111,5555555555554444");
        assert_eq!(found, vec!["4111111111111111", "5555555555554444"]);
    }

    #[test]
    fn test_ssn_guard_rejects_unissued_numbers() {
        assert_eq!(raw_candidates(PiiType::Ssn, "SSN 123-45-6789"), vec!["123-45-6789"]);
        assert!(raw_candidates(PiiType::Ssn, "SSN 987-65-4320").is_empty());
        assert!(raw_candidates(PiiType::Ssn, "SSN 000-12-3456").is_empty());
        assert!(raw_candidates(PiiType::Ssn, "SSN 666-12-3456").is_empty());
        assert!(raw_candidates(PiiType::Ssn, "SSN 123-00-3456").is_empty());
        assert!(raw_candidates(PiiType::Ssn, "SSN 123-45-0000").is_empty());
        assert_eq!(raw_candidates(PiiType::Ssn, "123456789"), vec!["123456789"]);
    }

    #[test]
    fn test_phone_candidates() {
        assert_eq!(
            raw_candidates(PiiType::Phone, "Call +1 415-555-2671."),
            vec!["+1 415-555-2671"]
        );
        assert_eq!(raw_candidates(PiiType::Phone, "(212) 555-7890"), vec!["(212) 555-7890"]);
    }

    #[test]
    fn test_email_candidates() {
        let found =
            raw_candidates(PiiType::Email, "contact public@example.com and bob@example.com");
        assert_eq!(found, vec!["public@example.com", "bob@example.com"]);
    }

    #[test]
    fn test_address_candidates_include_locality() {
        let found =
            raw_candidates(PiiType::Address, "742 Evergreen Terrace, Springfield, IL 62704");
        assert_eq!(found, vec!["742 Evergreen Terrace, Springfield, IL 62704"]);

        let found =
            raw_candidates(PiiType::Address, "Ship to 221B Baker Street, London NW1 6XE.");
        assert_eq!(found, vec!["221B Baker Street, London NW1 6XE."]);
    }

    #[test]
    fn test_address_trail_stops_at_next_address() {
        let found = raw_candidates(PiiType::Address, "from 1 Main St to 22 Elm Road");
        assert_eq!(found, vec!["1 Main St to", "22 Elm Road"]);

        let found = raw_candidates(PiiType::Address, "1 Main St, 22 Elm Road, Springfield");
        assert_eq!(found, vec!["1 Main St", "22 Elm Road, Springfield"]);
    }

    #[test]
    fn test_name_candidates() {
        let found = raw_candidates(PiiType::Name, "Contact John Doe for details.");
        assert_eq!(found, vec!["Contact John Doe"]);
    }
}
