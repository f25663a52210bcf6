// piiscrub-core/src/types.rs
//! The closed set of PII types and the actions that can be applied to them.
//!
//! Every `PiiType` owns exactly one detection pattern (see `patterns`), one
//! validator (see `validators`), one masking strategy (see `transformers`), and one
//! token prefix. Adding a type means adding all four consistently.
//!
//! License: MIT OR APACHE 2.0

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::PiiScrubError;

/// Token prefix used when no type-specific tag applies.
pub const GENERIC_TOKEN_PREFIX: &str = "TOKEN_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiiType {
    Name,
    Email,
    Phone,
    Ssn,
    CreditCard,
    Address,
}

impl PiiType {
    /// Fixed priority order of the generic scan. Earlier types see the raw text first,
    /// later types see the replacements made by earlier ones.
    pub const SCAN_ORDER: [PiiType; 6] = [
        PiiType::CreditCard,
        PiiType::Ssn,
        PiiType::Email,
        PiiType::Phone,
        PiiType::Address,
        PiiType::Name,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Ssn => "ssn",
            Self::CreditCard => "credit_card",
            Self::Address => "address",
        }
    }

    pub fn token_prefix(&self) -> &'static str {
        match self {
            Self::Name => "PERSON_",
            Self::Email => "EMAIL_",
            Self::Phone => "PHONE_",
            Self::Ssn => "SSN_",
            Self::CreditCard => "CARD_",
            Self::Address => "ADDR_",
        }
    }

    /// All token prefixes, including the generic fallback.
    pub fn all_token_prefixes() -> [&'static str; 7] {
        [
            Self::Name.token_prefix(),
            Self::Email.token_prefix(),
            Self::Phone.token_prefix(),
            Self::Ssn.token_prefix(),
            Self::CreditCard.token_prefix(),
            Self::Address.token_prefix(),
            GENERIC_TOKEN_PREFIX,
        ]
    }
}

impl fmt::Display for PiiType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PiiType {
    type Err = PiiScrubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "name" => Ok(Self::Name),
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            "ssn" => Ok(Self::Ssn),
            "credit_card" => Ok(Self::CreditCard),
            "address" => Ok(Self::Address),
            other => Err(PiiScrubError::UnknownPiiType(other.to_string())),
        }
    }
}

/// What to do with a confirmed PII match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Deterministic keyed pseudonym (see `tokenizer`).
    Tokenize,
    /// Partial obfuscation that keeps some utility (last 4 digits, email domain, ...).
    Mask,
    /// Random character shuffle. Non-deterministic and weak; demonstration grade only.
    Scramble,
    /// Fixed `[REDACTED]` marker.
    Redact,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tokenize => "tokenize",
            Self::Mask => "mask",
            Self::Scramble => "scramble",
            Self::Redact => "redact",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = PiiScrubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tokenize" => Ok(Self::Tokenize),
            "mask" => Ok(Self::Mask),
            "scramble" => Ok(Self::Scramble),
            "redact" => Ok(Self::Redact),
            _ => Err(PiiScrubError::UnknownAction(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_scan_order_covers_every_type_once() {
        let unique: HashSet<_> = PiiType::SCAN_ORDER.iter().collect();
        assert_eq!(unique.len(), 6);
        assert_eq!(PiiType::SCAN_ORDER[0], PiiType::CreditCard);
        assert_eq!(PiiType::SCAN_ORDER[5], PiiType::Name);
    }

    #[test]
    fn test_token_prefixes_unique() {
        let prefixes = PiiType::all_token_prefixes();
        let unique: HashSet<_> = prefixes.iter().collect();
        assert_eq!(prefixes.len(), unique.len());
    }

    #[test]
    fn test_pii_type_round_trips_through_str() {
        for t in PiiType::SCAN_ORDER {
            assert_eq!(t.as_str().parse::<PiiType>().unwrap(), t);
        }
        assert!(matches!("passport".parse::<PiiType>(), Err(PiiScrubError::UnknownPiiType(_))));
    }

    #[test]
    fn test_action_parse_is_case_insensitive() {
        assert_eq!("REDACT".parse::<Action>().unwrap(), Action::Redact);
        assert_eq!(" mask ".parse::<Action>().unwrap(), Action::Mask);
        assert!(matches!("shred".parse::<Action>(), Err(PiiScrubError::UnknownAction(_))));
    }

    #[test]
    fn test_serde_names_match_display() {
        let json = serde_json::to_string(&PiiType::CreditCard).unwrap();
        assert_eq!(json, "\"credit_card\"");
        let action: Action = serde_json::from_str("\"tokenize\"").unwrap();
        assert_eq!(action, Action::Tokenize);
    }
}
