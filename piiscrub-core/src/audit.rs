// piiscrub-core/src/audit.rs
//! Audit events for applied transformations, and PII-safe debug logging.
//!
//! An audit event never carries a full original value: the original preview keeps the
//! first 8 characters and the replacement preview the first 12, each followed by `…`
//! when something was cut.

use lazy_static::lazy_static;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::types::{Action, PiiType};

/// Characters of the original match kept in an audit preview.
pub const ORIGINAL_PREVIEW_CHARS: usize = 8;

/// Characters of the replacement kept in an audit preview.
pub const REPLACEMENT_PREVIEW_CHARS: usize = 12;

/// Marker appended to a truncated preview.
pub const ELLIPSIS: &str = "…";

lazy_static! {
    /// Whether raw matches may appear in debug logs. Off unless explicitly enabled.
    static ref PII_DEBUG_ALLOWED: bool = {
        std::env::var("PIISCRUB_ALLOW_DEBUG_PII")
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };
}

/// One transformation performed on one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub column: String,
    #[serde(rename = "type")]
    pub pii_type: PiiType,
    pub original_preview: String,
    pub action: Action,
    pub replacement_preview: String,
}

impl AuditEvent {
    /// Builds an event, truncating both previews.
    pub fn new(
        column: &str,
        pii_type: PiiType,
        original: &str,
        action: Action,
        replacement: &str,
    ) -> Self {
        Self {
            column: column.to_string(),
            pii_type,
            original_preview: preview(original, ORIGINAL_PREVIEW_CHARS),
            action,
            replacement_preview: preview(replacement, REPLACEMENT_PREVIEW_CHARS),
        }
    }
}

/// One list of events per input row, in row order.
pub type AuditTrail = Vec<Vec<AuditEvent>>;

/// First `max_chars` characters of `text`, plus `…` if anything was dropped.
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}{ELLIPSIS}")
    } else {
        head
    }
}

pub fn redact_sensitive(s: &str) -> String {
    const MAX_LEN: usize = 8;
    let len = s.chars().count();
    if len <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} chars]", len)
    }
}

fn get_loggable_content(sensitive_content: &str) -> String {
    if *PII_DEBUG_ALLOWED {
        sensitive_content.to_string()
    } else {
        redact_sensitive(sensitive_content)
    }
}

pub fn log_transformation_debug(
    module_path: &str,
    pii_type: PiiType,
    original_sensitive_content: &str,
    action: Action,
    replacement: &str,
) {
    debug!(
        "{} Transformed {} match: Original='{}', Action={}, Replacement='{}'",
        module_path,
        pii_type,
        get_loggable_content(original_sensitive_content),
        action,
        replacement
    );
}

pub fn log_rejected_candidate_debug(
    module_path: &str,
    pii_type: PiiType,
    original_sensitive_content: &str,
) {
    debug!(
        "{} Candidate for '{}' failed validation and was left unchanged: '{}'",
        module_path,
        pii_type,
        get_loggable_content(original_sensitive_content)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_with_ellipsis() {
        assert_eq!(preview("alice@example.com", 8), "alice@ex…");
        assert_eq!(preview("short", 8), "short");
        assert_eq!(preview("exactly8", 8), "exactly8");
    }

    #[test]
    fn test_preview_counts_characters_not_bytes() {
        assert_eq!(preview("Zoë Åsa Ørsted", 8), "Zoë Åsa …");
    }

    #[test]
    fn test_event_serializes_with_type_key() {
        let event = AuditEvent::new(
            "email",
            PiiType::Email,
            "alice@example.com",
            Action::Tokenize,
            "EMAIL_abcdefghijkl",
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["column"], "email");
        assert_eq!(json["type"], "email");
        assert_eq!(json["action"], "tokenize");
        assert_eq!(json["original_preview"], "alice@ex…");
        assert_eq!(json["replacement_preview"], "EMAIL_abcdef…");
    }

    #[test]
    fn test_redact_sensitive_short_string() {
        assert_eq!(redact_sensitive("abc"), "[REDACTED]".to_string());
    }

    #[test]
    fn test_redact_sensitive_long_string() {
        assert_eq!(redact_sensitive("123456789"), "[REDACTED: 9 chars]".to_string());
    }
}
