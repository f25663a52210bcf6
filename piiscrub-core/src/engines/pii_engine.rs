// piiscrub-core/src/engines/pii_engine.rs
//! A `SanitizationEngine` that detects typed PII in tabular records and rewrites it
//! according to a policy.
//!
//! Each cell goes through the hinted type first (if its column has a hint), then the
//! fixed scan order. Every pass sees the text as rewritten by the passes before it, and
//! a match that already looks sanitized is never touched again, so running the engine
//! over its own output changes nothing as long as no match is scrambled.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, info};
use serde_json::Value;
use std::sync::Arc;

use crate::audit::{self, AuditEvent};
use crate::config::PolicyConfig;
use crate::dataset::{json_kind, Row, SanitizeOptions, SanitizeOutput};
use crate::engine::SanitizationEngine;
use crate::errors::PiiScrubError;
use crate::patterns::compiler::get_or_compile_registry;
use crate::patterns::{DetectionRule, PatternRegistry};
use crate::policy::{Decision, Policy};
use crate::secret::SecretKey;
use crate::tokenizer::{TokenCache, TokenGenerator};
use crate::transformers;
use crate::types::{Action, PiiType};
use crate::validators;

#[derive(Debug)]
pub struct PiiEngine {
    registry: Arc<PatternRegistry>,
    policy: Policy,
    tokens: TokenGenerator,
    development_key: bool,
}

impl PiiEngine {
    pub fn new(policy: Policy, secret: SecretKey) -> Result<Self, PiiScrubError> {
        let registry = get_or_compile_registry()?;
        let tokens = TokenGenerator::new(&secret)?;
        debug!(
            "PiiEngine created: default action '{}', {} column hints, free-text names {}.",
            policy.default_action(),
            policy.column_hints().len(),
            if policy.detect_names_in_free_text() { "on" } else { "off" }
        );
        Ok(Self {
            registry,
            policy,
            tokens,
            development_key: secret.is_development_fallback(),
        })
    }

    /// Validates `config` and builds an engine from it.
    pub fn from_config(config: &PolicyConfig, secret: SecretKey) -> Result<Self, PiiScrubError> {
        let policy = config.validate()?;
        Self::new(policy, secret)
    }

    /// Engine with the embedded default policy and the key resolved from the environment.
    pub fn with_defaults() -> Result<Self, PiiScrubError> {
        let config = PolicyConfig::load_default()?;
        Self::from_config(&config, SecretKey::resolve(None))
    }

    /// True when tokens are keyed with the predictable development key.
    pub fn uses_development_key(&self) -> bool {
        self.development_key
    }

    pub fn token_cache(&self) -> &TokenCache {
        self.tokens.cache()
    }

    /// Decides and builds the replacement for one candidate, or `None` to leave it.
    fn transform_candidate(
        &self,
        pii_type: PiiType,
        raw: &str,
        column: &str,
        override_action: Option<Action>,
        events: &mut Vec<AuditEvent>,
    ) -> Option<String> {
        if transformers::looks_sanitized(raw) {
            return None;
        }

        let denylisted = self.policy.is_denylisted(raw);
        let validated = validators::validate(pii_type, raw, self.policy.names_permitted(column));
        if !validated.valid && !denylisted {
            audit::log_rejected_candidate_debug(module_path!(), pii_type, raw);
            return None;
        }

        let action = match self.policy.decide(pii_type, override_action, raw) {
            Decision::Skip => return None,
            Decision::Apply(action) => action,
        };

        let replacement =
            transformers::apply(action, pii_type, raw, &validated.normalized, &self.tokens);
        audit::log_transformation_debug(module_path!(), pii_type, raw, action, &replacement);
        events.push(AuditEvent::new(column, pii_type, raw, action, &replacement));
        Some(replacement)
    }

    /// One detect-validate-transform pass for a single type.
    fn rewrite_with_rule(
        &self,
        rule: &DetectionRule,
        text: &str,
        column: &str,
        override_action: Option<Action>,
        events: &mut Vec<AuditEvent>,
    ) -> String {
        let candidates = rule.find_candidates(text);
        if candidates.is_empty() {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len());
        let mut last_end = 0;
        for candidate in candidates {
            out.push_str(&text[last_end..candidate.start]);
            let replacement = self.transform_candidate(
                rule.pii_type,
                candidate.raw,
                column,
                override_action,
                events,
            );
            match replacement {
                Some(replacement) => out.push_str(&replacement),
                None => out.push_str(candidate.raw),
            }
            last_end = candidate.end;
        }
        out.push_str(&text[last_end..]);
        out
    }

    fn sanitize_cell(
        &self,
        row_index: usize,
        column: &str,
        value: &Value,
        override_action: Option<Action>,
        events: &mut Vec<AuditEvent>,
    ) -> Result<Value, PiiScrubError> {
        let text = match value {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => {
                return Err(PiiScrubError::InvalidInput(format!(
                    "row {} column '{}' is {}, expected a scalar value",
                    row_index,
                    column,
                    json_kind(other)
                )))
            }
        };

        let (sanitized, cell_events) = self.sanitize_text(column, &text, override_action);
        if cell_events.is_empty() && sanitized == text {
            return Ok(value.clone());
        }
        events.extend(cell_events);
        Ok(Value::String(sanitized))
    }

    fn sanitize_row(
        &self,
        row_index: usize,
        row: &Row,
        override_action: Option<Action>,
    ) -> Result<(Row, Vec<AuditEvent>), PiiScrubError> {
        let mut events = Vec::new();
        let mut out = Row::with_capacity(row.len());
        for (column, value) in row {
            let cleaned =
                self.sanitize_cell(row_index, column, value, override_action, &mut events)?;
            out.insert(column.clone(), cleaned);
        }
        Ok((out, events))
    }
}

impl SanitizationEngine for PiiEngine {
    fn sanitize(
        &self,
        rows: &[Row],
        options: &SanitizeOptions,
    ) -> Result<SanitizeOutput, PiiScrubError> {
        if let Some(action) = options.override_action {
            debug!("Override action '{}' applies to every match in this call.", action);
        }

        let mut data = Vec::with_capacity(rows.len());
        let mut trail = options.return_audit.then(|| Vec::with_capacity(rows.len()));
        let mut total_events = 0;

        for (index, row) in rows.iter().enumerate() {
            let (clean, events) = self.sanitize_row(index, row, options.override_action)?;
            total_events += events.len();
            data.push(clean);
            if let Some(trail) = trail.as_mut() {
                trail.push(events);
            }
        }

        info!("Sanitized {} rows; {} matches transformed.", data.len(), total_events);
        Ok(SanitizeOutput { data, audit: trail })
    }

    fn sanitize_text(
        &self,
        column: &str,
        text: &str,
        override_action: Option<Action>,
    ) -> (String, Vec<AuditEvent>) {
        let mut events = Vec::new();
        if text.is_empty() {
            return (String::new(), events);
        }

        let hinted = self.policy.column_hint(column);
        let mut current = text.to_string();

        if let Some(rule) = hinted.and_then(|t| self.registry.rule(t)) {
            current = self.rewrite_with_rule(rule, &current, column, override_action, &mut events);
        }

        for rule in self.registry.rules_in_scan_order() {
            if Some(rule.pii_type) == hinted {
                continue;
            }
            if rule.pii_type == PiiType::Name && !self.policy.detect_names_in_free_text() {
                continue;
            }
            current = self.rewrite_with_rule(rule, &current, column, override_action, &mut events);
        }

        (current, events)
    }

    fn policy(&self) -> &Policy {
        &self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn engine(policy: Policy) -> PiiEngine {
        PiiEngine::new(policy, SecretKey::new("unit-test-key")).unwrap()
    }

    #[test]
    fn test_hint_pass_runs_before_generic_scan() {
        let policy = Policy::builder().column_hint("contact", PiiType::Phone).build();
        let (out, events) = engine(policy).sanitize_text("contact", "+1 415-555-2671", None);
        assert_eq!(out, "+1 ***-***-2671");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].pii_type, PiiType::Phone);
    }

    #[test]
    fn test_card_is_not_reclassified_as_phone() {
        let (out, events) =
            engine(Policy::default()).sanitize_text("note", "pay 4111 1111 1111 1111 now", None);
        assert_eq!(out, "pay **** **** **** 1111 now");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].pii_type, PiiType::CreditCard);
    }

    #[test]
    fn test_unchanged_number_cell_stays_a_number() {
        let rows = vec![json!({"age": 42, "flag": true, "missing": null})
            .as_object()
            .cloned()
            .unwrap()];
        let out = engine(Policy::default()).sanitize(&rows, &SanitizeOptions::default()).unwrap();
        assert_eq!(
            Value::Object(out.data[0].clone()),
            json!({"age": 42, "flag": true, "missing": null})
        );
        assert!(out.audit.is_none());
    }

    #[test]
    fn test_transformed_number_cell_becomes_text() {
        let rows = vec![json!({"card": 4111111111111111u64}).as_object().cloned().unwrap()];
        let out = engine(Policy::default()).sanitize(&rows, &SanitizeOptions::default()).unwrap();
        assert_eq!(out.data[0]["card"], json!("**** **** **** 1111"));
    }

    #[test]
    fn test_nested_cell_is_rejected() {
        let rows = vec![json!({"tags": ["a"]}).as_object().cloned().unwrap()];
        let err =
            engine(Policy::default()).sanitize(&rows, &SanitizeOptions::default()).unwrap_err();
        assert!(err.is_client_error());
        assert!(err.to_string().contains("column 'tags'"));
    }

    #[test]
    fn test_denylisted_literal_is_redacted_even_if_invalid() {
        let policy = Policy::builder().deny(["4111111111111112"]).build();
        let (out, events) = engine(policy).sanitize_text("note", "card 4111111111111112", None);
        assert_eq!(out, "card [REDACTED]");
        assert_eq!(events[0].action, Action::Redact);
    }
}
