// piiscrub-core/src/policy.rs
//! The immutable sanitization policy and the action resolver.
//!
//! Resolution order for a confirmed match:
//! 1. a denylisted raw value is redacted, always;
//! 2. otherwise an allowlisted raw value is left alone;
//! 3. otherwise a per-call override action applies;
//! 4. otherwise the per-type action, falling back to the default action.
//!
//! Both lists compare the raw matched substring with exact string equality.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use std::collections::{HashMap, HashSet};

use crate::types::{Action, PiiType};

/// What the engine should do with one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Leave the match untouched and record nothing.
    Skip,
    Apply(Action),
}

/// Immutable, validated policy. Build one with [`Policy::builder`] or from a
/// `PolicyConfig` document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    default_action: Action,
    per_type: HashMap<PiiType, Action>,
    column_hints: HashMap<String, PiiType>,
    allowlist: HashSet<String>,
    denylist: HashSet<String>,
    detect_names_in_free_text: bool,
}

impl Default for Policy {
    fn default() -> Self {
        let per_type = HashMap::from([
            (PiiType::Name, Action::Tokenize),
            (PiiType::Email, Action::Tokenize),
            (PiiType::Phone, Action::Mask),
            (PiiType::Ssn, Action::Redact),
            (PiiType::CreditCard, Action::Mask),
            (PiiType::Address, Action::Mask),
        ]);

        Self {
            default_action: Action::Mask,
            per_type,
            column_hints: HashMap::new(),
            allowlist: HashSet::new(),
            denylist: HashSet::new(),
            detect_names_in_free_text: false,
        }
    }
}

impl Policy {
    pub fn builder() -> PolicyBuilder {
        PolicyBuilder::default()
    }

    pub fn default_action(&self) -> Action {
        self.default_action
    }

    pub fn per_type_action(&self, pii_type: PiiType) -> Option<Action> {
        self.per_type.get(&pii_type).copied()
    }

    pub fn column_hint(&self, column: &str) -> Option<PiiType> {
        self.column_hints.get(column).copied()
    }

    pub fn column_hints(&self) -> &HashMap<String, PiiType> {
        &self.column_hints
    }

    pub fn detect_names_in_free_text(&self) -> bool {
        self.detect_names_in_free_text
    }

    pub fn is_allowlisted(&self, raw: &str) -> bool {
        self.allowlist.contains(raw)
    }

    pub fn is_denylisted(&self, raw: &str) -> bool {
        self.denylist.contains(raw)
    }

    pub fn allowlist_len(&self) -> usize {
        self.allowlist.len()
    }

    pub fn denylist_len(&self) -> usize {
        self.denylist.len()
    }

    /// Whether a name candidate in `column` may be treated as a real name.
    pub fn names_permitted(&self, column: &str) -> bool {
        self.detect_names_in_free_text || self.column_hint(column) == Some(PiiType::Name)
    }

    /// Picks the action for a match that is going to be transformed.
    pub fn resolve_action(
        &self,
        pii_type: PiiType,
        override_action: Option<Action>,
        raw: &str,
    ) -> Action {
        if self.is_denylisted(raw) {
            return Action::Redact;
        }
        if let Some(action) = override_action {
            return action;
        }
        self.per_type_action(pii_type).unwrap_or(self.default_action)
    }

    /// Full decision including the allowlist. A denylist hit wins over an allowlist hit.
    pub fn decide(
        &self,
        pii_type: PiiType,
        override_action: Option<Action>,
        raw: &str,
    ) -> Decision {
        if self.is_allowlisted(raw) && !self.is_denylisted(raw) {
            debug!("Allowlisted {} match left untouched.", pii_type);
            return Decision::Skip;
        }
        Decision::Apply(self.resolve_action(pii_type, override_action, raw))
    }
}

/// Fluent, type-checked construction of a [`Policy`]. Starts from `Policy::default()`.
#[derive(Debug, Default)]
pub struct PolicyBuilder {
    policy: Policy,
}

impl PolicyBuilder {
    pub fn default_action(mut self, action: Action) -> Self {
        self.policy.default_action = action;
        self
    }

    pub fn action_for(mut self, pii_type: PiiType, action: Action) -> Self {
        self.policy.per_type.insert(pii_type, action);
        self
    }

    /// Drops every per-type action so the default action applies to all types.
    pub fn clear_type_actions(mut self) -> Self {
        self.policy.per_type.clear();
        self
    }

    pub fn column_hint(mut self, column: impl Into<String>, pii_type: PiiType) -> Self {
        self.policy.column_hints.insert(column.into(), pii_type);
        self
    }

    pub fn allow<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.policy.allowlist.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn deny<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.policy.denylist.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn detect_names_in_free_text(mut self, enabled: bool) -> Self {
        self.policy.detect_names_in_free_text = enabled;
        self
    }

    pub fn build(self) -> Policy {
        self.policy
    }
}
