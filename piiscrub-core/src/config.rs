//! Configuration management for `piiscrub-core`.
//!
//! This module defines the serializable policy document, loads it from YAML or JSON
//! files (or from the embedded default), and validates it into the immutable
//! [`Policy`] the engine runs with. Validation happens once, at construction time:
//! unknown action names or unknown PII type names are rejected up front instead of
//! silently doing nothing at transform time.
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::errors::PiiScrubError;
use crate::policy::Policy;
use crate::types::{Action, PiiType};

/// An action as written in a policy document: `tokenize`, or `{ action: tokenize }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ActionSpec {
    Plain(String),
    Nested { action: String },
}

impl ActionSpec {
    pub fn name(&self) -> &str {
        match self {
            Self::Plain(name) => name,
            Self::Nested { action } => action,
        }
    }
}

/// The on-disk policy document. Every field is optional; see [`PolicyConfig::validate`]
/// for how missing fields are filled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    pub default_action: Option<String>,
    /// PII type name -> action. When present it replaces the built-in per-type map.
    pub per_type: Option<BTreeMap<String, ActionSpec>>,
    /// Column name -> PII type name.
    pub column_hints: BTreeMap<String, String>,
    pub allowlist: Vec<String>,
    pub denylist: Vec<String>,
    pub detect_names_in_free_text: bool,
}

impl PolicyConfig {
    /// Loads a policy document from a YAML or JSON file (chosen by extension).
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading policy from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read policy file {}", path.display()))?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let config = if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
        .with_context(|| format!("Failed to parse policy file {}", path.display()))?;

        debug!(
            "Loaded policy from {}: {} column hints, {} allowlisted, {} denylisted values.",
            path.display(),
            config.column_hints.len(),
            config.allowlist.len(),
            config.denylist.len()
        );
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yml::from_str(text).context("Invalid policy YAML")
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Invalid policy JSON")
    }

    /// Loads the built-in policy embedded in the library.
    pub fn load_default() -> Result<Self> {
        debug!("Loading default policy from embedded string...");
        let default_yaml = include_str!("../config/default_policy.yaml");
        Self::from_yaml_str(default_yaml).context("Failed to parse default policy")
    }

    /// Validates the document and builds the immutable [`Policy`].
    ///
    /// Missing fields take the values of `Policy::default()`. All problems are
    /// collected and reported together.
    pub fn validate(&self) -> Result<Policy, PiiScrubError> {
        let defaults = Policy::default();
        let mut errors = Vec::new();

        let default_action = match &self.default_action {
            Some(name) => name.parse::<Action>().unwrap_or_else(|_| {
                errors.push(format!("`default_action` has unknown action '{}'.", name));
                defaults.default_action()
            }),
            None => defaults.default_action(),
        };

        let mut per_type: HashMap<PiiType, Action> = HashMap::new();
        match &self.per_type {
            Some(entries) => {
                for (type_name, spec) in entries {
                    let pii_type = type_name.parse::<PiiType>();
                    let action = spec.name().parse::<Action>();
                    match (pii_type, action) {
                        (Ok(t), Ok(a)) => {
                            per_type.insert(t, a);
                        }
                        (Err(_), _) => errors.push(format!(
                            "`per_type` has unknown PII type '{}'.",
                            type_name
                        )),
                        (_, Err(_)) => errors.push(format!(
                            "`per_type.{}` has unknown action '{}'.",
                            type_name,
                            spec.name()
                        )),
                    }
                }
            }
            None => {
                for t in PiiType::SCAN_ORDER {
                    if let Some(a) = defaults.per_type_action(t) {
                        per_type.insert(t, a);
                    }
                }
            }
        }

        let mut column_hints: Vec<(String, PiiType)> = Vec::new();
        for (column, type_name) in &self.column_hints {
            if column.is_empty() {
                errors.push("`column_hints` contains an empty column name.".to_string());
                continue;
            }
            match type_name.parse::<PiiType>() {
                Ok(t) => column_hints.push((column.clone(), t)),
                Err(_) => errors.push(format!(
                    "`column_hints.{}` has unknown PII type '{}'.",
                    column, type_name
                )),
            }
        }

        if !errors.is_empty() {
            return Err(PiiScrubError::InvalidPolicy(errors.join("\n")));
        }

        let allow: HashSet<&str> = self.allowlist.iter().map(String::as_str).collect();
        let overlap = self.denylist.iter().filter(|v| allow.contains(v.as_str())).count();
        if overlap > 0 {
            warn!("{} value(s) appear in both allowlist and denylist; the denylist wins.", overlap);
        }

        let mut builder = Policy::builder()
            .clear_type_actions()
            .default_action(default_action)
            .allow(self.allowlist.iter().cloned())
            .deny(self.denylist.iter().cloned())
            .detect_names_in_free_text(self.detect_names_in_free_text);
        for (t, a) in per_type {
            builder = builder.action_for(t, a);
        }
        for (column, t) in column_hints {
            builder = builder.column_hint(column, t);
        }
        Ok(builder.build())
    }
}

/// Candidate locations for a named policy file, most specific first.
pub fn policy_candidate_paths(name: &str) -> Vec<PathBuf> {
    let base_dirs = vec![
        dirs::home_dir().map(|p| p.join(".piiscrub").join("policies")),
        dirs::config_dir().map(|p| p.join("piiscrub").join("policies")),
        Some(PathBuf::from("./config")),
    ];

    base_dirs
        .into_iter()
        .flatten()
        .flat_map(|dir| [dir.join(format!("{}.yaml", name)), dir.join(format!("{}.json", name))])
        .collect()
}

/// Loads a policy by file path, or by name from the candidate directories.
pub fn load_policy_by_name(name_or_path: &str) -> Result<PolicyConfig> {
    debug!("Attempting to load policy from: '{}'", name_or_path);

    let path = Path::new(name_or_path);
    let path_to_load = if path.is_file() {
        path.to_path_buf()
    } else {
        policy_candidate_paths(name_or_path)
            .into_iter()
            .find(|p| p.is_file())
            .ok_or_else(|| PiiScrubError::PolicyNotFound(name_or_path.to_string()))?
    };

    PolicyConfig::load_from_file(&path_to_load)
}
