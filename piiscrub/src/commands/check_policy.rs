// piiscrub/src/commands/check_policy.rs
//! `piiscrub check-policy`: load a policy, validate it, and summarize it.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};

use piiscrub_core::{load_policy_by_name, PiiType, Policy};

use crate::cli::CheckPolicyCommand;

/// What `check-policy` reports about a valid policy.
#[derive(Debug, Serialize)]
pub struct PolicySummary {
    pub default_action: String,
    pub per_type: BTreeMap<String, String>,
    pub column_hints: BTreeMap<String, String>,
    pub allowlist_entries: usize,
    pub denylist_entries: usize,
    pub detect_names_in_free_text: bool,
}

impl PolicySummary {
    pub fn from_policy(policy: &Policy) -> Self {
        let per_type = PiiType::SCAN_ORDER
            .iter()
            .map(|t| {
                let action = policy.per_type_action(*t).unwrap_or(policy.default_action());
                (t.to_string(), action.to_string())
            })
            .collect();
        let column_hints = policy
            .column_hints()
            .iter()
            .map(|(column, t)| (column.clone(), t.to_string()))
            .collect();

        Self {
            default_action: policy.default_action().to_string(),
            per_type,
            column_hints,
            allowlist_entries: policy.allowlist_len(),
            denylist_entries: policy.denylist_len(),
            detect_names_in_free_text: policy.detect_names_in_free_text(),
        }
    }
}

fn write_summary<W: Write>(out: &mut W, summary: &PolicySummary) -> io::Result<()> {
    writeln!(out, "Policy is valid.")?;
    writeln!(out, "Default action: {}", summary.default_action)?;
    writeln!(out, "Actions by type:")?;
    for (pii_type, action) in &summary.per_type {
        writeln!(out, "  {:<12} {}", pii_type, action)?;
    }
    if summary.column_hints.is_empty() {
        writeln!(out, "Column hints: none")?;
    } else {
        writeln!(out, "Column hints:")?;
        for (column, pii_type) in &summary.column_hints {
            writeln!(out, "  {} -> {}", column, pii_type)?;
        }
    }
    writeln!(out, "Allowlist entries: {}", summary.allowlist_entries)?;
    writeln!(out, "Denylist entries: {}", summary.denylist_entries)?;
    writeln!(
        out,
        "Free-text name detection: {}",
        if summary.detect_names_in_free_text { "on" } else { "off" }
    )
}

pub fn run_check_policy(cmd: &CheckPolicyCommand) -> Result<()> {
    let config = load_policy_by_name(&cmd.policy)
        .with_context(|| format!("Failed to load policy '{}'", cmd.policy))?;
    let policy = config
        .validate()
        .with_context(|| format!("Policy '{}' is invalid", cmd.policy))?;
    let summary = PolicySummary::from_policy(&policy);

    let stdout = io::stdout();
    let mut writer = stdout.lock();
    if cmd.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&summary)?)?;
    } else {
        write_summary(&mut writer, &summary)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use piiscrub_core::Action;

    #[test]
    fn test_summary_lists_effective_actions() {
        let policy = Policy::builder()
            .clear_type_actions()
            .default_action(Action::Redact)
            .action_for(PiiType::Email, Action::Tokenize)
            .column_hint("contact", PiiType::Email)
            .build();
        let summary = PolicySummary::from_policy(&policy);
        assert_eq!(summary.per_type["email"], "tokenize");
        assert_eq!(summary.per_type["ssn"], "redact");
        assert_eq!(summary.column_hints["contact"], "email");

        let mut buf = Vec::new();
        write_summary(&mut buf, &summary).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("contact -> email"));
        assert!(text.contains("Free-text name detection: off"));
    }
}
