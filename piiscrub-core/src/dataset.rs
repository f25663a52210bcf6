// piiscrub-core/src/dataset.rs
//! Rows, call options, and call output, plus their JSON shapes.
//!
//! A row is an ordered JSON object; column order and the set of keys present in each
//! row are preserved exactly. Rows may have different key sets.
//!
//! License: MIT OR APACHE 2.0

use serde_json::{Map, Value};

use crate::audit::AuditTrail;
use crate::errors::PiiScrubError;
use crate::types::Action;

pub type Row = Map<String, Value>;
pub type Dataset = Vec<Row>;

/// Turns a JSON value into a dataset. The value must be an array of objects.
pub fn parse_rows(value: Value) -> Result<Dataset, PiiScrubError> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(PiiScrubError::InvalidInput(format!(
                "expected an array of row objects, got {}",
                json_kind(&other)
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(row) => Ok(row),
            other => Err(PiiScrubError::InvalidInput(format!(
                "row {} is {}, expected an object",
                index,
                json_kind(&other)
            ))),
        })
        .collect()
}

/// Parses rows from JSON text.
pub fn parse_rows_str(text: &str) -> Result<Dataset, PiiScrubError> {
    let value: Value = serde_json::from_str(text)?;
    parse_rows(value)
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Per-call options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SanitizeOptions {
    /// Forces this action for every detected match, except denylisted ones.
    pub override_action: Option<Action>,
    /// Include one list of audit events per row in the output.
    pub return_audit: bool,
}

impl SanitizeOptions {
    pub fn new(override_action: Option<Action>, return_audit: bool) -> Self {
        Self { override_action, return_audit }
    }

    /// Reads options from a JSON object.
    ///
    /// The override is read from `method` (or `override_action`); a `null` or missing
    /// value means no override. `return_audit` must be a boolean when present.
    pub fn from_value(value: &Value) -> Result<Self, PiiScrubError> {
        let map = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) => map,
            other => {
                return Err(PiiScrubError::InvalidInput(format!(
                    "options must be an object, got {}",
                    json_kind(other)
                )))
            }
        };

        let method = map.get("method").or_else(|| map.get("override_action"));
        let override_action = match method {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(Value::String(s)) => Some(s.parse::<Action>()?),
            Some(other) => {
                return Err(PiiScrubError::InvalidInput(format!(
                    "`method` must be a string, got {}",
                    json_kind(other)
                )))
            }
        };

        let return_audit = match map.get("return_audit") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                return Err(PiiScrubError::InvalidInput(format!(
                    "`return_audit` must be a boolean, got {}",
                    json_kind(other)
                )))
            }
        };

        Ok(Self { override_action, return_audit })
    }
}

/// Result of one call: the sanitized rows, plus the audit trail if requested.
#[derive(Debug, Clone, PartialEq)]
pub struct SanitizeOutput {
    pub data: Dataset,
    pub audit: Option<AuditTrail>,
}

impl SanitizeOutput {
    /// The response document: a bare array of rows, or `{"data": [...], "audit": [...]}`.
    pub fn to_value(&self) -> Result<Value, PiiScrubError> {
        let data = Value::Array(self.data.iter().cloned().map(Value::Object).collect());
        match &self.audit {
            None => Ok(data),
            Some(trail) => {
                let mut doc = Map::new();
                doc.insert("data".to_string(), data);
                doc.insert("audit".to_string(), serde_json::to_value(trail)?);
                Ok(Value::Object(doc))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_rows_accepts_sparse_objects() {
        let rows = parse_rows(json!([{"a": 1}, {"b": "x", "c": null}])).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].contains_key("a"));
        assert!(!rows[0].contains_key("b"));
    }

    #[test]
    fn test_parse_rows_rejects_non_array() {
        let err = parse_rows(json!({"a": 1})).unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn test_parse_rows_rejects_non_object_row() {
        let err = parse_rows(json!([{"a": 1}, "not a row"])).unwrap_err();
        assert!(err.to_string().contains("row 1 is a string"));
    }

    #[test]
    fn test_options_from_value() {
        let opts =
            SanitizeOptions::from_value(&json!({"method": "redact", "return_audit": true}))
                .unwrap();
        assert_eq!(opts.override_action, Some(Action::Redact));
        assert!(opts.return_audit);

        assert_eq!(SanitizeOptions::from_value(&Value::Null).unwrap(), SanitizeOptions::default());
        let opts = SanitizeOptions::from_value(&json!({"method": null})).unwrap();
        assert_eq!(opts.override_action, None);
    }

    #[test]
    fn test_options_reject_bad_shapes() {
        for bad in [json!(["redact"]), json!({"method": "shred"}), json!({"return_audit": "yes"})] {
            let err = SanitizeOptions::from_value(&bad).unwrap_err();
            assert!(err.is_client_error(), "expected client error for {bad}");
        }
    }

    #[test]
    fn test_output_shapes() {
        let rows = parse_rows(json!([{"a": "x"}])).unwrap();
        let bare = SanitizeOutput { data: rows.clone(), audit: None };
        assert_eq!(bare.to_value().unwrap(), json!([{"a": "x"}]));

        let with_audit = SanitizeOutput { data: rows, audit: Some(vec![vec![]]) };
        assert_eq!(with_audit.to_value().unwrap(), json!({"data": [{"a": "x"}], "audit": [[]]}));
    }
}
