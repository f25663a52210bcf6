// piiscrub-core/src/headless.rs
//! Convenience wrappers for one-shot, non-interactive use of the engine.
//!
//! `handle_request` is what a hosting API calls with the request document it received:
//!
//! ```json
//! {"input_data": [{"name": "Jane Doe"}], "query_params": {"method": "mask", "return_audit": true}}
//! ```
//!
//! A missing `input_data` is an empty dataset and a missing `query_params` means no
//! options. Any shape problem is a client-input error and no rows are processed.

use serde_json::{json, Value};

use crate::config::PolicyConfig;
use crate::dataset::{json_kind, parse_rows, parse_rows_str, Dataset, SanitizeOptions};
use crate::engine::SanitizationEngine;
use crate::engines::pii_engine::PiiEngine;
use crate::errors::PiiScrubError;
use crate::secret::SecretKey;

/// Splits a request document into rows and options.
pub fn parse_request(request: &Value) -> Result<(Dataset, SanitizeOptions), PiiScrubError> {
    let Value::Object(doc) = request else {
        return Err(PiiScrubError::InvalidInput(format!(
            "request must be an object, got {}",
            json_kind(request)
        )));
    };

    let rows = match doc.get("input_data") {
        None | Some(Value::Null) => Vec::new(),
        Some(data) => parse_rows(data.clone())?,
    };
    let options = SanitizeOptions::from_value(doc.get("query_params").unwrap_or(&Value::Null))?;
    Ok((rows, options))
}

/// Runs one request document through `engine` and returns the response document.
pub fn handle_request(
    engine: &dyn SanitizationEngine,
    request: &Value,
) -> Result<Value, PiiScrubError> {
    let (rows, options) = parse_request(request)?;
    engine.sanitize(&rows, &options)?.to_value()
}

/// The error document a hosting API returns alongside a client-error status.
pub fn error_response(err: &PiiScrubError) -> Value {
    json!({ "error": err.to_string() })
}

/// Fully sanitizes a JSON array of rows with a freshly built engine.
///
/// # Arguments
///
/// * `config` - The policy document (validated here).
/// * `secret` - Key for tokenization.
/// * `rows_json` - JSON text holding an array of row objects.
/// * `options` - Per-call override and audit switch.
pub fn headless_sanitize_json(
    config: &PolicyConfig,
    secret: SecretKey,
    rows_json: &str,
    options: &SanitizeOptions,
) -> Result<String, PiiScrubError> {
    let engine = PiiEngine::from_config(config, secret)?;
    let rows = parse_rows_str(rows_json)?;
    let output = engine.sanitize(&rows, options)?.to_value()?;
    serde_json::to_string(&output).map_err(|e| PiiScrubError::SerializationError(e.to_string()))
}
