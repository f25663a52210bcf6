// piiscrub-core/src/lib.rs
//! # piiscrub Core Library
//!
//! `piiscrub-core` detects personally identifiable information (names, emails, phone
//! numbers, SSNs, card numbers, postal addresses) in tabular records and rewrites it
//! according to a policy: deterministic keyed tokens, partial masks, random scrambles,
//! or full redaction. It performs no I/O beyond optional policy-file loading.
//!
//! Detection is two-stage. A permissive pattern finds candidates, and a per-type
//! validator (Luhn for cards, issuance rules for SSNs, digit counts for phones) decides
//! whether a candidate is real. Candidates that fail validation are left untouched.
//!
//! ## Modules
//!
//! * `types`: `PiiType` and `Action`.
//! * `validators`: Per-type normalization and validation.
//! * `patterns`: The ordered detection rules and their compiler.
//! * `secret`: Secret key resolution for tokenization.
//! * `tokenizer`: HMAC-SHA256 tokens and the engine-owned token cache.
//! * `transformers`: Mask, scramble, redact, and the "already sanitized" check.
//! * `policy`: The immutable `Policy`, its builder, and action resolution.
//! * `config`: YAML/JSON policy documents and their validation.
//! * `audit`: Audit events and PII-safe debug logging.
//! * `dataset`: Rows, per-call options, and output documents.
//! * `engine`: The `SanitizationEngine` trait.
//! * `engines`: Concrete engines (`PiiEngine`).
//! * `headless`: One-shot request handling for hosts.
//! * `errors`: `PiiScrubError`.
//!
//! ## Usage Example
//!
//! ```rust
//! use piiscrub_core::{
//!     parse_rows, PiiEngine, PolicyConfig, SanitizationEngine, SanitizeOptions, SecretKey,
//! };
//! use serde_json::json;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = PolicyConfig::load_default()?;
//!     let engine = PiiEngine::from_config(&config, SecretKey::new("doc-example-key"))?;
//!
//!     let rows = parse_rows(json!([
//!         {"full_name": "Jane Doe", "ssn": "123-45-6789", "note": "call +1 415-555-2671"}
//!     ]))?;
//!     let output = engine.sanitize(&rows, &SanitizeOptions::new(None, true))?;
//!
//!     assert!(output.data[0]["full_name"].as_str().unwrap().starts_with("PERSON_"));
//!     assert_eq!(output.data[0]["ssn"], "[REDACTED]");
//!     assert_eq!(output.data[0]["note"], "call +1 ***-***-2671");
//!     assert_eq!(output.audit.unwrap()[0].len(), 3);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Core operations return [`PiiScrubError`]. Malformed rows or options are client-input
//! errors (see [`PiiScrubError::is_client_error`]); bad policies are rejected when the
//! engine is built, never silently ignored at transform time.
//!
//! ---
//! License: MIT OR APACHE 2.0

pub mod audit;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod engines;
pub mod errors;
pub mod headless;
pub mod patterns;
pub mod policy;
pub mod secret;
pub mod tokenizer;
pub mod transformers;
pub mod types;
pub mod validators;

/// Re-exports the policy document types and loaders.
pub use config::{load_policy_by_name, policy_candidate_paths, ActionSpec, PolicyConfig};

pub use errors::PiiScrubError;

pub use engine::SanitizationEngine;
pub use engines::pii_engine::PiiEngine;

pub use policy::{Decision, Policy, PolicyBuilder};
pub use secret::{SecretKey, DEVELOPMENT_FALLBACK_KEY, SECRET_ENV_VAR};
pub use types::{Action, PiiType};

/// Re-exports audit and dataset types used at the API boundary.
pub use audit::{redact_sensitive, AuditEvent, AuditTrail};
pub use dataset::{parse_rows, parse_rows_str, Dataset, Row, SanitizeOptions, SanitizeOutput};

pub use headless::{error_response, handle_request, headless_sanitize_json, parse_request};

pub use patterns::compiler::{get_or_compile_registry, MAX_PATTERN_LENGTH};
pub use tokenizer::{TokenCache, TokenGenerator};
