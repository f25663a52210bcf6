//! compiler.rs - Compiles and caches the detection patterns.
//!
//! The pattern set is fixed at build time, so it is compiled once per process and
//! shared behind an `Arc`. Engines grab the shared registry on construction.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use once_cell::sync::OnceCell;
use regex::{Regex, RegexBuilder};
use std::sync::Arc;

use crate::errors::PiiScrubError;
use crate::patterns::PatternRegistry;
use crate::types::PiiType;

/// Maximum allowed length for a detection pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

static REGISTRY: OnceCell<Arc<PatternRegistry>> = OnceCell::new();

/// Compiles one detection pattern for `pii_type`.
pub fn compile_pattern(pii_type: PiiType, pattern: &str) -> Result<Regex, PiiScrubError> {
    if pattern.len() > MAX_PATTERN_LENGTH {
        return Err(PiiScrubError::PatternCompilationError(
            pii_type.to_string(),
            regex::Error::Syntax(format!(
                "pattern length ({}) exceeds maximum allowed ({})",
                pattern.len(),
                MAX_PATTERN_LENGTH
            )),
        ));
    }

    let regex = RegexBuilder::new(pattern)
        .size_limit(10 * (1 << 20)) // 10 MB limit for compiled regex
        .build()
        .map_err(|e| PiiScrubError::PatternCompilationError(pii_type.to_string(), e))?;

    log::debug!(
        target: "piiscrub_core::patterns",
        "Pattern for '{}' compiled successfully.",
        pii_type
    );
    Ok(regex)
}

/// Gets the shared `PatternRegistry`, compiling it on first use.
pub fn get_or_compile_registry() -> Result<Arc<PatternRegistry>, PiiScrubError> {
    REGISTRY
        .get_or_try_init(|| {
            debug!("Detection patterns not compiled yet. Compiling now.");
            PatternRegistry::compile().map(Arc::new)
        })
        .map(Arc::clone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_pattern_rejects_oversized_patterns() {
        let huge = "a".repeat(MAX_PATTERN_LENGTH + 1);
        let err = compile_pattern(PiiType::Email, &huge).unwrap_err();
        assert!(err.to_string().contains("exceeds maximum allowed"));
    }

    #[test]
    fn test_compile_pattern_reports_syntax_errors() {
        let err = compile_pattern(PiiType::Phone, r"(\d{3}").unwrap_err();
        assert!(matches!(err, PiiScrubError::PatternCompilationError(ref t, _) if t == "phone"));
    }

    #[test]
    fn test_registry_is_shared() {
        let a = get_or_compile_registry().unwrap();
        let b = get_or_compile_registry().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
