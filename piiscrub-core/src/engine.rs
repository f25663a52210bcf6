// piiscrub-core/src/engine.rs
//! Defines the core `SanitizationEngine` trait.
//!
//! The trait is the seam between a host (the CLI, an HTTP handler, a batch job) and a
//! concrete engine. Engines are immutable after construction apart from their token
//! cache, so one engine may be shared across threads and calls.
//!
//! License: MIT OR APACHE 2.0

use crate::audit::AuditEvent;
use crate::dataset::{Row, SanitizeOptions, SanitizeOutput};
use crate::errors::PiiScrubError;
use crate::policy::Policy;
use crate::types::Action;

/// A trait that defines the core functionality of a sanitization engine.
pub trait SanitizationEngine: Send + Sync {
    /// Sanitizes every row, preserving row order, column order, and each row's key set.
    ///
    /// Either the whole dataset is sanitized or an error is returned; there are no
    /// partial results. Cells must be scalars (text, number, boolean, or null).
    fn sanitize(
        &self,
        rows: &[Row],
        options: &SanitizeOptions,
    ) -> Result<SanitizeOutput, PiiScrubError>;

    /// Runs the hint pass and the generic scan over one piece of text as if it were a
    /// cell of `column`. Returns the rewritten text and the events it produced.
    fn sanitize_text(
        &self,
        column: &str,
        text: &str,
        override_action: Option<Action>,
    ) -> (String, Vec<AuditEvent>);

    /// Returns a reference to the engine's policy.
    fn policy(&self) -> &Policy;
}
