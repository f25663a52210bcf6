// piiscrub-core/src/secret.rs
//! The secret key that seeds deterministic tokenization.
//!
//! License: MIT OR APACHE 2.0

use log::warn;
use std::fmt;

/// Environment variable consulted when no key is supplied explicitly.
pub const SECRET_ENV_VAR: &str = "PII_HMAC_KEY";

/// Development-only fallback key. Tokens produced with it are predictable.
pub const DEVELOPMENT_FALLBACK_KEY: &str = "dev-only-ephemeral-key";

/// An opaque byte sequence used as the HMAC key. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey {
    bytes: Vec<u8>,
    development_fallback: bool,
}

impl SecretKey {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self { bytes: bytes.into(), development_fallback: false }
    }

    /// Resolves the key from `explicit`, then `PII_HMAC_KEY`, then the development fallback.
    pub fn resolve(explicit: Option<&str>) -> Self {
        Self::resolve_with(explicit, |name| std::env::var(name).ok())
    }

    /// Same as [`SecretKey::resolve`] with an injectable environment lookup.
    pub fn resolve_with<F>(explicit: Option<&str>, lookup_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = explicit.filter(|k| !k.is_empty()) {
            return Self::new(key.as_bytes());
        }
        if let Some(key) = lookup_env(SECRET_ENV_VAR).filter(|k| !k.is_empty()) {
            return Self::new(key.into_bytes());
        }
        warn!(
            "No secret key supplied and {} is not set. Falling back to the development-only key: \
             tokens are PREDICTABLE and must not be used in production.",
            SECRET_ENV_VAR
        );
        Self {
            bytes: DEVELOPMENT_FALLBACK_KEY.as_bytes().to_vec(),
            development_fallback: true,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// True when the key is the built-in development value.
    pub fn is_development_fallback(&self) -> bool {
        self.development_fallback
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey")
            .field("bytes", &format_args!("[{} bytes hidden]", self.bytes.len()))
            .field("development_fallback", &self.development_fallback)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_key_wins() {
        let key = SecretKey::resolve_with(Some("explicit"), |_| Some("from-env".into()));
        assert_eq!(key.as_bytes(), b"explicit");
        assert!(!key.is_development_fallback());
    }

    #[test]
    fn test_env_key_used_when_no_explicit_key() {
        let key = SecretKey::resolve_with(None, |name| {
            assert_eq!(name, SECRET_ENV_VAR);
            Some("from-env".into())
        });
        assert_eq!(key.as_bytes(), b"from-env");
    }

    #[test]
    fn test_fallback_is_flagged() {
        let key = SecretKey::resolve_with(Some(""), |_| None);
        assert!(key.is_development_fallback());
        assert_eq!(key.as_bytes(), DEVELOPMENT_FALLBACK_KEY.as_bytes());
    }

    #[test]
    fn test_debug_hides_key_material() {
        let key = SecretKey::new("super-secret-value");
        let printed = format!("{:?}", key);
        assert!(!printed.contains("super-secret-value"));
        assert!(printed.contains("18 bytes hidden"));
    }
}
