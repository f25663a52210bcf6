// piiscrub-core/src/tokenizer.rs
//! Deterministic, non-reversible tokens for normalized PII values.
//!
//! A token is `PREFIX` + the first 12 characters of the unpadded, lowercased RFC 4648
//! base32 encoding of `HMAC-SHA256(secret, normalized_value)`. The same key and value
//! always give the same token, across engine instances and process restarts.
//!
//! License: MIT OR APACHE 2.0

use data_encoding::BASE32_NOPAD;
use hmac::{Hmac, Mac};
use log::debug;
use sha2::Sha256;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::errors::PiiScrubError;
use crate::secret::SecretKey;
use crate::types::PiiType;

type HmacSha256 = Hmac<Sha256>;

/// Number of base32 characters kept from the digest.
pub const TOKEN_BODY_LEN: usize = 12;

/// Tokens already computed by one engine, keyed by (type, normalized value).
///
/// Lives as long as its engine and only ever grows. Reads and writes go through a
/// lock so rows can be processed from several threads.
#[derive(Debug, Default)]
pub struct TokenCache {
    entries: RwLock<HashMap<(PiiType, String), String>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, pii_type: PiiType, normalized: &str) -> Option<String> {
        let entries = self.entries.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.get(&(pii_type, normalized.to_string())).cloned()
    }

    /// Inserts `token` unless another thread got there first; returns the stored token.
    pub fn insert(&self, pii_type: PiiType, normalized: &str, token: String) -> String {
        let mut entries = self.entries.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries
            .entry((pii_type, normalized.to_string()))
            .or_insert(token)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keyed token generator with its own cache.
pub struct TokenGenerator {
    mac: HmacSha256,
    cache: TokenCache,
}

impl std::fmt::Debug for TokenGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenGenerator")
            .field("cache_entries", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl TokenGenerator {
    pub fn new(secret: &SecretKey) -> Result<Self, PiiScrubError> {
        let mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| {
            PiiScrubError::InvalidPolicy(format!(
                "Failed to initialize HMAC-SHA256 with key: {}",
                e
            ))
        })?;
        Ok(Self { mac, cache: TokenCache::new() })
    }

    /// Returns the token for `normalized`, computing and caching it on first use.
    pub fn tokenize(&self, pii_type: PiiType, normalized: &str) -> String {
        if let Some(hit) = self.cache.get(pii_type, normalized) {
            return hit;
        }
        let token = self.compute(pii_type, normalized);
        debug!(
            "Token cache miss for type '{}'. Cache size before insert: {}",
            pii_type,
            self.cache.len()
        );
        self.cache.insert(pii_type, normalized, token)
    }

    /// Computes the token without touching the cache.
    pub fn compute(&self, pii_type: PiiType, normalized: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(normalized.as_bytes());
        let digest = mac.finalize().into_bytes();
        let body = BASE32_NOPAD.encode(&digest).to_ascii_lowercase();
        format!("{}{}", pii_type.token_prefix(), &body[..TOKEN_BODY_LEN])
    }

    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }
}
