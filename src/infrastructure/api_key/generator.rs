//! API key generation
//!
//! Produces keys of the form `<prefix>.<secret>` where the prefix is the
//! public lookup index and the secret is only ever returned to the caller
//! once. Storage works off `<prefix>.<sha256-hex-of-presented-key>`.

use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::domain::api_key::ApiKeyId;

const PREFIX_LENGTH: usize = 8;
const SECRET_LENGTH: usize = 32;

/// Result of generating a new API key
#[derive(Debug, Clone)]
pub struct GeneratedApiKey {
    /// The full presented key (only shown once at creation)
    pub key: String,
    /// The public prefix portion
    pub prefix: String,
    /// The storage identifier derived from the presented key
    pub id: ApiKeyId,
}

/// Generator for secure API keys
#[derive(Debug, Clone)]
pub struct ApiKeyGenerator {
    prefix_length: usize,
    secret_length: usize,
}

impl ApiKeyGenerator {
    /// Create a generator with the standard prefix/secret lengths
    pub fn new() -> Self {
        Self {
            prefix_length: PREFIX_LENGTH,
            secret_length: SECRET_LENGTH,
        }
    }

    /// Generate a new API key
    pub fn generate(&self) -> GeneratedApiKey {
        let prefix = random_string(self.prefix_length);
        let secret = random_string(self.secret_length);
        let key = format!("{}.{}", prefix, secret);

        // key_id cannot fail here: both segments are alphanumeric
        let id = self
            .key_id(&key)
            .expect("generated key must produce a valid id");

        GeneratedApiKey { key, prefix, id }
    }

    /// Build a GeneratedApiKey from a known presented key
    ///
    /// Used for deterministic keys in bootstrap and tests. Returns None
    /// when the presented key is not of the `<prefix>.<secret>` form.
    pub fn from_presented(&self, presented: &str) -> Option<GeneratedApiKey> {
        let (prefix, secret) = presented.split_once('.')?;

        if prefix.is_empty() || secret.is_empty() {
            return None;
        }

        let id = self.key_id(presented)?;

        Some(GeneratedApiKey {
            key: presented.to_string(),
            prefix: prefix.to_string(),
            id,
        })
    }

    /// Derive the storage identifier for a presented key
    ///
    /// Splits on the prefix delimiter and hashes the whole presented key,
    /// yielding `<prefix>.<hash>`. Returns None for malformed input.
    pub fn key_id(&self, presented: &str) -> Option<ApiKeyId> {
        let (prefix, _) = presented.split_once('.')?;
        ApiKeyId::new(format!("{}.{}", prefix, hash_key(presented))).ok()
    }
}

impl Default for ApiKeyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn random_string(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// One-way hash of a presented key
fn hash_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_key_shape() {
        let generator = ApiKeyGenerator::new();
        let generated = generator.generate();

        let (prefix, secret) = generated.key.split_once('.').unwrap();
        assert_eq!(prefix.len(), 8);
        assert_eq!(secret.len(), 32);
        assert_eq!(generated.prefix, prefix);
        assert_eq!(generated.id.prefix(), prefix);
    }

    #[test]
    fn test_generated_keys_are_distinct() {
        let generator = ApiKeyGenerator::new();
        let key1 = generator.generate();
        let key2 = generator.generate();

        assert_ne!(key1.key, key2.key);
        assert_ne!(key1.prefix, key2.prefix);
        assert_ne!(key1.id, key2.id);
    }

    #[test]
    fn test_key_id_is_deterministic() {
        let generator = ApiKeyGenerator::new();
        let generated = generator.generate();

        let recomputed = generator.key_id(&generated.key).unwrap();
        assert_eq!(recomputed, generated.id);
    }

    #[test]
    fn test_key_id_differs_for_different_secrets() {
        let generator = ApiKeyGenerator::new();

        let id1 = generator.key_id("abcd1234.secretsecretsecretsecret").unwrap();
        let id2 = generator.key_id("abcd1234.tercestercestercestercest").unwrap();

        assert_eq!(id1.prefix(), id2.prefix());
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_key_id_rejects_malformed_input() {
        let generator = ApiKeyGenerator::new();

        assert!(generator.key_id("noseparator").is_none());
        assert!(generator.key_id(".secretonly").is_none());
    }

    #[test]
    fn test_from_presented() {
        let generator = ApiKeyGenerator::new();

        let generated = generator.from_presented("abcd1234.mysecret").unwrap();
        assert_eq!(generated.key, "abcd1234.mysecret");
        assert_eq!(generated.prefix, "abcd1234");
        assert_eq!(generated.id, generator.key_id("abcd1234.mysecret").unwrap());

        assert!(generator.from_presented("malformed").is_none());
        assert!(generator.from_presented("prefix.").is_none());
    }

    #[test]
    fn test_hash_key_is_sha256_hex() {
        let hash = hash_key("abcd1234.secret");

        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
