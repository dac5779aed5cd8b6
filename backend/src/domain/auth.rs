//! Authentication primitives: login credentials and stored hashes.
//!
//! Keep inbound payload parsing outside the domain by exposing
//! constructors that validate string inputs before a handler talks to a
//! port or service. Plaintext secrets live in zeroizing buffers so they
//! are wiped on drop.

use std::fmt;

use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Minimum accepted length for a new secret.
pub const SECRET_MIN: usize = 6;

/// Number of random salt bytes mixed into each stored hash.
const SALT_LEN: usize = 16;

/// Errors raised when handling credentials.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    /// Handle was missing or blank once trimmed.
    #[error("handle must not be empty")]
    EmptyHandle,
    /// Secret was blank.
    #[error("secret must not be empty")]
    EmptySecret,
    /// Secret is shorter than the accepted minimum.
    #[error("secret must be at least {min} characters")]
    SecretTooShort {
        /// Minimum accepted length.
        min: usize,
    },
    /// A stored hash string did not have the `salt$digest` shape.
    #[error("stored credential hash is malformed")]
    MalformedHash,
}

/// Validate a proposed secret against the minimum length.
pub fn validate_secret(secret: &str) -> Result<(), CredentialError> {
    if secret.chars().count() < SECRET_MIN {
        return Err(CredentialError::SecretTooShort { min: SECRET_MIN });
    }
    Ok(())
}

/// Validated login credentials used by the authentication service.
///
/// ## Invariants
/// - `handle` is trimmed and must not be empty after trimming.
/// - `secret` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    handle: String,
    secret: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw handle/secret inputs.
    pub fn try_from_parts(handle: &str, secret: &str) -> Result<Self, CredentialError> {
        let normalized = handle.trim();
        if normalized.is_empty() {
            return Err(CredentialError::EmptyHandle);
        }

        if secret.is_empty() {
            return Err(CredentialError::EmptySecret);
        }

        Ok(Self {
            handle: normalized.to_owned(),
            secret: Zeroizing::new(secret.to_owned()),
        })
    }

    /// Handle string suitable for identity lookups.
    pub fn handle(&self) -> &str {
        self.handle.as_str()
    }

    /// Secret string provided by the caller.
    pub fn secret(&self) -> &str {
        self.secret.as_str()
    }
}

/// Salted one-way hash of an identity's secret.
///
/// Stored as `<salt-hex>$<sha256-hex>`. The salt is regenerated on every
/// derivation, so equal secrets never share a stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Derive a hash for `secret` with a fresh random salt.
    pub fn derive(secret: &str) -> Self {
        let mut salt = [0_u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        Self(format!("{}${}", hex::encode(salt), digest_hex(&salt, secret)))
    }

    /// Wrap a hash string read back from storage.
    pub fn from_stored(value: impl Into<String>) -> Result<Self, CredentialError> {
        let value = value.into();
        let Some((salt, digest)) = value.split_once('$') else {
            return Err(CredentialError::MalformedHash);
        };
        if salt.is_empty()
            || digest.is_empty()
            || hex::decode(salt).is_err()
            || hex::decode(digest).is_err()
        {
            return Err(CredentialError::MalformedHash);
        }
        Ok(Self(value))
    }

    /// Check `secret` against the stored hash.
    pub fn verify(&self, secret: &str) -> bool {
        let Some((salt_hex, digest_hex_stored)) = self.0.split_once('$') else {
            return false;
        };
        let Ok(salt) = hex::decode(salt_hex) else {
            return false;
        };
        let candidate = digest_hex(&salt, secret);
        let stored = digest_hex_stored.as_bytes();
        let candidate = candidate.as_bytes();
        if stored.len() != candidate.len() {
            return false;
        }
        // Compare every byte so timing does not leak the match prefix.
        stored
            .iter()
            .zip(candidate)
            .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }

    /// The stored representation.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn digest_hex(salt: &[u8], secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("", "pw", CredentialError::EmptyHandle)]
    #[case("   ", "pw", CredentialError::EmptyHandle)]
    #[case("user", "", CredentialError::EmptySecret)]
    fn invalid_credentials(
        #[case] handle: &str,
        #[case] secret: &str,
        #[case] expected: CredentialError,
    ) {
        let err = LoginCredentials::try_from_parts(handle, secret)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  nguyenvana  ", "secret")]
    #[case("lecturer01", "correct horse battery staple")]
    fn valid_credentials_trim_handle(#[case] handle: &str, #[case] secret: &str) {
        let creds = LoginCredentials::try_from_parts(handle, secret)
            .expect("valid inputs should succeed");
        assert_eq!(creds.handle(), handle.trim());
        assert_eq!(creds.secret(), secret);
    }

    #[test]
    fn derived_hash_verifies_the_original_secret() {
        let hash = PasswordHash::derive("hunter22");
        assert!(hash.verify("hunter22"));
        assert!(!hash.verify("hunter23"));
        assert!(!hash.verify(""));
    }

    #[test]
    fn equal_secrets_never_share_a_stored_value() {
        let first = PasswordHash::derive("hunter22");
        let second = PasswordHash::derive("hunter22");
        assert_ne!(first.as_str(), second.as_str());
        assert!(first.verify("hunter22"));
        assert!(second.verify("hunter22"));
    }

    #[test]
    fn stored_hash_round_trips() {
        let hash = PasswordHash::derive("hunter22");
        let restored =
            PasswordHash::from_stored(hash.as_str()).expect("stored hash should parse");
        assert!(restored.verify("hunter22"));
    }

    #[rstest]
    #[case("tiny", false)]
    #[case("123456", true)]
    #[case("correct horse battery staple", true)]
    fn secrets_shorter_than_the_minimum_are_rejected(#[case] secret: &str, #[case] ok: bool) {
        assert_eq!(validate_secret(secret).is_ok(), ok);
    }

    #[rstest]
    #[case("")]
    #[case("no-separator")]
    #[case("$deadbeef")]
    #[case("deadbeef$")]
    #[case("nothex$deadbeef")]
    #[case("deadbeef$nothex")]
    fn malformed_stored_hashes_are_rejected(#[case] raw: &str) {
        let err = PasswordHash::from_stored(raw).expect_err("malformed must fail");
        assert_eq!(err, CredentialError::MalformedHash);
    }
}
