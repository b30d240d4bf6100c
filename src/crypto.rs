//! Salted SHA-256 hashing.
//!
//! An encoded digest is the standard base64 form of
//! `salt || SHA256(salt || utf8(plaintext))`, where `salt` is freshly drawn
//! for every call and is exactly as long as the configured authentication
//! salt. There is no length prefix, so a digest can only be verified by a
//! [`Hasher`] configured with an authentication salt of the same length.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use constant_time_eq::constant_time_eq;
use sha2::digest::Output;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::config::Secrets;
use crate::error::{MalformedDigest, MissingSecret, Result};
use crate::random::{OsRngRandom, SecureRandom};

/// Length of a SHA-256 output.
pub const DIGEST_LENGTH: usize = 32;

/// Hash and verify operations, for callers that receive a hasher by
/// injection rather than building one.
pub trait SaltedHasher: Send + Sync {
    /// Hash `plaintext` with a fresh random salt, returning base64.
    fn hash(&self, plaintext: &str) -> Result<String>;

    /// Check `plaintext` against an encoded digest.
    fn verify(&self, plaintext: &str, encoded: &str) -> Result<bool>;
}

/// Salted digest generator holding the server secrets.
///
/// The signing key is kept alongside the authentication salt but is not part
/// of the digest input. Only the salt length drives the output layout.
pub struct Hasher<R = OsRngRandom> {
    key: Zeroizing<Vec<u8>>,
    auth_salt: Zeroizing<Vec<u8>>,
    random: R,
}

impl Hasher<OsRngRandom> {
    /// Create a new [`Hasher`] drawing salts from the OS.
    pub fn new(key: impl AsRef<[u8]>, auth_salt: impl AsRef<[u8]>) -> Result<Self> {
        Self::with_random(key, auth_salt, OsRngRandom)
    }
}

impl<R: SecureRandom> Hasher<R> {
    /// Create a new [`Hasher`] with a custom random source.
    ///
    /// The key is checked before the salt; each empty value is reported
    /// with its own [`MissingSecret`] variant.
    pub fn with_random(
        key: impl AsRef<[u8]>,
        auth_salt: impl AsRef<[u8]>,
        random: R,
    ) -> Result<Self> {
        let key = key.as_ref();
        if key.is_empty() {
            return Err(MissingSecret::Key.into());
        }

        let auth_salt = auth_salt.as_ref();
        if auth_salt.is_empty() {
            return Err(MissingSecret::AuthSalt.into());
        }

        Ok(Self {
            key: Zeroizing::new(key.to_vec()),
            auth_salt: Zeroizing::new(auth_salt.to_vec()),
            random,
        })
    }

    /// Length of the random salt put in front of every digest.
    pub fn salt_len(&self) -> usize {
        self.auth_salt.len()
    }

    /// Length of a decoded digest produced by this hasher.
    pub fn digest_len(&self) -> usize {
        self.salt_len() + DIGEST_LENGTH
    }

    /// Hash plaintext with a fresh salt and encode the result as base64.
    pub fn hash(&self, plaintext: &str) -> Result<String> {
        let salt_len = self.salt_len();
        let mut out = Vec::with_capacity(salt_len + DIGEST_LENGTH);
        out.resize(salt_len, 0);
        self.random.fill(&mut out)?;

        let digest = salted_digest(&out, plaintext);
        out.extend_from_slice(&digest);

        tracing::trace!(salt_len, encoded_len = out.len(), "plaintext hashed");

        Ok(STANDARD.encode(&out))
    }

    /// Verify plaintext against an encoded digest.
    ///
    /// A well-formed digest that does not match is `Ok(false)`. Input that
    /// is not base64, or too short to hold a salt, is an error.
    pub fn verify(&self, plaintext: &str, encoded: &str) -> Result<bool> {
        let bytes = STANDARD.decode(encoded).map_err(MalformedDigest::from)?;

        let salt_len = self.salt_len();
        if bytes.len() < salt_len {
            return Err(MalformedDigest::TooShort {
                value: bytes.len(),
                expected: salt_len,
            }
            .into());
        }

        let (salt, stored) = bytes.split_at(salt_len);
        let candidate = salted_digest(salt, plaintext);
        let matched = constant_time_eq(candidate.as_slice(), stored);

        tracing::trace!(decoded_len = bytes.len(), matched, "digest verified");

        Ok(matched)
    }
}

impl<R: SecureRandom> SaltedHasher for Hasher<R> {
    fn hash(&self, plaintext: &str) -> Result<String> {
        Hasher::<R>::hash(self, plaintext)
    }

    fn verify(&self, plaintext: &str, encoded: &str) -> Result<bool> {
        Hasher::<R>::verify(self, plaintext, encoded)
    }
}

impl TryFrom<Secrets> for Hasher {
    type Error = crate::error::Error;

    fn try_from(secrets: Secrets) -> Result<Self> {
        Self::new(secrets.key(), secrets.auth_salt())
    }
}

impl<R> std::fmt::Debug for Hasher<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hasher")
            .field("key", &format_args!("[{} bytes redacted]", self.key.len()))
            .field("salt_len", &self.auth_salt.len())
            .finish_non_exhaustive()
    }
}

/// `SHA256(salt || utf8(plaintext))`.
fn salted_digest(salt: &[u8], plaintext: &str) -> Output<Sha256> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(plaintext.as_bytes());
    hasher.finalize()
}
