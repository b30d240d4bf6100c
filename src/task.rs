//! Async wrappers around [`SaltedHasher`].
//!
//! Hashing is CPU-bound and short, so these only move the work onto the
//! blocking pool to keep async executors responsive. Each call draws its own
//! salt inside its own task.

use std::ops::Deref;

use crate::crypto::SaltedHasher;
use crate::error::Result;

/// Hash `plaintext` on the blocking pool.
pub async fn hash<H>(hasher: H, plaintext: String) -> Result<String>
where
    H: Deref + Send + 'static,
    H::Target: SaltedHasher,
{
    tokio::task::spawn_blocking(move || hasher.hash(&plaintext)).await?
}

/// Verify `plaintext` against `digest` on the blocking pool.
pub async fn verify<H>(hasher: H, plaintext: String, digest: String) -> Result<bool>
where
    H: Deref + Send + 'static,
    H::Target: SaltedHasher,
{
    tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &digest)).await?
}
