//! salthash is a small salted SHA-256 hasher for text secrets.
//!
//! A [`Hasher`] is built from a signing key and an authentication salt held by
//! the server. Every [`Hasher::hash`] call draws a fresh random salt as long as
//! the authentication salt and returns `base64(salt || SHA256(salt || text))`.
//!
//! ```rust
//! let hasher = salthash::Hasher::new("signing key", "}46aSb$]R|jjTtKGY`")?;
//!
//! let digest = hasher.hash("secret")?;
//! assert!(hasher.verify("secret", &digest)?);
//! assert!(!hasher.verify("wrong", &digest)?);
//! # Ok::<(), salthash::Error>(())
//! ```
#![forbid(unsafe_code)]

pub mod config;
pub mod crypto;
pub mod error;
pub mod random;
pub mod shared;
pub mod task;
pub mod telemetry;

pub use config::Configuration;
pub use crypto::{DIGEST_LENGTH, Hasher, SaltedHasher};
pub use error::{Error, MalformedDigest, MissingSecret, Result};
pub use random::{OsRngRandom, SecureRandom};
