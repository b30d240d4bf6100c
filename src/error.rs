//! Error handler for salthash.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Secret that was absent or empty while building a [`crate::Hasher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MissingSecret {
    #[error("signing key not defined")]
    Key,
    #[error("authentication salt not defined")]
    AuthSalt,
}

/// Encoded digest that cannot be split into salt and digest.
#[derive(Debug, Error)]
pub enum MalformedDigest {
    #[error("digest is not valid base64")]
    Base64(#[from] base64::DecodeError),
    #[error("digest length is {value} while at least {expected} is expected")]
    TooShort { value: usize, expected: usize },
}

/// Enum representing every failure of the crate.
///
/// A digest that simply does not match its plaintext is not an error,
/// [`crate::Hasher::verify`] returns `Ok(false)` for it.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] MissingSecret),

    #[error("malformed digest: {0}")]
    MalformedDigest(#[from] MalformedDigest),

    #[error("secure random source failed: {0}")]
    Random(#[from] rand::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("cannot parse configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("hashing task did not complete: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl Error {
    /// Which secret was missing, if this is a configuration failure.
    pub fn missing_secret(&self) -> Option<MissingSecret> {
        match self {
            Error::InvalidConfiguration(secret) => Some(*secret),
            _ => None,
        }
    }

    /// Whether the error is caused by a caller-supplied digest.
    pub fn is_malformed_digest(&self) -> bool {
        matches!(self, Error::MalformedDigest(_))
    }
}
