//! Secure random generation using OS RNG.

use rand::RngCore;
use rand::rngs::OsRng;

/// Source of salt bytes.
///
/// Implementations are shared between threads, two hash calls may ask for
/// bytes at the same instant.
pub trait SecureRandom: Send + Sync {
    /// Fill `dest` entirely with random bytes.
    fn fill(&self, dest: &mut [u8]) -> Result<(), rand::Error>;
}

/// OS-based secure random generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRngRandom;

impl OsRngRandom {
    pub fn new() -> Self {
        Self
    }
}

impl SecureRandom for OsRngRandom {
    fn fill(&self, dest: &mut [u8]) -> Result<(), rand::Error> {
        OsRng.try_fill_bytes(dest)
    }
}
