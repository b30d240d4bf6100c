//! Process-wide default [`Hasher`].
//!
//! Prefer building a [`Hasher`] and passing it around. This exists for call
//! sites that cannot receive one.

use once_cell::sync::OnceCell;

use crate::config::Configuration;
use crate::crypto::Hasher;
use crate::error::Result;

static DEFAULT: SharedHasher = SharedHasher::new();

/// A [`Hasher`] built at most once and then shared read-only.
pub struct SharedHasher(OnceCell<Hasher>);

impl SharedHasher {
    pub const fn new() -> Self {
        Self(OnceCell::new())
    }

    /// Install `hasher` if nothing is installed yet.
    ///
    /// Returns `false` and drops `hasher` when another instance won.
    pub fn init(&self, hasher: Hasher) -> bool {
        self.0.set(hasher).is_ok()
    }

    pub fn get(&self) -> Option<&Hasher> {
        self.0.get()
    }

    /// Return the installed hasher, building it with `f` on first use.
    ///
    /// Concurrent first callers block until one of them has finished, so `f`
    /// runs to success at most once. A failing `f` leaves the cell empty.
    pub fn get_or_init(&self, f: impl FnOnce() -> Result<Hasher>) -> Result<&Hasher> {
        self.0.get_or_try_init(f)
    }
}

impl Default for SharedHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Install the process-wide default hasher.
pub fn init(hasher: Hasher) -> bool {
    DEFAULT.init(hasher)
}

/// Process-wide default hasher, building it with `f` on first use.
pub fn get_or_init(f: impl FnOnce() -> Result<Hasher>) -> Result<&'static Hasher> {
    DEFAULT.get_or_init(f)
}

/// Process-wide default hasher, built on first use from `config.yaml` and
/// the `SALTHASH_*` environment variables.
pub fn instance() -> Result<&'static Hasher> {
    get_or_init(|| Configuration::default().read()?.with_env().hasher())
}
