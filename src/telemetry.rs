//! Telemetry logic.
//! Installs the `tracing` subscriber used by the binary.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt};

/// Install a global subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence over `default_directive`. Fails if a global
/// subscriber is already installed, which callers may ignore.
pub fn init(default_directive: &str) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice() {
        assert!(init("warn").is_ok());
        assert!(init("debug").is_err());
    }
}
