//! Logging initialisation.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_LEVEL: &str = "info";

/// Install a stderr subscriber filtered by `RUST_LOG` (or `level`).
///
/// Output goes to stderr so JSON printed on stdout stays machine-readable.
pub fn init(level: &str) -> Result<(), String> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| format!("failed to initialize logging: {e}"))
}
