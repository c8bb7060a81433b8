//! Tracing subscriber setup for services that embed the pricing engine.

use tracing_subscriber::EnvFilter;

/// Used when `RUST_LOG` is unset or unparseable.
pub const DEFAULT_LOG_FILTER: &str = "info,roadside=debug";

/// Builds the filter from `RUST_LOG`, falling back to [`DEFAULT_LOG_FILTER`].
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages everywhere
/// - `RUST_LOG=roadside_config=trace` - Trace config loading only
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Installs the global fmt subscriber.
///
/// Returns `false` if a global subscriber was already set (e.g. by the host
/// application), in which case that one stays in charge.
pub fn init_tracing() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .try_init()
        .is_ok()
}
