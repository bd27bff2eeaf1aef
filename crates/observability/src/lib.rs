//! `depot-observability` — process-wide tracing setup.
//!
//! The reconcilers emit structured `debug!`/`warn!` events for every applied
//! delta and rejection; this crate turns them into JSON log lines. Binaries
//! and integration tests call [`init`] once at startup.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset: quiet overall, but keep the
/// engine's reconciliation events visible.
const DEFAULT_FILTER: &str = "info,depot_reconcile=debug";

/// Install the global tracing subscriber.
///
/// Honors `RUST_LOG` when set, falling back to [`DEFAULT_FILTER`]. Calling
/// this more than once is harmless; only the first call installs anything.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_current_span(false)
        .try_init();
}
