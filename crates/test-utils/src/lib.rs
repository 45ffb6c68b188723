//! Shared helpers for `encounterdag` integration tests.

pub mod builders;
pub mod probe;

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
///
/// Reads `ENCOUNTERDAG_LOG` (falling back to `RUST_LOG`, then `debug`), so
/// engine resolution and cascade logs show up next to a failing test.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("ENCOUNTERDAG_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(false)
            .try_init();
    });
}
