// Offline asset cache engine for a static site: versioned response stores,
// cache-first serving, and one operation per hosting-environment lifecycle
// event (install, fetch, activate, sync, push, notification click).

pub mod config;
pub mod engine;
pub mod server;
pub mod source;

use std::sync::Once;

use tracing::info;
use tracing_subscriber::EnvFilter;

static INIT_TRACING: Once = Once::new();

/// Install a default tracing subscriber for embedders that don't bring
/// their own. Safe to call more than once.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,reqwest=warn"));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init();

        info!("offline cache tracing initialized");
    });
}
