/*!
 * Tracing Setup
 * Structured tracing initialization for binaries and tests
 */

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured tracing, filtered through `RUST_LOG`.
///
/// Defaults to `info` when no filter is configured. Thread ids are included
/// since every line logged here is about cross-thread behavior.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_thread_ids(true)
                .with_target(false),
        )
        .init();
}
