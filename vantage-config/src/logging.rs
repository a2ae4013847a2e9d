//! Tracing subscriber bootstrap shared by binaries and integration tests.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
///
/// Honors `RUST_LOG` when set; otherwise defaults to `info` with quieter
/// notify internals. Calling this twice is a caller bug and will panic, the
/// same as any double subscriber registration.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,notify=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
