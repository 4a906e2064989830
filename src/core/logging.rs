use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing for an embedding application.
///
/// `RUST_LOG` takes precedence; `default_filter` (typically the configured
/// log level) applies when it is unset. Call once at startup.
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("tallybook={}", default_filter).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
