use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Installs a global `fmt` subscriber filtered by `RUST_LOG` (default `dlws_rs=info`).
///
/// Intended for binaries, examples and tests; calling it twice is a no-op.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dlws_rs=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
