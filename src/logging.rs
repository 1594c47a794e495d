use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber. Call once at startup, before the
/// first frame.
pub fn init() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "clothing_drive=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
