use tracing_subscriber::EnvFilter;

/// Log to stderr; `RUST_LOG` overrides the default level.
pub fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("christmas_episodes=info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
