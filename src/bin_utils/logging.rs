use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global subscriber, `RUST_LOG` overrides the `info` default.
pub fn init_logging(json: bool) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    // a subscriber may already be set, e.g. by a test harness
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
