use tracing_subscriber::EnvFilter;

/// Initialise logging. `RUST_LOG` wins when set; otherwise `info`, or
/// `debug` with `--verbose`.
pub fn init(debug: bool) {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(debug, from_env.as_deref()))
        .with_target(false)
        .try_init();
}

fn filter(debug: bool, from_env: Option<&str>) -> EnvFilter {
    let fallback = if debug { "debug" } else { "info" };
    from_env
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(fallback))
}
