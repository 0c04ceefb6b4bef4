use tracing_subscriber::EnvFilter;

/// Initialise logging for the demo binary. With `debug` the default level is
/// `debug` and `RUST_LOG` may override it; otherwise the level is pinned to
/// `info` so a stray `RUST_LOG` in the environment cannot flood the output.
pub fn init(debug: bool) {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
