use tracing_subscriber::{fmt, EnvFilter};

/// Logs to standard error, standard output being reserved for the CSV.
/// Filters come from `RUST_LOG` and default to "info".
pub fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
