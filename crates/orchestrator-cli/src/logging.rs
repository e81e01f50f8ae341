use tracing_subscriber::EnvFilter;

/// Thin wrapper mirroring the teacher's `setup_logging`: a `tracing`
/// subscriber honoring `RUST_LOG`, falling back to the configured
/// `log_level` when the environment variable is unset.
pub fn setup_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
