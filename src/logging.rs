use tracing_subscriber::EnvFilter;

/// Installs a fmt subscriber filtered by `filter` (e.g. `"info"` or `"neorm=debug"`).
///
/// `RUST_LOG` wins over `filter` when set. Returns false if a global subscriber
/// was already installed, which leaves that one in place.
pub fn init(filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
