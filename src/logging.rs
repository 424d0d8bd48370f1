use std::error::Error;
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// Installe un subscriber `fmt` filtré par `RUST_LOG`.
///
/// Échoue si un subscriber global est déjà en place ; celui-ci est conservé.
pub fn init() -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
    Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
}
