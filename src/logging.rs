//! tracing setup for the command-line binary. The library only emits events.
//!
//! Level is read from `CLIPSTORE_LOG` (e.g. `CLIPSTORE_LOG=debug`), default `warn`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_ENV: &str = "CLIPSTORE_LOG";

/// Installs a stderr subscriber. Calling it twice is harmless.
pub fn init() {
    let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();

    if result.is_ok() {
        tracing::debug!("Logging initialized");
    }
}
