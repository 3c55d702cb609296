//! Tracing setup shared by both subcommands.
//!
//! Level priority: `RUST_LOG` > `--debug` > `log_level` in settings > `info`.
//! Events go to stderr so that reports on stdout stay clean.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_LEVEL: &str = "info";

pub fn filter(debug_flag: bool, configured: Option<&str>) -> EnvFilter {
    if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if debug_flag {
        EnvFilter::new("debug")
    } else if let Some(level) = configured {
        EnvFilter::new(level)
    } else {
        EnvFilter::new(DEFAULT_LOG_LEVEL)
    }
}

/// Installs the global subscriber. Calling it a second time is a no-op.
pub fn init(debug_flag: bool, configured: Option<&str>) {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter(debug_flag, configured))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
    if installed.is_ok() {
        tracing::debug!(version = env!("CARGO_PKG_VERSION"), "logging initialised");
    }
}
