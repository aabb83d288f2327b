//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    // tests and demos may both try to install a logger
    let _ = env_logger::try_init();
}

/// Initialize the logging system with a default filter such as `"info"` or `"agl=debug"`
///
/// `RUST_LOG`, when set, takes precedence over `default_filter`.
pub fn init_with_filter(default_filter: &str) {
    let env = env_logger::Env::default().default_filter_or(default_filter);
    let _ = env_logger::Builder::from_env(env).try_init();
}
