//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system
///
/// `RUST_LOG` takes precedence; otherwise `default_level` (e.g. `"info"`)
/// is used as the filter. Calling this more than once is harmless.
pub fn init(default_level: &str) {
    let env = env_logger::Env::default().default_filter_or(default_level);
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init("debug");
        init("warn");
        log::info!("logging still works after a second init");
    }
}
