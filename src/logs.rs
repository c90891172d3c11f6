//! Logging setup.
//!
//! Debug records go to stderr when the `DEBUG` environment variable is set,
//! otherwise only warnings and errors are shown. `RUST_LOG` takes precedence
//! over both.

use std::env;

use env_logger::Builder;
use log::LevelFilter;

/// Install the stderr logger.
///
/// Calling it more than once is harmless; later calls are ignored.
pub fn init() {
    let level = if env::var_os("DEBUG").is_some() {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let _ = Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .try_init();
}
