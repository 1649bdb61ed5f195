//! Logger bootstrap.
//!
//! Logs go to stderr through `flexi_logger`. The level defaults to `info`
//! (`debug` with `--verbose`) and `RUST_LOG`, when set, takes precedence.

use flexi_logger::{FlexiLoggerError, Logger, LoggerHandle};

const DEFAULT_LEVEL: &str = "info";
const VERBOSE_LEVEL: &str = "debug";

/// Level spec used when `RUST_LOG` is not set.
pub fn default_level(verbose: bool) -> &'static str {
    if verbose { VERBOSE_LEVEL } else { DEFAULT_LEVEL }
}

/// Start the process logger.
///
/// The returned handle must be kept alive for as long as logging is needed.
pub fn init_logging(verbose: bool) -> Result<LoggerHandle, FlexiLoggerError> {
    Logger::try_with_env_or_str(default_level(verbose))?
        .format(flexi_logger::detailed_format)
        .start()
}
