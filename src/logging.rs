//! File-based logging. The TUI owns the terminal, so log lines must never
//! hit stdout or stderr; everything goes to a rolling file in the data dir.

use std::path::Path;

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use thiserror::Error;

const LOG_FILE_BASENAME: &str = "daytoday";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to create log directory: {0}")]
    Directory(#[from] std::io::Error),
    #[error("failed to start logger: {0}")]
    Logger(#[from] flexi_logger::FlexiLoggerError),
}

/// Start file logging. The returned handle must stay alive for the
/// lifetime of the process; dropping it flushes and stops logging.
pub fn init(level: &str, log_dir: &Path) -> Result<LoggerHandle, LoggingError> {
    std::fs::create_dir_all(log_dir)?;

    let handle = Logger::try_with_str(level)?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .start()?;

    log::info!(
        "daytoday {} started (log level {})",
        env!("CARGO_PKG_VERSION"),
        level
    );

    Ok(handle)
}
