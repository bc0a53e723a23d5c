//! File logging. The terminal belongs to the UI, so nothing is written to
//! stdout or stderr while the app runs.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use thiserror::Error;

const LOG_FILE_BASENAME: &str = "todo-deck";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 2 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

static LOGGER: OnceCell<(PathBuf, LoggerHandle)> = OnceCell::new();

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("unsupported log level `{0}`; expected trace|debug|info|warn|error")]
    Level(String),
    #[error("failed to create log directory `{path}`: {source}")]
    Dir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to start logger: {0}")]
    Start(#[from] flexi_logger::FlexiLoggerError),
    #[error("logging already initialized at `{0}`")]
    AlreadyInitialized(PathBuf),
}

/// Starts rotating file logs in `log_dir`. Repeated calls with the same
/// directory are no-ops.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<(), LoggingError> {
    let level = normalize_level(level)?;
    let (dir, _) = LOGGER.get_or_try_init(|| -> Result<_, LoggingError> {
        std::fs::create_dir_all(log_dir).map_err(|source| LoggingError::Dir {
            path: log_dir.to_path_buf(),
            source,
        })?;
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
            .format_for_files(flexi_logger::detailed_format)
            .start()?;
        info!(
            "starting {} {} level={level}",
            LOG_FILE_BASENAME,
            env!("CARGO_PKG_VERSION")
        );
        Ok((log_dir.to_path_buf(), handle))
    })?;
    if dir != log_dir {
        return Err(LoggingError::AlreadyInitialized(dir.clone()));
    }
    Ok(())
}

fn normalize_level(level: &str) -> Result<&'static str, LoggingError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(LoggingError::Level(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_normalized() {
        assert_eq!(normalize_level(" WARNING ").unwrap(), "warn");
        assert_eq!(normalize_level("debug").unwrap(), "debug");
        assert!(matches!(
            normalize_level("loud"),
            Err(LoggingError::Level(level)) if level == "loud"
        ));
    }
}
