//! Process-wide logger bootstrap.
//!
//! # Invariants
//! - The backend is started at most once per process.
//! - Re-initialization with the same settings is a no-op; different settings are rejected.
//! - Initialization never panics.

use crate::error::AppError;
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

pub const LOG_ENV_VAR: &str = "TASKBOARD_LOG";
const LOG_FILE_BASENAME: &str = "taskboard";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    log_dir: Option<PathBuf>,
    _logger: LoggerHandle,
}

/// Starts logging at `level`, to rotating files in `log_dir` when given,
/// otherwise to stderr.
///
/// # Errors
/// - `InvalidInput` for an unsupported level, or when already initialized
///   with different settings.
/// - `InvalidData` when the log directory or backend cannot be set up.
pub fn init_logging(level: &str, log_dir: Option<&Path>) -> Result<(), AppError> {
    let level = normalize_level(level)?;
    let log_dir = log_dir.map(Path::to_path_buf);

    let state = LOGGING_STATE.get_or_try_init(|| start_backend(level, log_dir.clone()))?;

    if state.level != level || state.log_dir != log_dir {
        return Err(AppError::invalid_input(format!(
            "logging already initialized with level `{}`; refusing to reconfigure",
            state.level
        )));
    }

    Ok(())
}

fn start_backend(
    level: &'static str,
    log_dir: Option<PathBuf>,
) -> Result<LoggingState, AppError> {
    let logger = Logger::try_with_str(level)
        .map_err(|err| AppError::invalid_input(format!("invalid log level `{level}`: {err}")))?;

    let logger = match log_dir.as_deref() {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|err| {
                AppError::invalid_data(format!(
                    "failed to create log directory `{}`: {err}",
                    dir.display()
                ))
            })?;
            logger
                .log_to_file(
                    FileSpec::default()
                        .directory(dir)
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
        }
        None => logger.log_to_stderr().format(flexi_logger::default_format),
    };

    let handle = logger
        .start()
        .map_err(|err| AppError::invalid_data(format!("failed to start logger: {err}")))?;

    info!(
        "event=logging_init module=logging status=ok level={} target={}",
        level,
        log_dir
            .as_deref()
            .map(|dir| dir.display().to_string())
            .unwrap_or_else(|| "stderr".to_string())
    );

    Ok(LoggingState {
        level,
        log_dir,
        _logger: handle,
    })
}

pub fn default_log_level() -> &'static str {
    "warn"
}

pub fn normalize_level(level: &str) -> Result<&'static str, AppError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        "off" => Ok("off"),
        other => Err(AppError::invalid_input(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error|off"
        ))),
    }
}
