use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::app_dirs::{AppDirs, LOG_FILE_NAME};

/// Environment variable holding the log filter, e.g. `DIKTAT_LOG=debug`.
pub const LOG_ENV: &str = "DIKTAT_LOG";
pub const DEFAULT_LEVEL: &str = "info";

/// Build the filter from an explicit level, else the environment, else `info`.
pub fn filter(level: Option<&str>) -> EnvFilter {
    match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL)),
    }
}

/// Install the global subscriber writing to the state-dir log file. The TUI
/// owns the terminal, so nothing is logged to stdout or stderr.
///
/// Returns the path actually written to.
pub fn init(level: Option<&str>) -> io::Result<PathBuf> {
    let (file, path) = open_log_file()?;

    tracing_subscriber::fmt()
        .with_env_filter(filter(level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|err| io::Error::new(io::ErrorKind::AlreadyExists, err.to_string()))?;

    Ok(path)
}

fn open_log_file() -> io::Result<(File, PathBuf)> {
    if let Some(path) = AppDirs::log_path() {
        // unwritable state dir falls through to the working directory
        if let Ok(file) = open_append(&path) {
            return Ok((file, path));
        }
    }
    let path = PathBuf::from(LOG_FILE_NAME);
    open_append(&path).map(|file| (file, path))
}

fn open_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}
