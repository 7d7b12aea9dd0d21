use directories::ProjectDirs;
use std::path::PathBuf;

pub const LOG_FILE_NAME: &str = "diktat.log";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Directory for runtime state such as the log file.
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(PathBuf::from(home).join(".local").join("state").join("diktat"))
        } else {
            ProjectDirs::from("", "", "diktat").map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }

    pub fn log_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join(LOG_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_path_ends_with_file_name() {
        if let Some(path) = AppDirs::log_path() {
            assert!(path.ends_with(LOG_FILE_NAME));
            assert!(path.parent().unwrap().ends_with("diktat"));
        }
    }
}
