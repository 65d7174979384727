use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "typetrial";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Directory for state that should survive restarts (history, logs).
    pub fn state_dir() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join(APP_NAME)
        } else if let Some(proj_dirs) = ProjectDirs::from("", "", APP_NAME) {
            proj_dirs.data_local_dir().to_path_buf()
        } else {
            PathBuf::from(".")
        }
    }

    pub fn history_path() -> PathBuf {
        Self::state_dir().join("history.json")
    }

    pub fn log_path() -> PathBuf {
        Self::state_dir().join(format!("{APP_NAME}.log"))
    }

    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", APP_NAME)
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from(format!("{APP_NAME}_config.json")))
    }
}
