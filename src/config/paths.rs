use std::path::{Path, PathBuf};

pub const DEFAULT_STATE_DIR: &str = ".kommentar";
pub const DEFAULT_SETTINGS_FILE_NAME: &str = "kommentar.yaml";
pub const DEFAULT_LOG_FILE_NAME: &str = "pipeline.log";

/// `kommentar.yaml` in the working directory, when present.
pub fn default_settings_path(cwd: &Path) -> Option<PathBuf> {
    let path = cwd.join(DEFAULT_SETTINGS_FILE_NAME);
    path.is_file().then_some(path)
}

pub fn default_log_path() -> PathBuf {
    PathBuf::from(DEFAULT_STATE_DIR)
        .join("logs")
        .join(DEFAULT_LOG_FILE_NAME)
}
