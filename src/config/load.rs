use super::paths::default_settings_path;
use super::{ConfigError, Settings};
use std::fs;
use std::path::Path;

/// Reads `explicit` if given, else `kommentar.yaml` in `cwd`, else defaults.
/// The result is always validated.
pub fn load_settings(explicit: Option<&Path>, cwd: &Path) -> Result<Settings, ConfigError> {
    let settings = match explicit
        .map(Path::to_path_buf)
        .or_else(|| default_settings_path(cwd))
    {
        Some(path) => Settings::from_path(&path)?,
        None => Settings::default(),
    };
    settings.validate()?;
    Ok(settings)
}

/// Reads the api key from the configured environment variable. A `.env` file
/// in the working directory is loaded first if present; variables already
/// set in the environment win.
pub fn resolve_api_key(settings: &Settings) -> Result<String, ConfigError> {
    let _ = dotenvy::dotenv();
    let name = settings.oracle.api_key_env.trim();
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ConfigError::MissingApiKey(name.to_string()))
}

/// The roster text, or empty when no roster is configured.
pub fn load_roster(settings: &Settings) -> Result<String, ConfigError> {
    let Some(path) = &settings.roster_path else {
        return Ok(String::new());
    };
    fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })
}
