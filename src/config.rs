pub mod error;
pub mod load;
pub mod paths;
pub mod settings;

pub use error::ConfigError;
pub use load::{load_roster, load_settings, resolve_api_key};
pub use paths::{DEFAULT_SETTINGS_FILE_NAME, DEFAULT_STATE_DIR};
pub use settings::{
    ClassificationSettings, LabelSettings, OracleSettings, PathSettings, SegmentationSettings,
    Settings,
};
