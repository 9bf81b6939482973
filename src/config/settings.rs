use super::paths::default_log_path;
use super::ConfigError;
use crate::classifier::{
    ClassifierConfig, DEFAULT_CLASSIFY_ATTEMPTS, DEFAULT_HOME_LABEL, DEFAULT_NEUTRAL_LABEL,
    DEFAULT_TRANSPORT_FAILURE_LIMIT,
};
use crate::corpus::WalkerConfig;
use crate::oracle::client::DEFAULT_CHAT_COMPLETIONS_URL;
use crate::oracle::OracleEndpoint;
use crate::segmenter::{SegmenterConfig, DEFAULT_SEGMENT_ATTEMPTS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub oracle: OracleSettings,
    #[serde(default)]
    pub labels: LabelSettings,
    /// Plain-text list of known personnel names for the classifier prompt.
    #[serde(default)]
    pub roster_path: Option<PathBuf>,
    #[serde(default)]
    pub segmentation: SegmentationSettings,
    #[serde(default)]
    pub classification: ClassificationSettings,
    #[serde(default)]
    pub paths: PathSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OracleSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            connect_timeout_ms: default_connect_timeout_ms(),
            read_timeout_ms: default_read_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LabelSettings {
    #[serde(default = "default_home_label")]
    pub home: String,
    #[serde(default = "default_neutral_label")]
    pub neutral: String,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            home: default_home_label(),
            neutral: default_neutral_label(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SegmentationSettings {
    #[serde(default = "default_segment_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

impl Default for SegmentationSettings {
    fn default() -> Self {
        Self {
            max_attempts: default_segment_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassificationSettings {
    /// `0` re-sends a rejected batch indefinitely.
    #[serde(default = "default_classify_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_backoff_base_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_transport_failure_limit")]
    pub max_consecutive_transport_failures: u32,
    #[serde(default = "default_transport_backoff_ms")]
    pub transport_backoff_base_ms: u64,
}

impl Default for ClassificationSettings {
    fn default() -> Self {
        Self {
            max_attempts: default_classify_attempts(),
            retry_delay_ms: default_backoff_base_ms(),
            max_consecutive_transport_failures: default_transport_failure_limit(),
            transport_backoff_base_ms: default_transport_backoff_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathSettings {
    /// Spreadsheet rows exported as a JSON array of records.
    #[serde(default = "default_rows_path")]
    pub rows: PathBuf,
    #[serde(default = "default_segmented_dir")]
    pub segmented_dir: PathBuf,
    #[serde(default = "default_labeled_dir")]
    pub labeled_dir: PathBuf,
    #[serde(default = "default_log_path")]
    pub log_file: PathBuf,
    /// Only documents whose file name starts with this are classified.
    #[serde(default)]
    pub input_prefix: Option<String>,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            rows: default_rows_path(),
            segmented_dir: default_segmented_dir(),
            labeled_dir: default_labeled_dir(),
            log_file: default_log_path(),
            input_prefix: None,
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_CHAT_COMPLETIONS_URL.to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

fn default_read_timeout_ms() -> u64 {
    180_000
}

fn default_home_label() -> String {
    DEFAULT_HOME_LABEL.to_string()
}

fn default_neutral_label() -> String {
    DEFAULT_NEUTRAL_LABEL.to_string()
}

fn default_segment_attempts() -> u32 {
    DEFAULT_SEGMENT_ATTEMPTS
}

fn default_classify_attempts() -> u32 {
    DEFAULT_CLASSIFY_ATTEMPTS
}

fn default_backoff_base_ms() -> u64 {
    2_000
}

fn default_transport_failure_limit() -> u32 {
    DEFAULT_TRANSPORT_FAILURE_LIMIT
}

fn default_transport_backoff_ms() -> u64 {
    1_000
}

fn default_rows_path() -> PathBuf {
    PathBuf::from("data/spiele.json")
}

fn default_segmented_dir() -> PathBuf {
    PathBuf::from("einzelne_spiele")
}

fn default_labeled_dir() -> PathBuf {
    PathBuf::from("mit_zuordnung")
}

impl Settings {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = self.oracle.endpoint.trim();
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(ConfigError::Settings(
                "`oracle.endpoint` must be an http(s) url".to_string(),
            ));
        }
        if self.oracle.model.trim().is_empty() {
            return Err(ConfigError::Settings(
                "`oracle.model` must be non-empty".to_string(),
            ));
        }
        if self.oracle.api_key_env.trim().is_empty() {
            return Err(ConfigError::Settings(
                "`oracle.api_key_env` must be non-empty".to_string(),
            ));
        }
        if self.oracle.connect_timeout_ms == 0 || self.oracle.read_timeout_ms == 0 {
            return Err(ConfigError::Settings(
                "oracle timeouts must be > 0".to_string(),
            ));
        }

        let home = self.labels.home.trim();
        let neutral = self.labels.neutral.trim();
        if home.is_empty() || neutral.is_empty() {
            return Err(ConfigError::Settings(
                "`labels.home` and `labels.neutral` must be non-empty".to_string(),
            ));
        }
        if home == neutral {
            return Err(ConfigError::Settings(
                "`labels.home` and `labels.neutral` must differ".to_string(),
            ));
        }

        if self.segmentation.max_attempts == 0 {
            return Err(ConfigError::Settings(
                "`segmentation.max_attempts` must be > 0".to_string(),
            ));
        }
        if self.classification.max_consecutive_transport_failures == 0 {
            return Err(ConfigError::Settings(
                "`classification.max_consecutive_transport_failures` must be > 0".to_string(),
            ));
        }

        if self.paths.segmented_dir == self.paths.labeled_dir {
            return Err(ConfigError::Settings(
                "`paths.segmented_dir` and `paths.labeled_dir` must differ".to_string(),
            ));
        }

        Ok(())
    }

    pub fn oracle_endpoint(&self, api_key: String) -> OracleEndpoint {
        OracleEndpoint {
            url: self.oracle.endpoint.trim().to_string(),
            api_key,
            connect_timeout: Duration::from_millis(self.oracle.connect_timeout_ms),
            read_timeout: Duration::from_millis(self.oracle.read_timeout_ms),
        }
    }

    pub fn segmenter_config(&self) -> SegmenterConfig {
        SegmenterConfig {
            model: self.oracle.model.clone(),
            max_attempts: self.segmentation.max_attempts,
            backoff_base: Duration::from_millis(self.segmentation.backoff_base_ms),
        }
    }

    pub fn classifier_config(&self, roster: String) -> ClassifierConfig {
        let classification = &self.classification;
        ClassifierConfig {
            model: self.oracle.model.clone(),
            home_label: self.labels.home.trim().to_string(),
            neutral_label: self.labels.neutral.trim().to_string(),
            roster,
            max_attempts: (classification.max_attempts > 0).then_some(classification.max_attempts),
            retry_delay: Duration::from_millis(classification.retry_delay_ms),
            max_consecutive_transport_failures: classification.max_consecutive_transport_failures,
            transport_backoff_base: Duration::from_millis(
                classification.transport_backoff_base_ms,
            ),
        }
    }

    pub fn segmentation_walker(&self) -> WalkerConfig {
        WalkerConfig {
            output_dir: self.paths.segmented_dir.clone(),
            segmented_dir: None,
        }
    }

    pub fn classification_walker(&self) -> WalkerConfig {
        WalkerConfig {
            output_dir: self.paths.labeled_dir.clone(),
            segmented_dir: Some(self.paths.segmented_dir.clone()),
        }
    }
}
