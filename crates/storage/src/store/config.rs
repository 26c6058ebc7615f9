#![forbid(unsafe_code)]

use super::StoreError;
use serde::Deserialize;

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_ELIGIBLE_LOOKAHEAD_MS: i64 = 7 * 24 * 60 * 60 * 1_000;
const DEFAULT_DB_FILE_NAME: &str = "survey_forms.db";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalMode {
    #[default]
    Wal,
    Delete,
}

impl JournalMode {
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    #[default]
    Normal,
    Full,
}

impl SyncMode {
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Full => "full",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    #[serde(default)]
    pub journal_mode: JournalMode,
    #[serde(default)]
    pub sync_mode: SyncMode,
    /// How long before `start_ms` a form already shows up in eligible listings.
    #[serde(default = "default_eligible_lookahead_ms")]
    pub eligible_lookahead_ms: i64,
    #[serde(default = "default_db_file_name")]
    pub db_file_name: String,
}

const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

const fn default_eligible_lookahead_ms() -> i64 {
    DEFAULT_ELIGIBLE_LOOKAHEAD_MS
}

fn default_db_file_name() -> String {
    DEFAULT_DB_FILE_NAME.to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: JournalMode::default(),
            sync_mode: SyncMode::default(),
            eligible_lookahead_ms: DEFAULT_ELIGIBLE_LOOKAHEAD_MS,
            db_file_name: default_db_file_name(),
        }
    }
}

impl StoreConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, StoreError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|err| StoreError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if self.busy_timeout_ms == 0 {
            return Err(StoreError::Config(
                "busy_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.eligible_lookahead_ms < 0 {
            return Err(StoreError::Config(
                "eligible_lookahead_ms must not be negative".to_string(),
            ));
        }
        let name = self.db_file_name.trim();
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(StoreError::Config(
                "db_file_name must be a plain file name".to_string(),
            ));
        }
        Ok(())
    }
}
