//! Application configuration
//!
//! Where things live on disk and how the app names itself. User settings
//! (delay, import link) are stored in the database instead.

use std::path::PathBuf;

pub const DEFAULT_DB_FILE: &str = "memory_trigger.db";
pub const DEFAULT_APP_NAME: &str = "MemoryTrigger";
pub const DEFAULT_TTS_LANGUAGE: &str = "en";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub db_file_name: String,
    pub log_dir: PathBuf,
    pub app_name: String,
    /// Language code for pronunciation
    pub tts_language: String,
}

impl AppConfig {
    /// Defaults rooted at the host's app data directory
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            log_dir: data_dir.join("logs"),
            data_dir,
            db_file_name: DEFAULT_DB_FILE.to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
            tts_language: DEFAULT_TTS_LANGUAGE.to_string(),
        }
    }

    pub fn with_db_file_name(mut self, name: impl Into<String>) -> Self {
        self.db_file_name = name.into();
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }

    pub fn with_tts_language(mut self, language: impl Into<String>) -> Self {
        self.tts_language = language.into();
        self
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::new("/data/app");
        assert_eq!(config.db_path(), PathBuf::from("/data/app/memory_trigger.db"));
        assert_eq!(config.log_dir, PathBuf::from("/data/app/logs"));
        assert_eq!(config.tts_language, "en");
    }

    #[test]
    fn test_builder_overrides() {
        let config = AppConfig::new("/data/app")
            .with_db_file_name("words.db")
            .with_log_dir("/var/log/mt")
            .with_tts_language("de");
        assert_eq!(config.db_path(), PathBuf::from("/data/app/words.db"));
        assert_eq!(config.log_dir, PathBuf::from("/var/log/mt"));
        assert_eq!(config.tts_language, "de");
    }
}
