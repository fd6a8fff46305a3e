// Settings module
// Engine configuration loaded from a TOML file

use std::path::Path;
use std::time::Duration as StdDuration;

use anyhow::{Context, Result};
use chrono::Duration;
use serde::Deserialize;

use crate::models::locale::Locale;

/// Tunable engine parameters. Every field has a default so a partial (or
/// absent) config file still yields a working engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Absolute URL of the notifications feed.
    pub feed_url: String,
    /// Fast loop period: countdown recompute + re-render.
    pub tick_interval_ms: u64,
    /// Slow loop period: schedule feed re-fetch.
    pub refresh_interval_secs: u64,
    /// Upper bound on a single fetch so a hung request cannot stall the loop.
    pub fetch_timeout_secs: u64,
    /// Initial display language.
    pub language: Locale,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            feed_url: String::new(),
            tick_interval_ms: 1_000,
            refresh_interval_secs: 600,
            fetch_timeout_secs: 10,
            language: Locale::Ar,
        }
    }
}

impl EngineSettings {
    /// Load settings from a TOML file. A missing file is not an error; it
    /// yields the defaults (the feed URL must then come from elsewhere).
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.feed_url.trim().is_empty() {
            return Err("feed_url must be set".to_string());
        }
        if !(self.feed_url.starts_with("http://") || self.feed_url.starts_with("https://")) {
            return Err("feed_url must use http or https".to_string());
        }
        if self.tick_interval_ms == 0 {
            return Err("tick_interval_ms must be positive".to_string());
        }
        if self.refresh_interval_secs < 60 {
            return Err("refresh_interval_secs must be at least 60".to_string());
        }
        if self.fetch_timeout_secs == 0 {
            return Err("fetch_timeout_secs must be positive".to_string());
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> StdDuration {
        StdDuration::from_millis(self.tick_interval_ms)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::seconds(self.refresh_interval_secs as i64)
    }

    pub fn fetch_timeout(&self) -> StdDuration {
        StdDuration::from_secs(self.fetch_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn defaults_match_documented_periods() {
        let settings = EngineSettings::default();
        assert_eq!(settings.tick_interval_ms, 1_000);
        assert_eq!(settings.refresh_interval_secs, 600);
        assert_eq!(settings.fetch_timeout_secs, 10);
        assert_eq!(settings.language, Locale::Ar);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let parsed: EngineSettings = toml::from_str(
            r#"
            feed_url = "https://farm.example/notifications.json"
            refresh_interval_secs = 300
            "#,
        )
        .unwrap();

        assert_eq!(parsed.feed_url, "https://farm.example/notifications.json");
        assert_eq!(parsed.refresh_interval_secs, 300);
        assert_eq!(parsed.tick_interval_ms, 1_000);
    }

    #[test]
    fn load_from_file_and_missing_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "feed_url = \"https://farm.example/notifications.json\"\nlanguage = \"bn\"\n"
        )
        .unwrap();

        let loaded = EngineSettings::load(file.path()).unwrap();
        assert_eq!(loaded.language, Locale::Bn);
        assert!(loaded.validate().is_ok());

        let missing = EngineSettings::load(Path::new("/nonexistent/farm-countdown.toml")).unwrap();
        assert_eq!(missing, EngineSettings::default());
    }

    #[test]
    fn validation_catches_bad_values() {
        let mut settings = EngineSettings::default();
        assert!(settings.validate().is_err()); // no feed URL

        settings.feed_url = "ftp://farm.example/feed".into();
        assert!(settings.validate().is_err());

        settings.feed_url = "https://farm.example/notifications.json".into();
        assert!(settings.validate().is_ok());

        settings.refresh_interval_secs = 5;
        assert!(settings.validate().is_err());
    }
}
