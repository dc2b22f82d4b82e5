//! Popup configuration: debounce windows and the badge color.
//!
//! The config file is optional — a missing or empty file yields
//! `PopupConfig::default()`. Unknown keys are accepted by serde, though we
//! log a warning when the file contains potential typos.
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),
}

// ============================================================================
// Configuration
// ============================================================================

/// Tunable timing and badge settings.
///
/// All fields use `#[serde(default)]` so any subset of keys can be
/// specified. Missing keys fall back to the shipped defaults.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PopupConfig {
    /// Debounce window for read-later persistence, in milliseconds.
    pub tab_write_debounce_ms: u64,

    /// Debounce window for the query filter, in milliseconds.
    pub filter_debounce_ms: u64,

    /// Badge background color pushed after each successful tab write.
    pub badge_background: String,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            tab_write_debounce_ms: 200,
            filter_debounce_ms: 800,
            badge_background: "#22c55e".to_string(),
        }
    }
}

impl PopupConfig {
    pub fn tab_write_debounce(&self) -> Duration {
        Duration::from_millis(self.tab_write_debounce_ms)
    }

    pub fn filter_debounce(&self) -> Duration {
        Duration::from_millis(self.filter_debounce_ms)
    }

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(PopupConfig::default())`
    /// - Empty file → `Ok(PopupConfig::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as a warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        // Parse as a raw table first to flag likely typos.
        if let Ok(raw) = content.parse::<toml::Table>() {
            let known_keys = [
                "tab_write_debounce_ms",
                "filter_debounce_ms",
                "badge_background",
            ];
            for key in raw.keys() {
                if !known_keys.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: PopupConfig = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            tab_write_debounce_ms = config.tab_write_debounce_ms,
            filter_debounce_ms = config.filter_debounce_ms,
            "Loaded configuration"
        );
        Ok(config)
    }
}

// ============================================================================
// Tests
// ============================================================================
