use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Serving configuration, loaded once at startup. Every field has a default
/// so the server runs with no config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub data: DataSettings,
    pub signals: SignalSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            data: DataSettings::default(),
            signals: SignalSettings::default(),
        }
    }
}

impl Settings {
    /// Loads settings from a TOML file. A missing file falls back to
    /// defaults; a present but unreadable or invalid file is an error.
    /// Partial files are fine, absent keys keep their defaults.
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            info!("Config file {} not found, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path))?;
        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path))?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.server.port == 0 {
            errors.push("server.port must be > 0".to_string());
        }
        if self.data.data_dir.trim().is_empty() {
            errors.push("data.data_dir must not be empty".to_string());
        }
        if self.data.models_dir.trim().is_empty() {
            errors.push("data.models_dir must not be empty".to_string());
        }
        if !self.signals.threshold.is_finite() || self.signals.threshold <= 0.0 {
            errors.push("signals.threshold must be a positive number".to_string());
        }
        if !self.signals.price_level_cutoff.is_finite() || self.signals.price_level_cutoff <= 0.0 {
            errors.push("signals.price_level_cutoff must be a positive number".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Directory holding one CSV of daily bars per instrument.
    pub data_dir: String,
    /// Directory holding one JSON weight file per instrument.
    pub models_dir: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            models_dir: "models".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalSettings {
    /// Minimum predicted return magnitude before a BUY or SELL fires.
    /// Returns at exactly this magnitude stay NO TRADE.
    pub threshold: f64,
    /// Model outputs above this magnitude are read as absolute price levels
    /// and converted to returns against the latest close.
    pub price_level_cutoff: f64,
}

impl Default for SignalSettings {
    fn default() -> Self {
        Self {
            threshold: 0.004,
            price_level_cutoff: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.data.data_dir, "data");
        assert_eq!(settings.data.models_dir, "models");
        assert_eq!(settings.signals.threshold, 0.004);
        assert_eq!(settings.signals.price_level_cutoff, 2.0);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let toml = r#"
            [server]
            port = 9000
        "#;
        let settings: Settings = toml::from_str(toml).unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.signals.threshold, 0.004);
    }

    #[test]
    fn test_full_file_parses() {
        let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 8080

            [data]
            data_dir = "fixtures/data"
            models_dir = "fixtures/models"

            [signals]
            threshold = 0.01
            price_level_cutoff = 3.0
        "#;
        let settings: Settings = toml::from_str(toml).unwrap();
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.data.models_dir, "fixtures/models");
        assert_eq!(settings.signals.threshold, 0.01);
        assert_eq!(settings.signals.price_level_cutoff, 3.0);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_collects_errors() {
        let mut settings = Settings::default();
        settings.server.port = 0;
        settings.data.data_dir = String::new();
        settings.signals.threshold = 0.0;
        settings.signals.price_level_cutoff = f64::NAN;

        let errors = settings.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().any(|e| e.contains("server.port")));
        assert!(errors.iter().any(|e| e.contains("threshold")));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let settings = Settings::load("/nonexistent/config.toml").unwrap();
        assert_eq!(settings.server.port, 8000);
    }
}
