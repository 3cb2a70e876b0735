use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LiftError, Result};
use crate::formats::StatementFormat;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_format")]
    pub default_format: String,
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,
    #[serde(default)]
    pub formats: Vec<StatementFormat>,
}

fn default_format() -> String {
    "wells_fargo".to_string()
}

fn default_output_suffix() -> String {
    "_transactions".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_format: default_format(),
            output_suffix: default_output_suffix(),
            formats: Vec::new(),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("ledgerlift")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

/// Load settings, falling back to defaults when the file is missing or bad.
pub fn load_settings_from(path: &Path) -> Settings {
    if !path.exists() {
        return Settings::default();
    }
    let content = std::fs::read_to_string(path).unwrap_or_default();
    match serde_json::from_str(&content) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable settings");
            Settings::default()
        }
    }
}

pub fn save_settings_to(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| LiftError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::builtin_formats;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep").join("settings.json");
        let mut custom = builtin_formats().unwrap().remove(0);
        custom.key = "my_bank".into();
        let settings = Settings {
            default_format: "my_bank".into(),
            output_suffix: "_txns".into(),
            formats: vec![custom],
        };
        save_settings_to(&settings, &path).unwrap();
        let loaded = load_settings_from(&path);
        assert_eq!(loaded.default_format, "my_bank");
        assert_eq!(loaded.output_suffix, "_txns");
        assert_eq!(loaded.formats[0].key, "my_bank");
        assert_eq!(loaded.formats[0].columns.len(), 6);
    }

    #[test]
    fn test_load_returns_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let s = load_settings_from(&dir.path().join("absent.json"));
        assert_eq!(s.default_format, "wells_fargo");
        assert_eq!(s.output_suffix, "_transactions");
        assert!(s.formats.is_empty());
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let s: Settings = serde_json::from_str(r#"{"output_suffix": "_out"}"#).unwrap();
        assert_eq!(s.default_format, "wells_fargo");
        assert_eq!(s.output_suffix, "_out");
    }

    #[test]
    fn test_load_ignores_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_settings_from(&path).default_format, "wells_fargo");
    }
}
