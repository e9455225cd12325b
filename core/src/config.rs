//! Loading and saving [`ParserSettings`] as TOML.
//!
//! Settings live in `<config dir>/alv/settings.toml`. A missing file is not
//! an error: parsing falls back to the defaults.

use std::fs;
use std::path::{Path, PathBuf};

use alv_types::ParserSettings;
use thiserror::Error;

const APP_DIR: &str = "alv";
const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("serialize error for {path:?}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: toml::ser::Error,
    },
}

/// Default settings file under the platform config directory.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_DIR).join(SETTINGS_FILE))
}

/// Read settings from `path`, or the defaults if the file does not exist.
pub fn load_settings(path: &Path) -> Result<ParserSettings, SettingsError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No settings file, using defaults");
        return Ok(ParserSettings::default());
    }

    let contents = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&contents).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write settings to `path`, creating its parent directory if needed.
pub fn save_settings(path: &Path, settings: &ParserSettings) -> Result<(), SettingsError> {
    let contents = toml::to_string_pretty(settings).map_err(|source| SettingsError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;

    let io_error = |source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(path, contents).map_err(io_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = load_settings(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings, ParserSettings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE);
        let settings = ParserSettings {
            debug: true,
            include_notes: true,
            ..ParserSettings::default()
        };

        save_settings(&path, &settings).unwrap();
        assert_eq!(load_settings(&path).unwrap(), settings);
    }

    #[test]
    fn test_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "debug = \"sometimes\"").unwrap();

        let err = load_settings(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }

    #[test]
    fn test_default_path_ends_with_app_dir() {
        if let Some(path) = default_settings_path() {
            assert!(path.ends_with("alv/settings.toml"));
        }
    }
}
