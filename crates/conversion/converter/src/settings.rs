use std::{fs, io};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;


/// Tunable behavior of a [`Converter`](crate::Converter).
///
/// Every field has a default, so a settings file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterSettings {
    /// How many of the newest versions `list_target_versions` returns when the caller
    /// does not pass a limit. `None` or `Some(0)` lists every version.
    pub version_list_limit: Option<usize>,
    /// Reject requested versions that cannot be parsed, instead of quietly
    /// writing the latest version.
    pub strict_versions:    bool,
}

impl ConverterSettings {
    pub const DEFAULT_VERSION_LIST_LIMIT: usize = 40;

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        serde_json::from_str(json).map_err(SettingsError::Json)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)
            .map_err(|error| SettingsError::Io { path: path.to_owned(), error })?;
        Self::from_json(&json)
    }
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            version_list_limit: Some(Self::DEFAULT_VERSION_LIST_LIMIT),
            strict_versions:    false,
        }
    }
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("error while reading settings from {}: {error}", .path.display())]
    Io {
        path:  PathBuf,
        error: io::Error,
    },
    #[error("error while parsing settings: {0}")]
    Json(serde_json::Error),
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let settings = ConverterSettings::from_json("{}").unwrap();
        assert_eq!(settings, ConverterSettings::default());
        assert_eq!(settings.version_list_limit, Some(40));
        assert!(!settings.strict_versions, "strict handling is opt-in");
    }

    #[test]
    fn fields_override_defaults() {
        let settings = ConverterSettings::from_json(
            r#"{ "version_list_limit": null, "strict_versions": true }"#,
        ).unwrap();
        assert_eq!(settings.version_list_limit, None);
        assert!(settings.strict_versions, "strict_versions was set");
    }

    #[test]
    fn bad_json_is_an_error() {
        let err = ConverterSettings::from_json(r#"{ "strict_versions": "yes" }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)), "{err}");
    }

    #[test]
    fn reads_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "version_list_limit": 5 }"#).unwrap();

        let settings = ConverterSettings::from_json_file(&path).unwrap();
        assert_eq!(settings.version_list_limit, Some(5));

        let missing = ConverterSettings::from_json_file(&dir.path().join("absent.json"));
        assert!(matches!(missing, Err(SettingsError::Io { .. })), "missing file should fail");
    }
}
