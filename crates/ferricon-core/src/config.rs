//! Loading of user-level driver defaults.

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::canvas::DEFAULT_SIZE;
use crate::encode::OutputFormat;

/// The config file name, relative to the tool's user config directory.
const CONFIG_FILE: &str = "config.toml";

/// Driver defaults, usually loaded from `<config-dir>/ferricon/config.toml`.
///
/// Driver arguments override these values, these values override the
/// built-in defaults. Missing keys fall back individually.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The default output width in pixels.
    pub width: u32,

    /// The default output height in pixels.
    pub height: u32,

    /// The default output format.
    pub format: OutputFormat,

    /// Whether PNG output is optimized by default.
    pub optimize: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: DEFAULT_SIZE.width,
            height: DEFAULT_SIZE.height,
            format: OutputFormat::default(),
            optimize: false,
        }
    }
}

impl Config {
    /// The path of the user config file, if a config directory is known for
    /// this platform.
    pub fn user_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(crate::TOOL_NAME).join(CONFIG_FILE))
    }

    /// Loads the user config, falling back to defaults when there is none.
    pub fn load_user() -> Result<Self, ConfigError> {
        match Self::user_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Loads a config file, falling back to defaults when it doesn't exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(err) => return Err(ConfigError::Io(err)),
        };

        Ok(toml::from_str(&content)?)
    }
}

/// Returned when a config file exists but cannot be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("the config file could not be read")]
    Io(#[from] io::Error),

    /// The config file is not valid for the expected schema.
    #[error("the config file is malformed")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use temp_dir::TempDir;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.width, 48);
        assert_eq!(config.height, 48);
        assert_eq!(config.format, OutputFormat::Png);
        assert!(!config.optimize);
    }

    #[test]
    fn test_missing_file_is_defaults() {
        let dir = TempDir::new().unwrap();

        let config = Config::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_falls_back_per_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "format = \"ico\"\nwidth = 64\n").unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(config.format, OutputFormat::Ico);
        assert_eq!(config.width, 64);
        assert_eq!(config.height, 48);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "format = \"bmp\"\n").unwrap();

        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
    }
}
