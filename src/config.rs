use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_FILE: &str = "config.yaml";

/// Defaults loaded from a config file. Anything left out falls back to built in values.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// How fast colors cycle along the text.
    #[serde(default)]
    pub frequency: Option<f64>,

    /// How many characters a color stretches over.
    #[serde(default)]
    pub spread: Option<f64>,

    /// The exclusive upper bound of the random phase step per character.
    #[serde(default)]
    pub noise: Option<i64>,

    /// The delay between animation frames, in milliseconds.
    #[serde(default)]
    pub delay_ms: Option<u64>,
}

impl Config {
    /// Load the config file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io(path.into(), e))?;
        Self::parse(&contents).map_err(|e| ConfigError::Parse(path.into(), e))
    }

    /// Load the config from `path` if given, otherwise from the default location if it exists.
    pub fn discover(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            debug!("loading config from {}", path.display());
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => {
                debug!("loading config from {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Where the config file lives when no path is given.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "wavecat").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    fn parse(contents: &str) -> Result<Self, serde_yaml::Error> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents)
    }
}

/// An error when loading the config file.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("reading config file {0}: {1}")]
    Io(PathBuf, io::Error),

    #[error("parsing config file {0}: {1}")]
    Parse(PathBuf, serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write");
        file
    }

    #[test]
    fn full_config() {
        let file = write_config("frequency: 0.5\nspread: 3.0\nnoise: 12\ndelay_ms: 250\n");
        let config = Config::load(file.path()).expect("load failed");
        let expected = Config { frequency: Some(0.5), spread: Some(3.0), noise: Some(12), delay_ms: Some(250) };
        assert_eq!(config, expected);
    }

    #[test]
    fn partial_config() {
        let file = write_config("spread: 2.5\n");
        let config = Config::load(file.path()).expect("load failed");
        assert_eq!(config, Config { spread: Some(2.5), ..Default::default() });
    }

    #[test]
    fn empty_config() {
        let file = write_config("");
        assert_eq!(Config::load(file.path()).expect("load failed"), Config::default());
    }

    #[test]
    fn unknown_field() {
        let file = write_config("colour: red\n");
        assert!(matches!(Config::load(file.path()), Err(ConfigError::Parse(..))));
    }

    #[test]
    fn explicit_missing_file() {
        let result = Config::discover(Some(Path::new("/no/such/wavecat/config.yaml")));
        assert!(matches!(result, Err(ConfigError::Io(..))));
    }

    #[test]
    fn explicit_file() {
        let file = write_config("noise: 3\n");
        let config = Config::discover(Some(file.path())).expect("discover failed");
        assert_eq!(config.noise, Some(3));
    }
}
