//! Configuration management

use anyhow::{anyhow, Context as _, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::CliError;

pub const ENV_USERNAME: &str = "IONOS_USERNAME";
pub const ENV_PASSWORD: &str = "IONOS_PASSWORD";
pub const ENV_TOKEN: &str = "IONOS_TOKEN";
pub const ENV_API_URL: &str = "IONOS_API_URL";

/// On-disk layout of `config.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(rename = "userdata.name", skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(rename = "userdata.password", skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(rename = "userdata.token", skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(rename = "userdata.api-url", skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

impl ConfigFile {
    /// Read a config file; a missing file is an empty config
    pub fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("no config file at {}", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let file: ConfigFile = serde_json::from_str(&content)
            .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(file)
    }

    /// Write the config file, readable by the owner only
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options
            .open(path)
            .with_context(|| format!("writing config file {}", path.display()))?;
        file.write_all(serde_json::to_string_pretty(self)?.as_bytes())?;
        Ok(())
    }
}

/// How credentials are presented to the API
#[derive(Debug, Clone, PartialEq)]
pub enum Credentials {
    Token(String),
    Basic { username: String, password: String },
}

/// Main configuration structure
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub username: Option<String>,
    pub password: Option<String>,
    pub token: Option<String>,

    /// Overrides every product base URL when set
    pub api_url: Option<String>,

    /// File the values were (or would be) loaded from
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Values supplied on the command line, highest precedence
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub api_url: Option<String>,
}

impl Config {
    /// Load configuration: flags, then environment, then config file
    pub fn load(overrides: &Overrides) -> Result<Self> {
        let path = match &overrides.config_path {
            Some(p) => p.clone(),
            None => Self::default_path()?,
        };
        let file = ConfigFile::read(&path)?;

        Ok(Self::merge(overrides, file, path, |key| env::var(key).ok()))
    }

    fn merge(
        overrides: &Overrides,
        file: ConfigFile,
        path: PathBuf,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        Self {
            username: non_empty(env(ENV_USERNAME)).or(file.username),
            password: non_empty(env(ENV_PASSWORD)).or(file.password),
            token: non_empty(env(ENV_TOKEN)).or(file.token),
            api_url: non_empty(overrides.api_url.clone())
                .or_else(|| non_empty(env(ENV_API_URL)))
                .or(file.api_url),
            path,
        }
    }

    /// Pick the credentials to send; a token wins over username/password
    pub fn credentials(&self) -> Result<Credentials, CliError> {
        if let Some(ref token) = self.token {
            return Ok(Credentials::Token(token.clone()));
        }

        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Ok(Credentials::Basic {
                username: username.clone(),
                password: password.clone(),
            }),
            _ => Err(CliError::NotAuthenticated),
        }
    }

    /// Get config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Cannot determine config directory"))?
            .join("ionosctl");
        Ok(dir)
    }

    /// Default location of `config.json`
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_beats_file() {
        let file = ConfigFile {
            username: Some("file-user".into()),
            password: Some("file-pass".into()),
            ..Default::default()
        };
        let cfg = Config::merge(
            &Overrides::default(),
            file,
            PathBuf::from("x"),
            env_of(&[(ENV_USERNAME, "env-user")]),
        );
        assert_eq!(cfg.username.as_deref(), Some("env-user"));
        assert_eq!(cfg.password.as_deref(), Some("file-pass"));
    }

    #[test]
    fn test_flag_beats_env_for_api_url() {
        let overrides = Overrides {
            api_url: Some("http://flag".into()),
            ..Default::default()
        };
        let cfg = Config::merge(
            &overrides,
            ConfigFile::default(),
            PathBuf::from("x"),
            env_of(&[(ENV_API_URL, "http://env")]),
        );
        assert_eq!(cfg.api_url.as_deref(), Some("http://flag"));
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let file = ConfigFile {
            token: Some("file-token".into()),
            ..Default::default()
        };
        let cfg = Config::merge(
            &Overrides::default(),
            file,
            PathBuf::from("x"),
            env_of(&[(ENV_TOKEN, "  ")]),
        );
        assert_eq!(cfg.token.as_deref(), Some("file-token"));
    }

    #[test]
    fn test_token_wins_over_basic() {
        let cfg = Config {
            username: Some("u".into()),
            password: Some("p".into()),
            token: Some("t".into()),
            ..Default::default()
        };
        assert_eq!(cfg.credentials().unwrap(), Credentials::Token("t".into()));
    }

    #[test]
    fn test_missing_credentials() {
        let cfg = Config {
            username: Some("u".into()),
            ..Default::default()
        };
        assert!(matches!(cfg.credentials(), Err(CliError::NotAuthenticated)));
    }

    #[test]
    fn test_config_file_round_trip_uses_userdata_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let file = ConfigFile {
            token: Some("abc".into()),
            api_url: Some("https://api.example".into()),
            ..Default::default()
        };
        file.write(&path).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"userdata.token\""));
        assert!(!raw.contains("userdata.name"));
        assert_eq!(ConfigFile::read(&path).unwrap(), file);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = ConfigFile::read(&dir.path().join("nope.json")).unwrap();
        assert_eq!(file, ConfigFile::default());
    }
}
