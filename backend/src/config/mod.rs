//! Central module for application-wide configuration settings.
//!
//! Settings come from a TOML file whose sections all have defaults, so a
//! missing file or a partial one is fine. A few command-line flags override
//! the file.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid listen address {0}")]
    Address(String),
}

/// Command-line arguments for the `opsportal` binary.
#[derive(Debug, Parser)]
#[command(name = "opsportal", version, about = "Internal operations portal backend")]
pub struct Args {
    /// Path to the TOML config file. A missing file means defaults.
    #[arg(long, short, default_value = "opsportal.toml")]
    pub config: PathBuf,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(long, env = "PORT")]
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub scripts: ScriptSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3001,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub path: PathBuf,
    /// Create the default `admin` and `user` accounts when missing.
    pub seed_defaults: bool,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./database.sqlite"),
            seed_defaults: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub bcrypt_cost: u32,
    pub cookie_secure: bool,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            bcrypt_cost: 10,
            cookie_secure: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScriptSettings {
    pub interpreter: String,
    pub s3_summary: PathBuf,
    pub label_report: PathBuf,
    pub s3_downloader: PathBuf,
    /// Profile handed to the summary and label scripts as `AWS_PROFILE`.
    pub aws_profile: String,
    pub timeout_secs: u64,
    pub max_attempts: u32,
}

impl Default for ScriptSettings {
    fn default() -> Self {
        Self {
            interpreter: "python3".into(),
            s3_summary: PathBuf::from("server/s3_utils.py"),
            label_report: PathBuf::from("server/python_ref_scripts/label_summary/combined_counter2.py"),
            s3_downloader: PathBuf::from("server/s3_downloader_api.py"),
            aws_profile: "default".into(),
            timeout_secs: 120,
            max_attempts: 2,
        }
    }
}

impl ScriptSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    /// `compact` or `json`.
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "compact".into(),
        }
    }
}

impl Config {
    /// Read `path`, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Load the file named by `args` and apply the flag overrides.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let mut config = Self::load(&args.config)?;
        if let Some(host) = &args.host {
            config.server.host = host.clone();
        }
        if let Some(port) = args.port {
            config.server.port = port;
        }
        Ok(config)
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse().map_err(|_| ConfigError::Address(addr))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml("").unwrap();

        assert_eq!(config.server.port, 3001);
        assert_eq!(config.database.path, PathBuf::from("./database.sqlite"));
        assert!(config.database.seed_defaults);
        assert_eq!(config.auth.bcrypt_cost, 10);
        assert_eq!(config.scripts.interpreter, "python3");
        assert_eq!(config.scripts.timeout(), Duration::from_secs(120));
        assert_eq!(config.scripts.max_attempts, 2);
        assert_eq!(config.logging.format, "compact");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_toml(
            r#"
            [server]
            port = 8080

            [scripts]
            aws_profile = "gateway"
            timeout_secs = 30
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.scripts.aws_profile, "gateway");
        assert_eq!(config.scripts.timeout_secs, 30);
        assert_eq!(config.scripts.interpreter, "python3");
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.server.port, 3001);
    }

    #[test]
    fn flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nhost = \"127.0.0.1\"\nport = 9000").unwrap();

        let args = Args {
            config: file.path().to_path_buf(),
            host: None,
            port: Some(4000),
        };
        let config = Config::from_args(&args).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.listen_addr().unwrap(), "127.0.0.1:4000".parse().unwrap());
    }

    #[test]
    fn malformed_file_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = \"not a number\"").unwrap();

        assert!(matches!(Config::load(file.path()), Err(ConfigError::Parse { .. })));
    }
}
