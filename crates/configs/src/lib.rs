//! # configs
//!
//! Settings for every process, assembled once at startup from an optional
//! config file (`CONFIG_FILE`, default `config.json`) overlaid by environment
//! variables. Nested keys use a double underscore in the environment, e.g.
//! `PASSWORD_VALIDATOR__REQUIRED_LENGTH=12`.
//!
//! Each binary pulls the keys it needs through [`require`], so a missing key
//! is reported by name before anything is served.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use domains::password::PasswordPolicy;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_FILE_VAR: &str = "CONFIG_FILE";
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Load(#[from] config::ConfigError),

    #[error("missing required setting '{0}'")]
    Missing(&'static str),

    #[error("failed to read key file '{path}': {source}")]
    KeyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TokenSettings {
    pub expiry_minutes: i64,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self { expiry_minutes: 60 }
    }
}

/// Argon2 cost parameters; `None` keeps the library default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HasherSettings {
    pub memory_kib: Option<u32>,
    pub iterations: Option<u32>,
    pub parallelism: Option<u32>,
    pub output_len: Option<usize>,
    pub pepper: Option<SecretString>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub port: u16,
    pub cors_origin: String,
    pub log_format: LogFormat,

    pub connection_string: Option<SecretString>,

    pub users_api_url: Option<String>,
    pub posts_api_url: Option<String>,
    pub media_api_url: Option<String>,
    pub auth_api_url: Option<String>,

    pub token_private_key: Option<PathBuf>,
    pub token_private_key_data: Option<SecretString>,
    pub token_public_key: Option<PathBuf>,
    pub token_public_key_data: Option<String>,
    pub token: TokenSettings,

    pub password_validator: PasswordPolicy,
    pub password_hasher: HasherSettings,

    pub media_bucket: Option<String>,
    pub media_root: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: 8080,
            cors_origin: "http://localhost:3000".into(),
            log_format: LogFormat::default(),
            connection_string: None,
            users_api_url: None,
            posts_api_url: None,
            media_api_url: None,
            auth_api_url: None,
            token_private_key: None,
            token_private_key_data: None,
            token_public_key: None,
            token_public_key_data: None,
            token: TokenSettings::default(),
            password_validator: PasswordPolicy::default(),
            password_hasher: HasherSettings::default(),
            media_bucket: None,
            media_root: PathBuf::from("./data/media"),
        }
    }
}

impl Settings {
    /// Loads `.env`, the config file and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }

        let file = std::env::var(CONFIG_FILE_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.into());
        Self::build(Path::new(&file), environment())
    }

    /// Loads the given file overlaid by an explicit set of variables.
    pub fn from_parts(file: &Path, vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::build(file, environment().source(Some(vars)))
    }

    fn build(file: &Path, env: Environment) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(file).required(false))
            .add_source(env)
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }

    pub fn connection_string(&self) -> Result<&str, ConfigError> {
        require(&self.connection_string, "CONNECTION_STRING").map(|s| s.expose_secret())
    }

    /// PEM bytes of the signing key, from a file path or inline data.
    pub fn token_private_key_pem(&self) -> Result<Vec<u8>, ConfigError> {
        if let Some(path) = &self.token_private_key {
            return read_key(path);
        }

        require(&self.token_private_key_data, "TOKEN_PRIVATE_KEY")
            .map(|data| data.expose_secret().as_bytes().to_vec())
    }

    /// PEM bytes of the verification key, from a file path or inline data.
    pub fn token_public_key_pem(&self) -> Result<Vec<u8>, ConfigError> {
        if let Some(path) = &self.token_public_key {
            return read_key(path);
        }

        require(&self.token_public_key_data, "TOKEN_PUBLIC_KEY").map(|data| data.as_bytes().to_vec())
    }
}

fn environment() -> Environment {
    Environment::default().separator("__").try_parsing(true)
}

fn read_key(path: &Path) -> Result<Vec<u8>, ConfigError> {
    std::fs::read(path).map_err(|source| ConfigError::KeyFile { path: path.to_owned(), source })
}

/// Borrows an optional setting or reports it missing under `key`.
pub fn require<'a, T>(value: &'a Option<T>, key: &'static str) -> Result<&'a T, ConfigError> {
    value.as_ref().ok_or(ConfigError::Missing(key))
}
