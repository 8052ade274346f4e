//! Configuration for the meterly CLI.
//!
//! Layers defaults, an optional TOML file and the process environment
//! into one [`Config`], then translates it into
//! `meterly_core::PortalConfig`. The CLI applies its flag overrides on top.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use meterly_core::{Credentials, DEFAULT_AMI_URL, DEFAULT_TIMEOUT, DEFAULT_UTILITY_URL, PortalConfig};

/// Unprefixed variables the credentials are read from.
pub const USERNAME_VAR: &str = "UTILITY_USERNAME";
pub const PASSWORD_VAR: &str = "UTILITY_PASSWORD";
pub const ACCOUNT_VAR: &str = "ACCOUNT_NUMBER";

/// Prefix for every other environment override (`METERLY_AMI_URL`, ...).
pub const ENV_PREFIX: &str = "METERLY_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("{var} is not set")]
    MissingCredential { var: &'static str },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config struct ───────────────────────────────────────────────────

/// Flattened configuration.
///
/// In TOML the credential keys are written in lower case
/// (`utility_username = "..."`); in the environment they keep their
/// conventional upper-case names.
#[derive(Clone, Deserialize, Serialize)]
pub struct Config {
    /// Utility billing portal root.
    #[serde(default = "default_utility_url")]
    pub utility_url: String,

    /// AMI analytics backend root.
    #[serde(default = "default_ami_url")]
    pub ami_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub utility_username: Option<String>,

    /// Plaintext in the file; prefer the environment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utility_password: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            utility_url: default_utility_url(),
            ami_url: default_ami_url(),
            timeout: default_timeout(),
            utility_username: None,
            utility_password: None,
            account_number: None,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("utility_url", &self.utility_url)
            .field("ami_url", &self.ami_url)
            .field("timeout", &self.timeout)
            .field("utility_username", &self.utility_username)
            .field(
                "utility_password",
                &self.utility_password.as_ref().map(|_| "[REDACTED]"),
            )
            .field("account_number", &self.account_number)
            .finish()
    }
}

fn default_utility_url() -> String {
    DEFAULT_UTILITY_URL.into()
}
fn default_ami_url() -> String {
    DEFAULT_AMI_URL.into()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

/// Credential variables, taken verbatim.
///
/// Read directly rather than through `figment::providers::Env`, which
/// would parse an account number like `012345` as an integer. Both the
/// conventional names and their `METERLY_`-prefixed forms go through here.
#[derive(Serialize)]
struct CredentialEnv {
    #[serde(skip_serializing_if = "Option::is_none")]
    utility_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    utility_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    account_number: Option<String>,
}

impl CredentialEnv {
    fn from_env(prefix: &str) -> Self {
        let var = |name: &str| std::env::var(format!("{prefix}{name}")).ok();
        Self {
            utility_username: var(USERNAME_VAR),
            utility_password: var(PASSWORD_VAR),
            account_number: var(ACCOUNT_VAR),
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "meterly", "meterly").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("meterly");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load `.env` from the working directory (or a parent) into the process
/// environment.
///
/// Variables already set are left alone. A missing file is not an error.
pub fn load_env_file() -> Result<Option<PathBuf>, ConfigError> {
    match dotenvy::dotenv() {
        Ok(path) => {
            debug!(path = %path.display(), "loaded .env");
            Ok(Some(path))
        }
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(ConfigError::Validation {
            field: ".env".into(),
            reason: e.to_string(),
        }),
    }
}

/// Load the config from the canonical path and the environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the config with `path` as the TOML layer.
///
/// A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Serialized::defaults(CredentialEnv::from_env("")))
        .merge(Env::prefixed(ENV_PREFIX).ignore(&[
            "config",
            "utility_username",
            "utility_password",
            "account_number",
        ]))
        .merge(Serialized::defaults(CredentialEnv::from_env(ENV_PREFIX)));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Translation ─────────────────────────────────────────────────────

impl Config {
    /// Build the runtime `PortalConfig`.
    ///
    /// All three credential values must be present and non-empty.
    pub fn portal_config(&self) -> Result<PortalConfig, ConfigError> {
        let utility_url = parse_url("utility_url", &self.utility_url)?;
        let ami_url = parse_url("ami_url", &self.ami_url)?;

        if self.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }

        let username = required(self.utility_username.as_deref(), USERNAME_VAR)?;
        let password = required(self.utility_password.as_deref(), PASSWORD_VAR)?;
        let account_number = required(self.account_number.as_deref(), ACCOUNT_VAR)?;

        Ok(PortalConfig {
            utility_url,
            ami_url,
            credentials: Credentials {
                username,
                password: SecretString::from(password),
                account_number,
            },
            timeout: Duration::from_secs(self.timeout),
        })
    }
}

fn parse_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::Validation {
        field: field.into(),
        reason: format!("{e}: {raw}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: field.into(),
            reason: format!("expected an http(s) URL, got: {raw}"),
        });
    }
    Ok(url)
}

fn required(value: Option<&str>, var: &'static str) -> Result<String, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.to_owned()),
        _ => Err(ConfigError::MissingCredential { var }),
    }
}
