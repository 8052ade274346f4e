//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a stable exit code per failure class.

use miette::Diagnostic;
use thiserror::Error;

use meterly_config::ConfigError;
use meterly_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const SESSION: i32 = 4;
    pub const QUERY: i32 = 5;
    pub const CONNECTION: i32 = 6;
    pub const TIMEOUT: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(meterly::auth_failed),
        help("Check UTILITY_USERNAME and UTILITY_PASSWORD against the utility billing portal.")
    )]
    AuthFailed { message: String },

    #[error("Token exchange failed: {message}")]
    #[diagnostic(
        code(meterly::token_exchange),
        help("The portal accepted the login but did not issue an analytics token. Try again later.")
    )]
    TokenExchange { message: String },

    // ── Analytics backend ────────────────────────────────────────────
    #[error("Analytics session rejected: {message}")]
    #[diagnostic(
        code(meterly::session_rejected),
        help("The analytics backend refused the token. Check METERLY_AMI_URL.")
    )]
    SessionRejected { message: String },

    #[error("Meter query failed: {message}")]
    #[diagnostic(
        code(meterly::query_failed),
        help("Verify ACCOUNT_NUMBER (or --account) belongs to the logged-in user.")
    )]
    QueryFailed { message: String },

    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to {url}")]
    #[diagnostic(
        code(meterly::connection_failed),
        help("Check network access and the configured portal URLs.\n{reason}")
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to {url} timed out")]
    #[diagnostic(
        code(meterly::timeout),
        help("Increase the timeout with --timeout or METERLY_TIMEOUT.")
    )]
    Timeout { url: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("{var} is not set")]
    #[diagnostic(
        code(meterly::missing_credential),
        help(
            "Export {var}, add it to a .env file in the working directory,\n\
             or set it in the config file at {path}."
        )
    )]
    MissingCredential { var: &'static str, path: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(meterly::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(meterly::config))]
    Config(Box<figment::Error>),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(meterly::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AuthFailed { .. } | Self::TokenExchange { .. } => exit_code::AUTH,
            Self::SessionRejected { .. } => exit_code::SESSION,
            Self::QueryFailed { .. } => exit_code::QUERY,
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::MissingCredential { .. } | Self::Validation { .. } | Self::Config(_) => {
                exit_code::USAGE
            }
            Self::Io(_) | Self::Render(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::TokenExchangeFailed { message } => CliError::TokenExchange { message },
            CoreError::SessionRejected { message } => CliError::SessionRejected { message },
            CoreError::QueryFailed { message, .. } => CliError::QueryFailed { message },
            CoreError::ConnectionFailed { url, reason } => {
                CliError::ConnectionFailed { url, reason }
            }
            CoreError::Timeout { url } => CliError::Timeout { url },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::MissingCredential { var } => CliError::MissingCredential {
                var,
                path: meterly_config::config_path().display().to_string(),
            },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Figment(e) => CliError::Config(e),
        }
    }
}
