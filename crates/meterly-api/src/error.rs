use thiserror::Error;

use crate::ami::MeterType;

/// Top-level error type for the `meterly-api` crate.
///
/// One variant per pipeline stage (login, token exchange, analytics
/// session, meter query) plus the transport failures that don't belong
/// to a stage. `meterly-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Utility portal ──────────────────────────────────────────────
    /// Login rejected (wrong credentials, portal reported errors, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The token-issuance endpoint failed or returned no token.
    #[error("Token exchange failed: {message}")]
    TokenExchange {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    // ── Analytics backend ───────────────────────────────────────────
    /// The analytics backend refused to open a session for the token.
    #[error("Analytics session rejected: {message}")]
    Session { message: String },

    /// A meter query failed in transport or returned a malformed body.
    #[error("Meter query failed: {message}")]
    Query {
        meter_type: Option<MeterType>,
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// The meter type a query error belongs to.
    pub fn meter_type(&self) -> Option<MeterType> {
        match self {
            Self::Query { meter_type, .. } => *meter_type,
            _ => None,
        }
    }
}

/// First 200 characters of a response body, for error messages.
pub(crate) fn body_preview(body: &str) -> String {
    body.chars().take(200).collect()
}
