// ── Core error types ──
//
// User-facing errors from meterly-core, one per pipeline stage plus
// connectivity. The `From<meterly_api::Error>` impl translates
// transport-layer errors into these.

use thiserror::Error;

use meterly_api::MeterType;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Pipeline stages ──────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Token exchange failed: {message}")]
    TokenExchangeFailed { message: String },

    #[error("Analytics session rejected: {message}")]
    SessionRejected { message: String },

    #[error("Meter query failed: {message}")]
    QueryFailed {
        meter_type: Option<MeterType>,
        message: String,
    },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<meterly_api::Error> for CoreError {
    fn from(err: meterly_api::Error) -> Self {
        match err {
            meterly_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            meterly_api::Error::TokenExchange { message, source } => {
                CoreError::TokenExchangeFailed {
                    message: with_source(message, source.as_ref()),
                }
            }
            meterly_api::Error::Session { message } => CoreError::SessionRejected { message },
            meterly_api::Error::Query {
                meter_type,
                message,
                source,
            } => CoreError::QueryFailed {
                meter_type,
                message: with_source(message, source.as_ref()),
            },
            meterly_api::Error::Transport(ref e) => {
                let url = e
                    .url()
                    .map_or_else(|| "<unknown>".into(), |u| u.origin().ascii_serialization());
                if e.is_timeout() {
                    CoreError::Timeout { url }
                } else {
                    CoreError::ConnectionFailed {
                        url,
                        reason: e.to_string(),
                    }
                }
            }
            meterly_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
        }
    }
}

/// Append the transport cause to a stage message.
fn with_source<E: std::fmt::Display>(message: String, source: Option<&E>) -> String {
    match source {
        Some(e) => format!("{message}: {e}"),
        None => message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_errors_map_to_matching_core_variants() {
        let err = CoreError::from(meterly_api::Error::Session {
            message: "token rejected (HTTP 401)".into(),
        });
        assert!(matches!(err, CoreError::SessionRejected { .. }));

        let err = CoreError::from(meterly_api::Error::Query {
            meter_type: Some(MeterType::Gas),
            message: "gas query answered HTTP 500".into(),
            source: None,
        });
        match err {
            CoreError::QueryFailed {
                meter_type,
                message,
            } => {
                assert_eq!(meter_type, Some(MeterType::Gas));
                assert_eq!(message, "gas query answered HTTP 500");
            }
            other => panic!("expected QueryFailed, got: {other:?}"),
        }
    }

    #[test]
    fn invalid_url_is_a_config_error() {
        let parse_err = url::Url::parse("not a url").err();
        let Some(parse_err) = parse_err else {
            panic!("'not a url' should not parse");
        };
        let err = CoreError::from(meterly_api::Error::InvalidUrl(parse_err));
        assert!(matches!(err, CoreError::Config { .. }));
    }
}
