use std::fmt;

use secrecy::{ExposeSecret, SecretString};

/// Bearer token issued by the utility portal for the analytics backend.
///
/// Opaque to this crate. It travels as the `sso_auth` query parameter on
/// every analytics request, so it is kept behind `SecretString` and never
/// shows up in `Debug` output or logs.
#[derive(Clone)]
pub struct AuthToken(SecretString);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// The raw token value, for building requests.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.expose().trim().is_empty()
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken([REDACTED])")
    }
}

impl From<String> for AuthToken {
    fn from(token: String) -> Self {
        Self::new(token)
    }
}
