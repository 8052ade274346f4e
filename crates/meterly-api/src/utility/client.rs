// Utility portal HTTP client
//
// Wraps `reqwest::Client` with the portal base URL and the cookie jar that
// carries the PHP session from login to token exchange. The login and
// token flows are inherent methods in `auth.rs`.

use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Raw HTTP client for the municipal utility billing portal.
pub struct UtilityAuthClient {
    http: reqwest::Client,
    base_url: Url,
    /// Jar holding the portal's session cookies.
    cookie_jar: Option<Arc<Jar>>,
}

impl UtilityAuthClient {
    /// Create a new utility client from a `TransportConfig`.
    ///
    /// A cookie jar is added if the config has none; the portal tracks the
    /// login through its session cookie. `base_url` is the portal root
    /// (e.g. `https://utilitybilling.example.gov`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let config = transport.ensure_cookie_jar();
        let cookie_jar = config.cookie_jar.clone();
        let http = config.build_client()?;
        Ok(Self {
            http,
            base_url,
            cookie_jar,
        })
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Whether the jar currently holds any cookie for the portal.
    pub fn has_session_cookie(&self) -> bool {
        self.cookie_jar
            .as_ref()
            .is_some_and(|jar| jar.cookies(&self.base_url).is_some())
    }

    /// Build a full URL for a portal path: `{base}{path}`.
    pub(crate) fn portal_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }
}
