// AMI analytics HTTP client
//
// Wraps `reqwest::Client` with the analytics base URL and the `sso_auth`
// / XHR headers every data call needs. The client's cookie jar carries
// the backend's JSESSIONID. Meter queries live in `meters.rs`.

use reqwest::header::{ACCEPT, ORIGIN, REFERER};
use tracing::{debug, trace};
use url::Url;

use crate::auth::AuthToken;
use crate::error::Error;
use crate::transport::TransportConfig;

const INIT_PATH: &str = "/init/init";
const MAIN_PAGE_PATH: &str = "/main.html";
const SESSION_COOKIE: &str = "JSESSIONID";

/// An open analytics session.
///
/// Carries the bearer token (sent on every data call) and the session id
/// the backend issued for it. Only [`AmiMeterClient::start_session`]
/// builds one.
#[derive(Debug, Clone)]
pub struct AmiSession {
    token: AuthToken,
    session_id: String,
}

impl AmiSession {
    pub fn token(&self) -> &AuthToken {
        &self.token
    }

    /// The `JSESSIONID` issued by the backend.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

/// Raw HTTP client for the AMI analytics backend.
pub struct AmiMeterClient {
    http: reqwest::Client,
    base_url: Url,
}

impl AmiMeterClient {
    /// Create a new analytics client from a `TransportConfig`.
    ///
    /// A cookie jar is added if the config has none; the backend binds data
    /// calls to the session cookie from [`start_session`](Self::start_session).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.ensure_cookie_jar().build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create an analytics client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The analytics backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Open a session for `token`.
    ///
    /// `POST /init/init?sso_auth=<token>` with an empty JSON body. The
    /// backend answers with a `JSESSIONID` cookie when it accepts the
    /// token; a non-success status or a missing cookie means the token was
    /// expired or invalid.
    pub async fn start_session(&self, token: &AuthToken) -> Result<AmiSession, Error> {
        let url = self.backend_url(INIT_PATH)?;
        debug!(path = url.path(), "starting analytics session");

        let resp = self
            .http
            .post(url)
            .query(&[("sso_auth", token.expose())])
            .header(ACCEPT, "application/json, text/javascript, */*")
            .header(ORIGIN, self.origin())
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| Error::Transport(redact_token(e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Session {
                message: format!("token rejected (HTTP {status})"),
            });
        }

        let session_id = resp
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE)
            .map(|c| c.value().to_owned())
            .ok_or_else(|| Error::Session {
                message: format!("backend did not issue a {SESSION_COOKIE} cookie"),
            })?;

        debug!("analytics session established");
        Ok(AmiSession {
            token: token.clone(),
            session_id,
        })
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for a backend path: `{base}{path}`.
    pub(crate) fn backend_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }

    /// `Origin` header value for the backend.
    fn origin(&self) -> String {
        self.base_url.origin().ascii_serialization()
    }

    /// `Referer` the web app would send: the main page with the token.
    fn referer(&self, token: &AuthToken) -> Result<String, Error> {
        let mut url = self.backend_url(MAIN_PAGE_PATH)?;
        url.query_pairs_mut().append_pair("sso_auth", token.expose());
        Ok(url.into())
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Prepare a data call for `session`: token query parameter plus the
    /// headers the backend's XHR endpoints check.
    pub(crate) fn data_request(
        &self,
        method: reqwest::Method,
        url: Url,
        session: &AmiSession,
    ) -> Result<reqwest::RequestBuilder, Error> {
        trace!(%method, path = url.path(), "analytics data request");
        Ok(self
            .http
            .request(method, url)
            .query(&[("sso_auth", session.token().expose())])
            .header(ACCEPT, "application/json, text/javascript, */*; q=0.01")
            .header(ORIGIN, self.origin())
            .header(REFERER, self.referer(session.token())?)
            .header("X-Requested-With", "XMLHttpRequest"))
    }
}

/// Strip the query string, which carries the token, from a transport
/// error's URL.
pub(crate) fn redact_token(mut err: reqwest::Error) -> reqwest::Error {
    if let Some(url) = err.url_mut() {
        url.set_query(None);
    }
    err
}
