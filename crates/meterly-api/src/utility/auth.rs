// Utility portal authentication
//
// Three requests share the client's cookie jar: a bootstrap GET that makes
// the portal issue its PHP session cookie, the credential check, and the
// token issuance call that turns the logged-in session into an analytics
// bearer token.

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, trace};

use crate::auth::AuthToken;
use crate::error::{Error, body_preview};
use crate::utility::client::UtilityAuthClient;
use crate::utility::models::{LoginResponse, TokenResponse};

const SESSION_PATH: &str = "/utility/";
const LOGIN_PATH: &str = "/citizenlink/common/common/ajax/checkLoginCredentials.php";
const TOKEN_PATH: &str = "/citizenlink/ubs/common/ajax/sensusFetchClientAuthorization.php";

const SITE_NAME: &str = "UTILITY";
const PORTAL_TIMEOUT_MINUTES: &str = "60";

/// Proof of a successful portal login.
///
/// Only [`UtilityAuthClient::authenticate`] can build one, so a token
/// exchange never runs against an unauthenticated jar.
#[derive(Debug)]
pub struct UtilitySession {
    username: String,
}

impl UtilitySession {
    /// The portal user this session belongs to.
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl UtilityAuthClient {
    /// Log in to the utility portal with username/password.
    ///
    /// Opens the portal session first, then posts the login form. The
    /// portal answers HTTP 200 for bad credentials too, so success means
    /// a success status *and* an empty `errors` list in the body.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<UtilitySession, Error> {
        self.open_portal_session().await?;

        let url = self.portal_url(LOGIN_PATH)?;
        debug!(path = url.path(), "submitting utility portal credentials");

        let form = [
            ("loginId", username),
            ("passId", password.expose_secret()),
            ("SITENAME", SITE_NAME),
            ("timeout", PORTAL_TIMEOUT_MINUTES),
            ("linkAccount", "0"),
            ("accessLevel", "11"),
            ("widgetName", "INITIAL"),
        ];

        let resp = self
            .http()
            .post(url)
            .form(&form)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status})"),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        let login: LoginResponse =
            serde_json::from_str(&body).map_err(|e| Error::Authentication {
                message: format!(
                    "unexpected login response: {e} (body preview: {:?})",
                    body_preview(&body)
                ),
            })?;
        trace!(fields = ?login.extra.keys().collect::<Vec<_>>(), "login response");

        match login.errors {
            None => {
                return Err(Error::Authentication {
                    message: "login response did not include an errors list".into(),
                });
            }
            Some(ref errors) if !errors.is_empty() => {
                return Err(Error::Authentication {
                    message: format!("credentials rejected: {}", login.error_messages().join("; ")),
                });
            }
            Some(_) => {}
        }

        debug!("utility portal login successful");
        Ok(UtilitySession {
            username: username.to_owned(),
        })
    }

    /// Exchange the logged-in portal session for an analytics bearer token.
    ///
    /// Any failure here, including an unreachable endpoint, is reported as
    /// [`Error::TokenExchange`].
    pub async fn exchange_for_token(&self, session: &UtilitySession) -> Result<AuthToken, Error> {
        let url = self.portal_url(TOKEN_PATH)?;
        debug!(
            path = url.path(),
            user = session.username(),
            "requesting analytics token"
        );

        let form = [
            ("SITENAME", SITE_NAME),
            ("timeout", PORTAL_TIMEOUT_MINUTES),
            ("linkAccount", "0"),
        ];

        let resp = self
            .http()
            .post(url)
            .form(&form)
            .send()
            .await
            .map_err(|e| Error::TokenExchange {
                message: "token endpoint unreachable".into(),
                source: Some(e),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::TokenExchange {
                message: format!("token endpoint answered HTTP {status}"),
                source: None,
            });
        }

        let body = resp.text().await.map_err(|e| Error::TokenExchange {
            message: "failed to read token response".into(),
            source: Some(e),
        })?;

        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|e| Error::TokenExchange {
                message: format!(
                    "malformed token response: {e} (body preview: {:?})",
                    body_preview(&body)
                ),
                source: None,
            })?;
        trace!(fields = ?parsed.extra.keys().collect::<Vec<_>>(), "token response");

        let token = parsed
            .access_token
            .map(AuthToken::new)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| Error::TokenExchange {
                message: "response did not include an access_token".into(),
                source: None,
            })?;

        debug!("analytics token issued");
        Ok(token)
    }

    /// Hit the portal landing page so it issues the PHP session cookie the
    /// login is bound to.
    async fn open_portal_session(&self) -> Result<(), Error> {
        let url = self.portal_url(SESSION_PATH)?;
        debug!(path = url.path(), "opening utility portal session");

        let resp = self
            .http()
            .get(url)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Authentication {
                message: format!("could not open portal session (HTTP {status})"),
            });
        }

        trace!(cookie = self.has_session_cookie(), "portal session opened");
        Ok(())
    }
}
