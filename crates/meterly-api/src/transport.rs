// Shared transport configuration for building reqwest::Client instances.
//
// Both the utility and the analytics clients need a cookie jar and the
// same timeout, so the builder logic lives here once.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;

use crate::error::Error;

const USER_AGENT: &str = concat!("meterly/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub cookie_jar: Option<Arc<Jar>>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            cookie_jar: None,
        }
    }
}

impl TransportConfig {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            cookie_jar: None,
        }
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT);

        if let Some(ref jar) = self.cookie_jar {
            builder = builder.cookie_provider(Arc::clone(jar));
        }

        builder.build().map_err(Error::Transport)
    }

    /// Create a config with a fresh cookie jar (for session auth).
    pub fn with_cookie_jar(mut self) -> Self {
        self.cookie_jar = Some(Arc::new(Jar::default()));
        self
    }

    /// Clone this config, adding a fresh cookie jar if it has none.
    pub(crate) fn ensure_cookie_jar(&self) -> Self {
        if self.cookie_jar.is_some() {
            self.clone()
        } else {
            self.clone().with_cookie_jar()
        }
    }
}
