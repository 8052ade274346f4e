// ── Runtime connection configuration ──
//
// These types describe *where* the portals live and *who* is logging in.
// They carry credential data and connection tuning, but never touch disk.
// The CLI constructs a `PortalConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Municipal billing portal that issues the analytics token.
pub const DEFAULT_UTILITY_URL: &str = "https://utilitybilling.newberryfl.gov";

/// AMI analytics backend the token is scoped to.
pub const DEFAULT_AMI_URL: &str = "https://my-nwbry.sensus-analytics.com";

/// Transport timeout applied to every request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Utility portal login plus the account whose meters are listed.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
    pub account_number: String,
}

/// Everything one pipeline run needs.
///
/// Built by the CLI, passed to `Portal` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Utility billing portal root.
    pub utility_url: Url,
    /// AMI analytics backend root.
    pub ami_url: Url,
    pub credentials: Credentials,
    /// Request timeout.
    pub timeout: Duration,
}
