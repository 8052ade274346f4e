// ── Portal pipeline ──
//
// One linear run per invocation: utility login → token exchange →
// analytics session → meter queries. Each stage hands its output to the
// next; nothing outlives the run and nothing is retried.

use serde_json::Value;
use tracing::{debug, info};

use meterly_api::{
    AmiMeterClient, AmiSession, AuthToken, MeterListing, MeterType, TransportConfig,
    UtilityAuthClient,
};

use crate::config::PortalConfig;
use crate::error::CoreError;

// ── Portal ───────────────────────────────────────────────────────

/// Entry point for consumers.
///
/// Holds the configuration for one run. Does NOT touch the network until
/// [`connect()`](Self::connect) or [`list_meters()`](Self::list_meters).
pub struct Portal {
    config: PortalConfig,
}

impl Portal {
    pub fn new(config: PortalConfig) -> Self {
        Self { config }
    }

    /// Access the portal configuration.
    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    fn transport(&self) -> TransportConfig {
        TransportConfig::new(self.config.timeout)
    }

    /// Log in to the utility portal and exchange the session for an
    /// analytics token.
    pub async fn authenticate(&self) -> Result<AuthToken, CoreError> {
        let creds = &self.config.credentials;
        let client = UtilityAuthClient::new(self.config.utility_url.clone(), &self.transport())?;

        debug!(portal = %self.config.utility_url, "authenticating with utility portal");
        let session = client
            .authenticate(&creds.username, &creds.password)
            .await?;

        debug!("exchanging portal session for analytics token");
        let token = client.exchange_for_token(&session).await?;
        Ok(token)
    }

    /// Run the full handshake and open an analytics session.
    pub async fn connect(&self) -> Result<ConnectedPortal, CoreError> {
        let token = self.authenticate().await?;

        let client = AmiMeterClient::new(self.config.ami_url.clone(), &self.transport())?;
        debug!(backend = %self.config.ami_url, "starting analytics session with token");
        let session = client.start_session(&token).await?;

        info!("connected to AMI analytics backend");
        Ok(ConnectedPortal {
            client,
            session,
            account_number: self.config.credentials.account_number.clone(),
        })
    }

    /// Connect and list every meter on the configured account.
    pub async fn list_meters(&self) -> Result<MeterListing, CoreError> {
        self.connect().await?.meters().await
    }
}

// ── ConnectedPortal ──────────────────────────────────────────────

/// An authenticated analytics session bound to one account.
pub struct ConnectedPortal {
    client: AmiMeterClient,
    session: AmiSession,
    account_number: String,
}

impl ConnectedPortal {
    pub fn session(&self) -> &AmiSession {
        &self.session
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    /// All meters on the account: water, then electric, then gas.
    pub async fn meters(&self) -> Result<MeterListing, CoreError> {
        debug!(account = %self.account_number, "listing all meters");
        let listing = self
            .client
            .list_all_meters(&self.session, &self.account_number)
            .await?;
        Ok(listing)
    }

    /// Meters of one type only, as a listing.
    pub async fn meters_of_type(&self, meter_type: MeterType) -> Result<MeterListing, CoreError> {
        let meters = self
            .client
            .list_meters_by_type(&self.session, &self.account_number, meter_type)
            .await?;
        Ok(MeterListing::from(meters))
    }

    /// The backend's raw account details document.
    pub async fn account_details(&self) -> Result<Value, CoreError> {
        let details = self
            .client
            .account_details(&self.session, &self.account_number)
            .await?;
        Ok(details)
    }
}
