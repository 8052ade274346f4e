// AMI meter queries
//
// `/account/details` answers one meter type per call, so a full listing is
// three sequential calls stitched together in water → electric → gas
// order. A failed call aborts the listing; a backend that declines a query
// (`operationSuccess` not `true`) just has no meters of that type.

use reqwest::Method;
use serde_json::{Value, json};
use strum::IntoEnumIterator;
use tracing::{debug, trace};

use crate::ami::client::{AmiMeterClient, AmiSession, redact_token};
use crate::ami::models::{AccountDetailsResponse, MeterListing, MeterRecord, MeterType};
use crate::error::{Error, body_preview};

const ACCOUNT_DETAILS_PATH: &str = "/account/details";

impl AmiMeterClient {
    /// List the meters of one type on `account_number`.
    ///
    /// An account without meters of this type yields `Ok(vec![])`, as does
    /// a response whose `operationSuccess` is not `true`. Transport
    /// failures, non-success statuses, unparseable bodies and listed ids
    /// without device details are [`Error::Query`].
    pub async fn list_meters_by_type(
        &self,
        session: &AmiSession,
        account_number: &str,
        meter_type: MeterType,
    ) -> Result<Vec<MeterRecord>, Error> {
        let query_err = |message: String, source: Option<reqwest::Error>| Error::Query {
            meter_type: Some(meter_type),
            message,
            source,
        };

        let url = self.backend_url(ACCOUNT_DETAILS_PATH)?;
        debug!(%meter_type, account = account_number, "querying meters");

        let body = json!({
            "accountNumber": account_number,
            "meterTypeByValue": meter_type,
        });

        let resp = self
            .data_request(Method::POST, url, session)?
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                query_err(
                    format!("{meter_type} query failed to send"),
                    Some(redact_token(e)),
                )
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(query_err(
                format!("{meter_type} query answered HTTP {status}"),
                None,
            ));
        }

        let text = resp
            .text()
            .await
            .map_err(|e| {
                query_err(
                    format!("failed to read {meter_type} response"),
                    Some(redact_token(e)),
                )
            })?;

        let parsed: AccountDetailsResponse = serde_json::from_str(&text).map_err(|e| {
            query_err(
                format!(
                    "malformed {meter_type} response: {e} (body preview: {:?})",
                    body_preview(&text)
                ),
                None,
            )
        })?;
        trace!(fields = ?parsed.extra.keys().collect::<Vec<_>>(), "account details response");

        if parsed.operation_success != Some(true) {
            debug!(
                %meter_type,
                error_message = parsed.error_message.as_deref().unwrap_or(""),
                "backend declined query; no meters of this type"
            );
            return Ok(Vec::new());
        }

        let meters = parsed.into_meter_records(meter_type).map_err(|id| {
            query_err(
                format!("{meter_type} meter {id} listed without device details"),
                None,
            )
        })?;

        if meters.is_empty() {
            debug!(%meter_type, "no meters of this type on the account");
        } else {
            debug!(%meter_type, count = meters.len(), "found meter(s)");
            for meter in &meters {
                debug!(
                    meter_id = %meter.meter_id,
                    address = %meter.meter_address,
                    "meter"
                );
            }
        }

        Ok(meters)
    }

    /// List every meter on `account_number`: water, then electric, then gas.
    ///
    /// Queries run one after another; the first failure is returned and
    /// nothing gathered so far is kept.
    pub async fn list_all_meters(
        &self,
        session: &AmiSession,
        account_number: &str,
    ) -> Result<MeterListing, Error> {
        let mut listing = MeterListing::default();
        for meter_type in MeterType::iter() {
            let meters = self
                .list_meters_by_type(session, account_number, meter_type)
                .await?;
            listing.meters.extend(meters);
        }
        debug!(total = listing.len(), "meter listing complete");
        Ok(listing)
    }

    /// Fetch the raw account details document for `account_number`.
    ///
    /// `GET /account/details` without a meter-type filter. The shape is
    /// backend-owned and returned untouched.
    pub async fn account_details(
        &self,
        session: &AmiSession,
        account_number: &str,
    ) -> Result<Value, Error> {
        let query_err = |message: String, source: Option<reqwest::Error>| Error::Query {
            meter_type: None,
            message,
            source,
        };

        let url = self.backend_url(ACCOUNT_DETAILS_PATH)?;
        debug!(account = account_number, "fetching account details");

        let resp = self
            .data_request(Method::GET, url, session)?
            .query(&[("accountNumber", account_number)])
            .send()
            .await
            .map_err(|e| {
                query_err(
                    "account details request failed to send".into(),
                    Some(redact_token(e)),
                )
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(query_err(
                format!("account details answered HTTP {status}"),
                None,
            ));
        }

        let text = resp
            .text()
            .await
            .map_err(|e| {
                query_err(
                    "failed to read account details".into(),
                    Some(redact_token(e)),
                )
            })?;

        serde_json::from_str(&text).map_err(|e| {
            query_err(
                format!(
                    "malformed account details: {e} (body preview: {:?})",
                    body_preview(&text)
                ),
                None,
            )
        })
    }
}
