// AMI analytics models
//
// Domain records (`MeterType`, `MeterRecord`, `MeterListing`) plus the wire
// shape of `/account/details`. The backend is inconsistent about null vs.
// missing fields, so everything on the wire side is optional.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumIter, EnumString};

// ── Domain types ─────────────────────────────────────────────────────

/// The utility category a meter measures.
///
/// Declaration order is the listing order: water, electric, gas.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MeterType {
    Water,
    Electric,
    Gas,
}

/// One meter on the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_field_names)]
pub struct MeterRecord {
    pub meter_id: String,
    pub meter_type: MeterType,
    pub meter_address: String,
}

/// All meters on an account, grouped water → electric → gas.
///
/// Serializes as `{"meters": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeterListing {
    pub meters: Vec<MeterRecord>,
}

impl MeterListing {
    pub fn len(&self) -> usize {
        self.meters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meters.is_empty()
    }
}

impl From<Vec<MeterRecord>> for MeterListing {
    fn from(meters: Vec<MeterRecord>) -> Self {
        Self { meters }
    }
}

// ── Wire types ───────────────────────────────────────────────────────

/// Response of `POST /account/details` for one meter type.
///
/// ```json
/// {
///   "operationSuccess": true,
///   "deviceIdList": ["12345678"],
///   "devices": { "12345678": { "address": { "line1": "1234 Easy St" } } }
/// }
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetailsResponse {
    #[serde(default)]
    pub operation_success: Option<bool>,
    #[serde(default)]
    pub device_id_list: Option<Vec<DeviceId>>,
    #[serde(default)]
    pub devices: Option<HashMap<String, DeviceDetails>>,
    #[serde(default)]
    pub error_message: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Meter ids come back as strings on most accounts and as bare numbers on
/// some older ones.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DeviceId {
    Text(String),
    Number(u64),
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeviceDetails {
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub line1: Option<String>,
    #[serde(default)]
    pub line2: Option<String>,
}

impl Address {
    /// `line1`, followed by `line2` after a space when it is non-empty.
    pub fn display_line(&self) -> String {
        let line1 = self.line1.as_deref().unwrap_or_default().trim();
        match self.line2.as_deref().map(str::trim) {
            Some(line2) if !line2.is_empty() => format!("{line1} {line2}"),
            _ => line1.to_owned(),
        }
    }
}

impl AccountDetailsResponse {
    /// Turn the device list into meter records of the queried type.
    ///
    /// Order follows `deviceIdList`. A listed id with no entry under
    /// `devices` is returned as `Err(id)`.
    pub fn into_meter_records(self, meter_type: MeterType) -> Result<Vec<MeterRecord>, String> {
        let devices = self.devices.unwrap_or_default();
        self.device_id_list
            .unwrap_or_default()
            .into_iter()
            .map(|id| {
                let meter_id = id.to_string();
                let details = devices.get(&meter_id).ok_or_else(|| meter_id.clone())?;
                let meter_address = details
                    .address
                    .as_ref()
                    .map(Address::display_line)
                    .unwrap_or_default();
                Ok(MeterRecord {
                    meter_id,
                    meter_type,
                    meter_address,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use strum::IntoEnumIterator;

    fn parse(body: &Value) -> AccountDetailsResponse {
        serde_json::from_value(body.clone())
            .unwrap_or_else(|e| panic!("account details should parse: {e}"))
    }

    #[test]
    fn meter_types_iterate_in_listing_order() {
        let order: Vec<MeterType> = MeterType::iter().collect();
        assert_eq!(order, vec![MeterType::Water, MeterType::Electric, MeterType::Gas]);
    }

    #[test]
    fn meter_type_wire_names_are_lowercase() {
        assert_eq!(MeterType::Electric.to_string(), "electric");
        assert_eq!(MeterType::Gas.as_ref(), "gas");
        assert_eq!("water".parse::<MeterType>().ok(), Some(MeterType::Water));
        assert_eq!(
            serde_json::to_string(&MeterType::Water).ok().as_deref(),
            Some("\"water\"")
        );
    }

    #[test]
    fn address_appends_second_line() {
        let resp = parse(&json!({
            "operationSuccess": true,
            "deviceIdList": ["1", "2"],
            "devices": {
                "1": { "address": { "line1": "1234 Easy St", "line2": "Unit B" } },
                "2": { "address": { "line1": "1234 Easy St", "line2": "" } }
            }
        }));

        let meters = resp
            .into_meter_records(MeterType::Water)
            .unwrap_or_else(|id| panic!("device {id} missing"));
        assert_eq!(meters[0].meter_address, "1234 Easy St Unit B");
        assert_eq!(meters[1].meter_address, "1234 Easy St");
    }

    #[test]
    fn numeric_ids_become_strings() {
        let resp = parse(&json!({
            "operationSuccess": true,
            "deviceIdList": [87654321],
            "devices": { "87654321": { "address": { "line1": "1234 Easy St" } } }
        }));

        let meters = resp
            .into_meter_records(MeterType::Electric)
            .unwrap_or_else(|id| panic!("device {id} missing"));
        assert_eq!(
            meters,
            vec![MeterRecord {
                meter_id: "87654321".into(),
                meter_type: MeterType::Electric,
                meter_address: "1234 Easy St".into(),
            }]
        );
    }

    #[test]
    fn null_device_list_means_no_meters() {
        let resp = parse(&json!({
            "operationSuccess": true,
            "deviceIdList": null,
            "devices": null
        }));
        assert_eq!(resp.into_meter_records(MeterType::Gas), Ok(vec![]));
    }

    #[test]
    fn listed_device_without_details_is_reported() {
        let resp = parse(&json!({
            "operationSuccess": true,
            "deviceIdList": ["555"],
            "devices": {}
        }));
        assert_eq!(
            resp.into_meter_records(MeterType::Water),
            Err("555".to_owned())
        );
    }

    #[test]
    fn listing_serializes_with_camel_case_keys() {
        let listing = MeterListing::from(vec![MeterRecord {
            meter_id: "12345678".into(),
            meter_type: MeterType::Water,
            meter_address: "1234 Easy St".into(),
        }]);

        assert_eq!(
            serde_json::to_string(&listing).ok().as_deref(),
            Some(
                r#"{"meters":[{"meterId":"12345678","meterType":"water","meterAddress":"1234 Easy St"}]}"#
            )
        );
    }
}
