// Utility portal response types
//
// The portal's AJAX endpoints answer with loosely shaped JSON. Only the
// fields the handshake depends on are modelled; everything else is kept
// in `extra` for trace output.

use serde::Deserialize;
use serde_json::Value;

/// Body of `checkLoginCredentials.php`.
///
/// A successful login answers with an empty `errors` list. A missing list
/// means the response wasn't a login answer at all.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub errors: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl LoginResponse {
    /// Human-readable form of each reported error.
    ///
    /// Entries are plain strings on most portal versions; objects with a
    /// `message` field show up too.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .flatten()
            .map(|err| match err {
                Value::String(s) => s.clone(),
                Value::Object(map) => map
                    .get("message")
                    .and_then(Value::as_str)
                    .map_or_else(|| err.to_string(), str::to_owned),
                other => other.to_string(),
            })
            .collect()
    }
}

/// Body of `sensusFetchClientAuthorization.php`.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}
