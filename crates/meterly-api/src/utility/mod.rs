// Utility portal client modules
//
// Cookie-session login against the municipal billing portal and the
// exchange of that session for an analytics bearer token.

pub mod auth;
pub mod client;
pub mod models;

pub use auth::UtilitySession;
pub use client::UtilityAuthClient;
