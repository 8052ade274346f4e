// meterly-api: Async clients for the municipal utility portal and its AMI analytics backend

pub mod ami;
pub mod auth;
pub mod error;
pub mod transport;
pub mod utility;

pub use ami::{AmiMeterClient, AmiSession, MeterListing, MeterRecord, MeterType};
pub use auth::AuthToken;
pub use error::Error;
pub use transport::TransportConfig;
pub use utility::{UtilityAuthClient, UtilitySession};
