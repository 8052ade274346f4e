// meterly-core: Authentication pipeline between meterly-api and consumers (CLI).

pub mod config;
pub mod error;
pub mod portal;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{Credentials, DEFAULT_AMI_URL, DEFAULT_TIMEOUT, DEFAULT_UTILITY_URL, PortalConfig};
pub use error::CoreError;
pub use portal::{ConnectedPortal, Portal};

// Re-export the domain types so consumers don't need meterly-api directly.
pub use meterly_api::{MeterListing, MeterRecord, MeterType};
