// AMI analytics backend client modules
//
// Session bootstrap with the bearer token from the utility portal, then
// per-type meter queries against `/account/details`.

pub mod client;
pub mod meters;
pub mod models;

pub use client::{AmiMeterClient, AmiSession};
pub use models::{MeterListing, MeterRecord, MeterType};
