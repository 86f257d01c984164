//! EFA (Elektronische Fahrplanauskunft) XML client.
//!
//! This module fetches departure and arrival monitors from an EFA
//! `XML_DM_REQUEST` endpoint and converts them to domain types.
//!
//! Key characteristics of EFA responses:
//! - Everything hangs off a top-level `itdRequest` element whose `now`
//!   attribute is the server's local time, without an offset
//! - Lines are named either by `trainType`/`trainNum` or by `symbol`
//! - A delay of `-9999` minutes means the service is cancelled

mod client;
mod convert;
mod error;
mod mock;
mod paths;
mod tree;
mod url;

pub use client::{EfaClient, EfaConfig, HttpTransport, Transport};
pub use convert::{
    ConversionError, arrival_from_element, arrival_monitor_from_response, departure_from_element,
    departure_monitor_from_response, resolve_delay, resolve_timestamp, resolve_train_name,
};
pub use error::EfaError;
pub use mock::MockTransport;
pub use tree::{Document, Element, Path, TreeError};
pub use url::{DEFAULT_BASE_URL, Mode, stop_dm_url};
