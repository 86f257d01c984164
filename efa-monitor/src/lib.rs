//! Real-time departure and arrival monitors from EFA.
//!
//! Fetches the monitor of each watched stop from an EFA XML endpoint and
//! turns it into immutable domain records for storage and alerting.

pub mod config;
pub mod domain;
pub mod efa;
