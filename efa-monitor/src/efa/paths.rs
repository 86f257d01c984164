//! Structural paths into the EFA `itdRequest` schema.
//!
//! Departure and arrival monitors share most of their layout; keeping the
//! paths here stops the two code paths drifting apart.

use super::tree::Path;

/// Tag of the top-level request element.
pub const REQUEST_TAG: &str = "itdRequest";

/// The request element when it is wrapped in something else.
pub const REQUEST: Path = &[REQUEST_TAG];

/// Element carrying the stop's `gid` attribute and display name. Arrival
/// responses use the departure-monitor request element too.
pub const STOP_NAME: Path = &[
    "itdDepartureMonitorRequest",
    "itdOdv",
    "itdOdvName",
    "odvNameElem",
];

pub const DEPARTURES: Path = &["itdDepartureList", "itdDeparture"];

pub const ARRIVALS: Path = &["itdArrivalList", "itdArrival"];

/// Line information of one entry.
pub const SERVING_LINE: Path = &["itdServingLine"];

/// Scheduled time of one entry.
pub const DATE_TIME: Path = &["itdDateTime"];

pub const DATE: Path = &["itdDate"];

pub const TIME: Path = &["itdTime"];

/// Real-time information of one entry.
pub const NO_TRAIN: Path = &["itdNoTrain"];
