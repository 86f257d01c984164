//! Departure and arrival monitors.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::Delay;

/// One departure on a departure monitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Departure {
    /// Event time as reported, local to the stop (no timezone applied).
    pub time: NaiveDateTime,
    /// Line or train label, e.g. `"ICE 513"` or `"S1"`. May be empty.
    pub train_name: String,
    /// Destination label.
    pub direction: Option<String>,
    /// Backend identifier of the physical stop or platform.
    pub stop_id: String,
    /// Line key, specific to the timetable version.
    pub line_key: Option<String>,
    /// Line identifier that survives timetable changes.
    pub stateless_id: Option<String>,
    /// Real-time delay, `None` if unknown.
    pub delay: Option<Delay>,
}

impl Departure {
    /// Whether real-time data reports this departure as cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.delay.is_some_and(|d| d.is_cancelled())
    }
}

/// One arrival on an arrival monitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Arrival {
    /// Event time as reported, local to the stop (no timezone applied).
    pub time: NaiveDateTime,
    /// Line or train label. May be empty.
    pub train_name: String,
    /// Origin label.
    pub origin: Option<String>,
    /// Backend identifier of the physical stop or platform.
    pub stop_id: String,
    /// Line key, specific to the timetable version.
    pub line_key: Option<String>,
    /// Line identifier that survives timetable changes.
    pub stateless_id: Option<String>,
    /// Real-time delay, `None` if unknown.
    pub delay: Option<Delay>,
}

impl Arrival {
    /// Whether real-time data reports this arrival as cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.delay.is_some_and(|d| d.is_cancelled())
    }
}

/// Departure board for one stop at one query time.
///
/// Departures keep the order the API returned them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartureMonitor {
    /// Server time of the query.
    pub now: NaiveDateTime,
    /// Global stop identifier (empty if the API gave none).
    pub stop_gid: String,
    /// Stop display name.
    pub stop_name: String,
    pub departures: Vec<Departure>,
}

impl DepartureMonitor {
    pub fn len(&self) -> usize {
        self.departures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.departures.is_empty()
    }

    /// Departures reported as cancelled.
    pub fn cancelled(&self) -> impl Iterator<Item = &Departure> {
        self.departures.iter().filter(|d| d.is_cancelled())
    }
}

/// Arrival board for one stop at one query time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArrivalMonitor {
    /// Server time of the query.
    pub now: NaiveDateTime,
    /// Global stop identifier (empty if the API gave none).
    pub stop_gid: String,
    /// Stop display name.
    pub stop_name: String,
    pub arrivals: Vec<Arrival>,
}

impl ArrivalMonitor {
    pub fn len(&self) -> usize {
        self.arrivals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrivals.is_empty()
    }

    /// Arrivals reported as cancelled.
    pub fn cancelled(&self) -> impl Iterator<Item = &Arrival> {
        self.arrivals.iter().filter(|a| a.is_cancelled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 5, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn departure(delay: Option<Delay>) -> Departure {
        Departure {
            time: at(8, 5),
            train_name: "S 3".into(),
            direction: Some("Backnang".into()),
            stop_id: "5006008".into(),
            line_key: None,
            stateless_id: None,
            delay,
        }
    }

    #[test]
    fn cancellation_is_distinct_from_unknown_delay() {
        assert!(departure(Some(Delay::Unbounded)).is_cancelled());
        assert!(!departure(None).is_cancelled());
        assert!(!departure(Some(Delay::Minutes(7))).is_cancelled());
    }

    #[test]
    fn monitor_lists_cancelled_departures() {
        let monitor = DepartureMonitor {
            now: at(8, 0),
            stop_gid: "de:08111:6008".into(),
            stop_name: "Stuttgart Hbf".into(),
            departures: vec![
                departure(None),
                departure(Some(Delay::Unbounded)),
                departure(Some(Delay::Minutes(2))),
            ],
        };
        assert_eq!(monitor.len(), 3);
        assert_eq!(monitor.cancelled().count(), 1);
    }

    #[test]
    fn serializes_times_without_offset() {
        let json = serde_json::to_value(departure(None)).unwrap();
        assert_eq!(json["time"], "2023-05-01T08:05:00");
        assert!(json["delay"].is_null());
    }
}
