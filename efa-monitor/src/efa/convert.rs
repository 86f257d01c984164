//! Conversion from EFA XML responses to domain types.
//!
//! Every optional attribute is read as an `Option` at the point of use. A
//! missing element is a structural error, a present value that fails a
//! domain constraint is a validation error. Either aborts the whole monitor:
//! no entry is ever skipped.

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::{Arrival, ArrivalMonitor, Delay, Departure, DepartureMonitor};

use super::paths;
use super::tree::{Element, Path};

/// Format of the request's `now` attribute.
const NOW_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Wire value of `itdNoTrain/@delay` for a cancelled service.
const CANCELLED_DELAY: i32 = -9999;

/// Error during XML to domain conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// An expected element is missing
    #[error("unexpected response structure: {0}")]
    Structural(String),

    /// A value is present but not acceptable
    #[error("invalid value: {0}")]
    Validation(String),
}

/// Find a required descendant.
fn require<'a>(element: Element<'a>, path: Path) -> Result<Element<'a>, ConversionError> {
    element.select_first(path).ok_or_else(|| {
        ConversionError::Structural(format!(
            "<{}> has no <{}>",
            element.tag(),
            path.join(" ")
        ))
    })
}

/// Read an optional integer attribute. Empty counts as absent.
fn int_attr(element: Element<'_>, name: &str) -> Result<Option<i32>, ConversionError> {
    element
        .attr(name)
        .filter(|raw| !raw.is_empty())
        .map(|raw| {
            raw.trim().parse::<i32>().map_err(|_| {
                ConversionError::Validation(format!(
                    "{name}={raw:?} on <{}> is not an integer",
                    element.tag()
                ))
            })
        })
        .transpose()
}

/// Resolve an `itdDateTime` element into a point in time.
///
/// Missing date fields read as 0 and missing time fields as -1, so either
/// being absent fails validation.
pub fn resolve_timestamp(date_time: Element<'_>) -> Result<NaiveDateTime, ConversionError> {
    let date = require(date_time, paths::DATE)?;
    let time = require(date_time, paths::TIME)?;

    let year = int_attr(date, "year")?.unwrap_or(0);
    let month = int_attr(date, "month")?.unwrap_or(0);
    let day = int_attr(date, "day")?.unwrap_or(0);
    let hour = int_attr(time, "hour")?.unwrap_or(-1);
    let minute = int_attr(time, "minute")?.unwrap_or(-1);

    if year <= 0 || month <= 0 || day <= 0 || hour < 0 || minute < 0 {
        return Err(ConversionError::Validation(format!(
            "incomplete timestamp {year:04}-{month:02}-{day:02} {hour:02}:{minute:02}"
        )));
    }

    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
        .and_then(|d| d.and_hms_opt(hour as u32, minute as u32, 0))
        .ok_or_else(|| {
            ConversionError::Validation(format!(
                "no such time {year:04}-{month:02}-{day:02} {hour:02}:{minute:02}"
            ))
        })
}

/// Resolve the display label of an `itdServingLine`.
///
/// Trains carry `trainType`/`trainNum` (`"ICE 513"`), other lines a
/// `symbol` (`"S1"`). Lines with neither get an empty label.
pub fn resolve_train_name(serving_line: Element<'_>) -> String {
    if let Some(train_type) = serving_line.attr("trainType") {
        format!(
            "{} {}",
            train_type,
            serving_line.attr("trainNum").unwrap_or_default()
        )
    } else if let Some(symbol) = serving_line.attr("symbol") {
        symbol.to_string()
    } else {
        String::new()
    }
}

/// Resolve the real-time delay of one entry.
///
/// `None` means no real-time data (yet). The cancellation sentinel becomes
/// [`Delay::Unbounded`] and never leaves this function.
pub fn resolve_delay(entry: Element<'_>) -> Result<Option<Delay>, ConversionError> {
    let no_train = require(entry, paths::NO_TRAIN)?;

    let Some(raw) = no_train.attr("delay") else {
        return Ok(None);
    };

    let minutes = raw.trim().parse::<i32>().map_err(|_| {
        ConversionError::Validation(format!("delay={raw:?} is not an integer"))
    })?;

    Ok(Some(delay_from_wire(minutes)))
}

fn delay_from_wire(minutes: i32) -> Delay {
    if minutes == CANCELLED_DELAY {
        Delay::Unbounded
    } else {
        Delay::Minutes(minutes)
    }
}

/// Fields shared by departures and arrivals.
struct EntryParts {
    time: NaiveDateTime,
    train_name: String,
    /// Destination for departures, origin for arrivals.
    towards: Option<String>,
    stop_id: String,
    line_key: Option<String>,
    stateless_id: Option<String>,
    delay: Option<Delay>,
}

/// An entry type on a monitor.
trait MonitorEntry: Sized {
    /// Path from the request element to each entry.
    const LIST: Path;
    /// Serving-line attribute naming the far end of the journey.
    const TOWARDS_ATTR: &'static str;

    fn from_parts(parts: EntryParts) -> Self;
}

impl MonitorEntry for Departure {
    const LIST: Path = paths::DEPARTURES;
    const TOWARDS_ATTR: &'static str = "direction";

    fn from_parts(parts: EntryParts) -> Self {
        Departure {
            time: parts.time,
            train_name: parts.train_name,
            direction: parts.towards,
            stop_id: parts.stop_id,
            line_key: parts.line_key,
            stateless_id: parts.stateless_id,
            delay: parts.delay,
        }
    }
}

impl MonitorEntry for Arrival {
    const LIST: Path = paths::ARRIVALS;
    const TOWARDS_ATTR: &'static str = "directionFrom";

    fn from_parts(parts: EntryParts) -> Self {
        Arrival {
            time: parts.time,
            train_name: parts.train_name,
            origin: parts.towards,
            stop_id: parts.stop_id,
            line_key: parts.line_key,
            stateless_id: parts.stateless_id,
            delay: parts.delay,
        }
    }
}

fn entry_from_element<E: MonitorEntry>(entry: Element<'_>) -> Result<E, ConversionError> {
    let serving_line = require(entry, paths::SERVING_LINE)?;
    let date_time = require(entry, paths::DATE_TIME)?;

    let owned = |value: Option<&str>| value.map(str::to_owned);

    Ok(E::from_parts(EntryParts {
        time: resolve_timestamp(date_time)?,
        train_name: resolve_train_name(serving_line),
        towards: owned(serving_line.attr(E::TOWARDS_ATTR)),
        stop_id: entry.attr("stopID").unwrap_or_default().to_owned(),
        line_key: owned(serving_line.attr("key")),
        stateless_id: owned(serving_line.attr("stateless")),
        delay: resolve_delay(entry)?,
    }))
}

/// Convert one `itdDeparture` element.
pub fn departure_from_element(entry: Element<'_>) -> Result<Departure, ConversionError> {
    entry_from_element(entry)
}

/// Convert one `itdArrival` element.
pub fn arrival_from_element(entry: Element<'_>) -> Result<Arrival, ConversionError> {
    entry_from_element(entry)
}

/// Monitor metadata common to both boards.
struct MonitorHeader<'a> {
    request: Element<'a>,
    now: NaiveDateTime,
    stop_gid: String,
    stop_name: String,
}

fn monitor_header(root: Element<'_>) -> Result<MonitorHeader<'_>, ConversionError> {
    let request = if root.has_tag(paths::REQUEST_TAG) {
        root
    } else {
        require(root, paths::REQUEST)?
    };

    let raw_now = request.attr("now").ok_or_else(|| {
        ConversionError::Validation("request has no \"now\" attribute".to_string())
    })?;
    let now = NaiveDateTime::parse_from_str(raw_now, NOW_FORMAT)
        .map_err(|e| ConversionError::Validation(format!("now={raw_now:?}: {e}")))?;

    // The gid and the display name live on the same element.
    let stop = require(request, paths::STOP_NAME)?;

    Ok(MonitorHeader {
        request,
        now,
        stop_gid: stop.attr("gid").unwrap_or_default().to_owned(),
        stop_name: stop.text().trim().to_owned(),
    })
}

fn entries<E: MonitorEntry>(request: Element<'_>) -> Result<Vec<E>, ConversionError> {
    request
        .select_all(E::LIST)
        .map(entry_from_element::<E>)
        .collect()
}

/// Build a departure monitor from a response's document element.
pub fn departure_monitor_from_response(
    root: Element<'_>,
) -> Result<DepartureMonitor, ConversionError> {
    let header = monitor_header(root)?;
    let departures = entries(header.request)?;

    Ok(DepartureMonitor {
        now: header.now,
        stop_gid: header.stop_gid,
        stop_name: header.stop_name,
        departures,
    })
}

/// Build an arrival monitor from a response's document element.
pub fn arrival_monitor_from_response(root: Element<'_>) -> Result<ArrivalMonitor, ConversionError> {
    let header = monitor_header(root)?;
    let arrivals = entries(header.request)?;

    Ok(ArrivalMonitor {
        now: header.now,
        stop_gid: header.stop_gid,
        stop_name: header.stop_name,
        arrivals,
    })
}
