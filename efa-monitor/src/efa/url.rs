//! Request URLs for the EFA departure monitor endpoint.

use crate::domain::WatchedStop;

/// Default EFA XML departure monitor endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.efa-bw.de/nvbw/XML_DM_REQUEST";

/// Which board to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Departures,
    Arrivals,
}

impl Mode {
    /// Value of the `itdDateTimeDepArr` parameter.
    pub fn as_param(self) -> &'static str {
        match self {
            Mode::Departures => "dep",
            Mode::Arrivals => "arr",
        }
    }

    /// Inverse of [`Mode::as_param`].
    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "dep" => Some(Mode::Departures),
            "arr" => Some(Mode::Arrivals),
            _ => None,
        }
    }
}

/// Build the monitor query URL for a stop.
///
/// The backend stop id is inserted as-is; EFA expects the colons of global
/// ids unescaped.
///
/// # Examples
///
/// ```
/// use efa_monitor::domain::WatchedStop;
/// use efa_monitor::efa::{DEFAULT_BASE_URL, Mode, stop_dm_url};
/// use uuid::Uuid;
///
/// let stop = WatchedStop::new(Uuid::nil(), "de:08111:2599", "Feuersee");
/// let url = stop_dm_url(DEFAULT_BASE_URL, &stop, Mode::Arrivals);
/// assert!(url.contains("name_dm=de:08111:2599"));
/// assert!(url.ends_with("itdDateTimeDepArr=arr"));
/// ```
pub fn stop_dm_url(base_url: &str, stop: &WatchedStop, mode: Mode) -> String {
    format!(
        "{}?language=de&name_dm={}&type_dm=any&mode=direct&useRealtime=1&itdDateTimeDepArr={}",
        base_url,
        stop.backend_stop_id,
        mode.as_param()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn stop() -> WatchedStop {
        WatchedStop::new(Uuid::nil(), "de:08111:2599", "Feuersee")
    }

    #[test]
    fn departure_url() {
        assert_eq!(
            stop_dm_url(DEFAULT_BASE_URL, &stop(), Mode::Departures),
            "https://www.efa-bw.de/nvbw/XML_DM_REQUEST?language=de&name_dm=de:08111:2599\
             &type_dm=any&mode=direct&useRealtime=1&itdDateTimeDepArr=dep"
        );
    }

    #[test]
    fn arrival_url() {
        let url = stop_dm_url(DEFAULT_BASE_URL, &stop(), Mode::Arrivals);
        assert!(url.contains("name_dm=de:08111:2599"));
        assert!(url.contains("itdDateTimeDepArr=arr"));
        assert!(url.contains("language=de"));
        assert!(url.contains("useRealtime=1"));
    }

    #[test]
    fn custom_base_url() {
        let url = stop_dm_url("http://localhost:8080/dm", &stop(), Mode::Departures);
        assert!(url.starts_with("http://localhost:8080/dm?"));
    }

    #[test]
    fn mode_param_round_trip() {
        for mode in [Mode::Departures, Mode::Arrivals] {
            assert_eq!(Mode::from_param(mode.as_param()), Some(mode));
        }
        assert_eq!(Mode::from_param("both"), None);
    }
}
