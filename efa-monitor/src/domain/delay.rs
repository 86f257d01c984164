//! Real-time delay values.

use std::fmt;

use serde::Serialize;

/// Real-time delay of a departure or arrival.
///
/// A cancelled service is modelled as an unbounded delay: it will never
/// run, so it sorts after every finite delay.
///
/// # Examples
///
/// ```
/// use efa_monitor::domain::Delay;
///
/// assert!(Delay::Minutes(120) < Delay::Unbounded);
/// assert_eq!(Delay::Unbounded.minutes(), f64::INFINITY);
/// assert_eq!(Delay::Minutes(-1).minutes(), -1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Delay {
    /// Delay in whole minutes. Negative means early.
    Minutes(i32),

    /// The service is cancelled.
    #[serde(rename = "cancelled")]
    Unbounded,
}

impl Delay {
    /// Whether this delay means the service will not run.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Delay::Unbounded)
    }

    /// Delay in minutes, infinite for a cancelled service.
    pub fn minutes(&self) -> f64 {
        match self {
            Delay::Minutes(m) => f64::from(*m),
            Delay::Unbounded => f64::INFINITY,
        }
    }
}

impl fmt::Display for Delay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delay::Minutes(m) => write!(f, "{m:+} min"),
            Delay::Unbounded => f.write_str("cancelled"),
        }
    }
}
