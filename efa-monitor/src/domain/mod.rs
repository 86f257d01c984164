//! Domain types for EFA departure and arrival monitors.
//!
//! Everything here is plain data, built once per API response and never
//! mutated afterwards. Wire-format quirks (sentinel codes, optional
//! attributes) are resolved before values reach these types.

mod delay;
mod monitor;
mod stop;

pub use delay::Delay;
pub use monitor::{Arrival, ArrivalMonitor, Departure, DepartureMonitor};
pub use stop::WatchedStop;
