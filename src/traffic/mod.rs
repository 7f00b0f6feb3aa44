//! Station traffic pipeline.
//!
//! Trips are narrowed to a time-of-day window, counted per station as
//! arrivals and departures, and the totals mapped to circle radii with a
//! square-root scale.

pub mod aggregate;
pub mod filter;
pub mod scale;
pub mod types;

pub use aggregate::compute_station_traffic;
pub use filter::{
    ANY_TIME, MINUTES_PER_DAY, TimeFilter, filter_trips_by_time, format_time, minutes_since_midnight,
};
pub use scale::RadiusScale;
pub use types::{TrafficError, TrafficSummary};
