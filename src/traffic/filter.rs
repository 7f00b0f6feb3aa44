//! Time-of-day trip filtering.

use crate::model::Trip;
use crate::traffic::types::TrafficError;
use chrono::{NaiveTime, Timelike};
use std::fmt;
use std::str::FromStr;

pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Trips are kept when either endpoint lies within this many minutes of the
/// target, inclusive.
pub const TOLERANCE_MINUTES: i32 = 60;

/// Slider value meaning "no time filter".
pub const ANY_TIME: i32 = -1;

/// The active time-of-day filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFilter {
    #[default]
    Any,
    /// Minutes since local midnight, `0..1440`.
    At(u16),
}

impl TimeFilter {
    /// Interprets a slider value in `-1..=1439`.
    pub fn from_slider(value: i32) -> Result<Self, TrafficError> {
        match value {
            ANY_TIME => Ok(TimeFilter::Any),
            v if (0..MINUTES_PER_DAY as i32).contains(&v) => Ok(TimeFilter::At(v as u16)),
            v => Err(TrafficError::InvalidInput(format!(
                "time filter {v} outside {ANY_TIME}..={}",
                MINUTES_PER_DAY - 1
            ))),
        }
    }

    pub fn slider_value(self) -> i32 {
        match self {
            TimeFilter::Any => ANY_TIME,
            TimeFilter::At(m) => m as i32,
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, TimeFilter::At(_))
    }

    /// Whether `trip` starts or ends within the tolerance window.
    pub fn admits(self, trip: &Trip) -> bool {
        match self {
            TimeFilter::Any => true,
            TimeFilter::At(target) => {
                let target = target as i32;
                let start = minutes_since_midnight(&trip.started_at) as i32;
                let end = minutes_since_midnight(&trip.ended_at) as i32;
                (start - target).abs() <= TOLERANCE_MINUTES
                    || (end - target).abs() <= TOLERANCE_MINUTES
            }
        }
    }
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeFilter::Any => write!(f, "any time"),
            TimeFilter::At(m) => write!(f, "{}", format_time(*m)),
        }
    }
}

/// Accepts `any`, a slider value (`-1`, `0`..`1439`) or a clock time `HH:MM`.
impl FromStr for TimeFilter {
    type Err = TrafficError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("any") {
            return Ok(TimeFilter::Any);
        }
        if let Ok(value) = s.parse::<i32>() {
            return TimeFilter::from_slider(value);
        }
        NaiveTime::parse_from_str(s, "%H:%M")
            .map(|t| TimeFilter::At(minutes_since_midnight(&t)))
            .map_err(|_| TrafficError::InvalidInput(format!("unrecognized time filter {s:?}")))
    }
}

/// Clock minutes of `t`, ignoring the date and seconds.
pub fn minutes_since_midnight<T: Timelike>(t: &T) -> u16 {
    (t.hour() * 60 + t.minute()) as u16
}

/// Returns the trips admitted by `filter`, in input order.
///
/// Each endpoint is compared on its own clock time, so a trip crossing
/// midnight is not wrapped around.
pub fn filter_trips_by_time(trips: &[Trip], filter: TimeFilter) -> Vec<&Trip> {
    match filter {
        TimeFilter::Any => trips.iter().collect(),
        TimeFilter::At(_) => trips.iter().filter(|t| filter.admits(t)).collect(),
    }
}

/// Renders a minute-of-day as a short US clock time, e.g. `5:30 PM`.
pub fn format_time(minutes: u16) -> String {
    let minutes = (minutes % MINUTES_PER_DAY) as u32;
    match NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0) {
        Some(t) => t.format("%-I:%M %p").to_string(),
        None => String::new(),
    }
}
