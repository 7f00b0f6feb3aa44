//! Station and trip records shared by the loaders, the traffic pipeline and
//! the view controller.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// A bike-share dock as published in the GBFS `station_information` feed.
///
/// `short_name` is the identifier trips refer to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub short_name: String,
    #[serde(deserialize_with = "de_coord")]
    pub lon: f64,
    #[serde(deserialize_with = "de_coord")]
    pub lat: f64,
    #[serde(default)]
    pub station_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub capacity: Option<u32>,
}

impl Station {
    pub fn new(short_name: &str, lon: f64, lat: f64) -> Self {
        Self {
            short_name: short_name.to_string(),
            lon,
            lat,
            station_id: None,
            name: None,
            capacity: None,
        }
    }
}

/// A single rental, one row of the monthly trip table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Trip {
    #[serde(default)]
    pub ride_id: Option<String>,
    #[serde(default)]
    pub rideable_type: Option<String>,
    #[serde(deserialize_with = "de_timestamp")]
    pub started_at: NaiveDateTime,
    #[serde(deserialize_with = "de_timestamp")]
    pub ended_at: NaiveDateTime,
    pub start_station_id: String,
    pub end_station_id: String,
    #[serde(default)]
    pub member_casual: Option<String>,
}

impl Trip {
    pub fn new(
        start_station_id: &str,
        end_station_id: &str,
        started_at: NaiveDateTime,
        ended_at: NaiveDateTime,
    ) -> Self {
        Self {
            ride_id: None,
            rideable_type: None,
            started_at,
            ended_at,
            start_station_id: start_station_id.to_string(),
            end_station_id: end_station_id.to_string(),
            member_casual: None,
        }
    }
}

/// A station together with the traffic counted over the active trip set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedStation {
    #[serde(flatten)]
    pub station: Station,
    pub arrivals: usize,
    pub departures: usize,
    pub total_traffic: usize,
}

impl EnrichedStation {
    pub fn short_name(&self) -> &str {
        &self.station.short_name
    }

    /// Tooltip text shown on hover over the station circle.
    pub fn title(&self) -> String {
        format!(
            "{} trips ({} departures, {} arrivals)",
            self.total_traffic, self.departures, self.arrivals
        )
    }
}

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parses a trip timestamp as local wall-clock time.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

fn de_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognized timestamp {raw:?}")))
}

// GBFS publishers disagree on whether coordinates are numbers or strings.
fn de_coord<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Coord {
        Number(f64),
        Text(String),
    }

    match Coord::deserialize(deserializer)? {
        Coord::Number(v) => Ok(v),
        Coord::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid coordinate {s:?}"))),
    }
}
