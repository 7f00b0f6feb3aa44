//! Output formatting and persistence for enriched stations.
//!
//! Supports pretty-printing, JSON serialization, and CSV export.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::model::EnrichedStation;
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;

/// Flat CSV row; the csv writer cannot serialize the flattened station.
#[derive(Debug, Serialize)]
struct StationRow<'a> {
    short_name: &'a str,
    name: Option<&'a str>,
    lon: f64,
    lat: f64,
    arrivals: usize,
    departures: usize,
    total_traffic: usize,
}

impl<'a> From<&'a EnrichedStation> for StationRow<'a> {
    fn from(s: &'a EnrichedStation) -> Self {
        StationRow {
            short_name: &s.station.short_name,
            name: s.station.name.as_deref(),
            lon: s.station.lon,
            lat: s.station.lat,
            arrivals: s.arrivals,
            departures: s.departures,
            total_traffic: s.total_traffic,
        }
    }
}

/// Logs stations using Rust's debug pretty-print format.
pub fn print_pretty(stations: &[EnrichedStation]) {
    debug!("{:#?}", stations);
}

/// Logs any serializable value as pretty-printed JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes stations as CSV rows, header included.
pub fn write_stations<W: Write>(writer: W, stations: &[EnrichedStation]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);

    for s in stations {
        writer.serialize(StationRow::from(s))?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes stations to a CSV file at `path`, replacing any existing file.
pub fn write_stations_csv(path: &str, stations: &[EnrichedStation]) -> Result<()> {
    debug!(path, rows = stations.len(), "Writing station CSV");
    let file = File::create(path)?;
    write_stations(file, stations)
}
