//! Decoders for the station feed (GBFS JSON) and the trip table (CSV).

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use serde::Deserialize;
use std::borrow::Cow;
use std::collections::HashSet;
use std::io::Read;
use tracing::{debug, warn};

use crate::model::{Station, Trip};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Deserialize)]
struct GbfsDocument {
    data: StationData,
}

#[derive(Deserialize)]
struct StationData {
    stations: Vec<Station>,
}

/// Inflates `bytes` if they carry a gzip header, otherwise borrows them.
pub fn decompress(bytes: &[u8]) -> Result<Cow<'_, [u8]>> {
    if !bytes.starts_with(&GZIP_MAGIC) {
        return Ok(Cow::Borrowed(bytes));
    }

    let mut out = Vec::new();
    GzDecoder::new(bytes)
        .read_to_end(&mut out)
        .context("failed to gunzip source")?;
    debug!(compressed = bytes.len(), inflated = out.len(), "Source gunzipped");
    Ok(Cow::Owned(out))
}

/// Decodes station metadata from either a GBFS `station_information`
/// document or a bare JSON array.
///
/// Stations repeating an earlier `short_name` are dropped with a warning.
pub fn parse_stations(bytes: &[u8]) -> Result<Vec<Station>> {
    let bytes = decompress(bytes)?;
    let is_list = bytes
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'[');

    let stations = if is_list {
        serde_json::from_slice::<Vec<Station>>(&bytes)
            .context("failed to decode station list JSON")?
    } else {
        serde_json::from_slice::<GbfsDocument>(&bytes)
            .context("failed to decode GBFS station JSON")?
            .data
            .stations
    };

    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(stations.len());
    for station in stations {
        if !seen.insert(station.short_name.clone()) {
            warn!(short_name = %station.short_name, "Duplicate station dropped");
            continue;
        }
        unique.push(station);
    }

    Ok(unique)
}

/// Decodes trip rows from a CSV table with a header row.
///
/// # Errors
///
/// Fails on the first row that lacks a required column or carries a
/// timestamp that cannot be read.
pub fn parse_trips<R: Read>(reader: R) -> Result<Vec<Trip>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut trips = Vec::new();

    for (row, result) in rdr.deserialize::<Trip>().enumerate() {
        let trip = result.with_context(|| format!("invalid trip row {}", row + 1))?;
        trips.push(trip);
    }

    Ok(trips)
}

/// [`parse_trips`] over raw, possibly gzip-compressed, bytes.
pub fn parse_trip_bytes(bytes: &[u8]) -> Result<Vec<Trip>> {
    let bytes = decompress(bytes)?;
    parse_trips(&*bytes)
}
