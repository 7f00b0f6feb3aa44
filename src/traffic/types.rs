//! Error and summary types used by the traffic pipeline.

use serde::Serialize;

use crate::model::EnrichedStation;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TrafficError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Totals over one enriched station set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrafficSummary {
    pub stations: usize,
    pub departures: usize,
    pub arrivals: usize,
    pub max_total_traffic: usize,
    pub busiest_station: Option<String>,
}

impl TrafficSummary {
    /// Ties for the busiest station go to the one listed first.
    pub fn from_stations(stations: &[EnrichedStation]) -> Self {
        let mut summary = TrafficSummary {
            stations: stations.len(),
            ..Default::default()
        };

        for s in stations {
            summary.departures += s.departures;
            summary.arrivals += s.arrivals;

            if summary.busiest_station.is_none() || s.total_traffic > summary.max_total_traffic {
                summary.max_total_traffic = s.total_traffic;
                summary.busiest_station = Some(s.short_name().to_string());
            }
        }

        summary
    }
}
