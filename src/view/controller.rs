use serde::Serialize;
use tracing::debug;

use crate::model::{EnrichedStation, Station, Trip};
use crate::traffic::{
    RadiusScale, TimeFilter, TrafficError, TrafficSummary, compute_station_traffic,
    filter_trips_by_time, format_time,
};
use crate::view::projection::Projector;

/// Everything the drawing layer needs for one station circle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationMarker {
    pub short_name: String,
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub title: String,
    pub arrivals: usize,
    pub departures: usize,
    pub total_traffic: usize,
}

/// Headless controller behind the station traffic map.
///
/// Holds the authoritative station and trip sets, the map projection and
/// the current time filter. Slider input goes through
/// [`TrafficView::on_state_change`]; pan, zoom and resize go through
/// [`TrafficView::projector_mut`]. Neither mutates the loaded data.
pub struct TrafficView<P> {
    stations: Vec<Station>,
    trips: Vec<Trip>,
    projector: P,
    filter: TimeFilter,
    active_trips: usize,
    enriched: Vec<EnrichedStation>,
    scale: RadiusScale,
}

impl<P: Projector> TrafficView<P> {
    /// Builds the view with no time filter applied.
    pub fn new(stations: Vec<Station>, trips: Vec<Trip>, projector: P) -> Self {
        let enriched = compute_station_traffic(&stations, &trips);
        let scale = RadiusScale::for_stations(&enriched, TimeFilter::Any);
        let active_trips = trips.len();

        Self {
            stations,
            trips,
            projector,
            filter: TimeFilter::Any,
            active_trips,
            enriched,
            scale,
        }
    }

    /// Applies a raw slider value (`-1` for any time, else minutes since
    /// midnight). An out-of-range value leaves the view untouched.
    pub fn on_state_change(&mut self, slider_value: i32) -> Result<&[EnrichedStation], TrafficError> {
        let filter = TimeFilter::from_slider(slider_value)?;
        Ok(self.apply_filter(filter))
    }

    pub fn apply_filter(&mut self, filter: TimeFilter) -> &[EnrichedStation] {
        let active = filter_trips_by_time(&self.trips, filter);
        self.active_trips = active.len();
        self.enriched = compute_station_traffic(&self.stations, active);
        self.scale = RadiusScale::for_stations(&self.enriched, filter);
        self.filter = filter;

        debug!(
            filter = %filter,
            active_trips = self.active_trips,
            stations = self.enriched.len(),
            "Station traffic recomputed"
        );

        &self.enriched
    }

    pub fn filter(&self) -> TimeFilter {
        self.filter
    }

    /// Slider caption; `None` stands for "any time".
    pub fn time_label(&self) -> Option<String> {
        match self.filter {
            TimeFilter::Any => None,
            TimeFilter::At(m) => Some(format_time(m)),
        }
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn enriched(&self) -> &[EnrichedStation] {
        &self.enriched
    }

    pub fn active_trip_count(&self) -> usize {
        self.active_trips
    }

    pub fn scale(&self) -> &RadiusScale {
        &self.scale
    }

    pub fn summary(&self) -> TrafficSummary {
        TrafficSummary::from_stations(&self.enriched)
    }

    pub fn projector(&self) -> &P {
        &self.projector
    }

    pub fn projector_mut(&mut self) -> &mut P {
        &mut self.projector
    }

    /// Current circles, positioned with the projector as it is now.
    pub fn markers(&self) -> Vec<StationMarker> {
        self.enriched
            .iter()
            .map(|s| {
                let pos = self.projector.project(s.station.lon, s.station.lat);
                StationMarker {
                    short_name: s.short_name().to_string(),
                    cx: pos.cx,
                    cy: pos.cy,
                    r: self.scale.radius(s.total_traffic as f64),
                    title: s.title(),
                    arrivals: s.arrivals,
                    departures: s.departures,
                    total_traffic: s.total_traffic,
                }
            })
            .collect()
    }
}
