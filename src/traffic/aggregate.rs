use crate::model::{EnrichedStation, Station, Trip};
use std::collections::HashMap;

/// Counts arrivals and departures per station over `trips`.
///
/// Returns one [`EnrichedStation`] per input station, in input order. Trips
/// referring to stations that are not in `stations` are ignored, and
/// stations without trips get zero counts.
pub fn compute_station_traffic<'a, I>(stations: &[Station], trips: I) -> Vec<EnrichedStation>
where
    I: IntoIterator<Item = &'a Trip>,
{
    let mut departures: HashMap<&str, usize> = HashMap::new();
    let mut arrivals: HashMap<&str, usize> = HashMap::new();

    for trip in trips {
        *departures.entry(trip.start_station_id.as_str()).or_default() += 1;
        *arrivals.entry(trip.end_station_id.as_str()).or_default() += 1;
    }

    stations
        .iter()
        .map(|station| {
            let id = station.short_name.as_str();
            let arrivals = arrivals.get(id).copied().unwrap_or(0);
            let departures = departures.get(id).copied().unwrap_or(0);

            EnrichedStation {
                station: station.clone(),
                arrivals,
                departures,
                total_traffic: arrivals + departures,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn trip(start: &str, end: &str) -> Trip {
        let at = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        Trip::new(start, end, at, at)
    }

    fn stations(ids: &[&str]) -> Vec<Station> {
        ids.iter().map(|id| Station::new(id, -71.0, 42.0)).collect()
    }

    #[test]
    fn test_two_station_example() {
        let stations = stations(&["A", "B"]);
        let trips = vec![trip("A", "B"), trip("A", "A")];

        let result = compute_station_traffic(&stations, &trips);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].short_name(), "A");
        assert_eq!(result[0].departures, 2);
        assert_eq!(result[0].arrivals, 1);
        assert_eq!(result[0].total_traffic, 3);
        assert_eq!(result[1].short_name(), "B");
        assert_eq!(result[1].departures, 0);
        assert_eq!(result[1].arrivals, 1);
        assert_eq!(result[1].total_traffic, 1);
    }

    #[test]
    fn test_no_trips_yields_zero_counts() {
        let stations = stations(&["A", "B", "C"]);
        let result = compute_station_traffic(&stations, &Vec::<Trip>::new());

        assert_eq!(result.len(), 3);
        for s in &result {
            assert_eq!((s.arrivals, s.departures, s.total_traffic), (0, 0, 0));
        }
    }

    #[test]
    fn test_no_stations_yields_empty() {
        let trips = vec![trip("A", "B")];
        assert!(compute_station_traffic(&[], &trips).is_empty());
    }

    #[test]
    fn test_unmatched_ids_are_ignored() {
        let stations = stations(&["A"]);
        let trips = vec![trip("A", "ZZ"), trip("ZZ", "YY"), trip("", "A")];

        let result = compute_station_traffic(&stations, &trips);

        assert_eq!(result[0].departures, 1);
        assert_eq!(result[0].arrivals, 1);
    }

    #[test]
    fn test_sums_match_matched_trip_counts() {
        let stations = stations(&["A", "B", "C"]);
        let trips = vec![
            trip("A", "B"),
            trip("B", "C"),
            trip("C", "X"),
            trip("X", "A"),
            trip("B", "B"),
        ];

        let result = compute_station_traffic(&stations, &trips);

        let known = |id: &str| stations.iter().any(|s| s.short_name == id);
        let matched_starts = trips.iter().filter(|t| known(&t.start_station_id)).count();
        let matched_ends = trips.iter().filter(|t| known(&t.end_station_id)).count();

        assert_eq!(result.iter().map(|s| s.departures).sum::<usize>(), matched_starts);
        assert_eq!(result.iter().map(|s| s.arrivals).sum::<usize>(), matched_ends);
    }

    #[test]
    fn test_preserves_station_order() {
        let stations = stations(&["C", "A", "B"]);
        let result = compute_station_traffic(&stations, &vec![trip("A", "B")]);
        let order: Vec<_> = result.iter().map(|s| s.short_name()).collect();
        assert_eq!(order, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_repeated_calls_are_identical_and_inputs_untouched() {
        let stations = stations(&["A", "B"]);
        let trips = vec![trip("A", "B"), trip("B", "A"), trip("A", "A")];
        let stations_before = stations.clone();
        let trips_before = trips.clone();

        let first = compute_station_traffic(&stations, &trips);
        let second = compute_station_traffic(&stations, &trips);

        assert_eq!(first, second);
        assert_eq!(stations, stations_before);
        assert_eq!(trips, trips_before);
    }
}
