use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::view::WebMercator;

pub const DEFAULT_STATIONS_SOURCE: &str =
    "https://dsc106.com/labs/lab07/data/bluebikes-stations.json";
pub const DEFAULT_TRIPS_SOURCE: &str =
    "https://dsc106.com/labs/lab07/data/bluebikes-traffic-2024-03.csv";

/// Where the data comes from and how the map is framed.
///
/// Stored as JSON on disk; every field is optional:
/// ```json
/// {
///   "stations_source": "data/stations.json",
///   "trips_source": "data/trips.csv.gz",
///   "map": { "center": [-71.09415, 42.36027], "zoom": 12 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub stations_source: String,
    pub trips_source: String,
    pub map: MapConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// `[lon, lat]`
    pub center: (f64, f64),
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            stations_source: DEFAULT_STATIONS_SOURCE.to_string(),
            trips_source: DEFAULT_TRIPS_SOURCE.to_string(),
            map: MapConfig::default(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: (-71.09415, 42.36027),
            zoom: 12.0,
            min_zoom: 5.0,
            max_zoom: 18.0,
            width: 800.0,
            height: 600.0,
        }
    }
}

impl AppConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {path}"))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config {path}"))?;
        config.map.validate()?;
        Ok(config)
    }

    /// Applies `STATIONS_SOURCE` and `TRIPS_SOURCE` from the environment.
    pub fn with_env(self) -> Self {
        self.with_overrides(
            std::env::var("STATIONS_SOURCE").ok(),
            std::env::var("TRIPS_SOURCE").ok(),
        )
    }

    pub fn with_overrides(mut self, stations: Option<String>, trips: Option<String>) -> Self {
        if let Some(stations) = stations {
            self.stations_source = stations;
        }
        if let Some(trips) = trips {
            self.trips_source = trips;
        }
        self
    }
}

impl MapConfig {
    /// Rejects zoom bounds that are inverted or not numbers.
    pub fn validate(&self) -> Result<()> {
        if self.min_zoom.is_nan() || self.max_zoom.is_nan() || self.min_zoom > self.max_zoom {
            bail!(
                "map min_zoom {} must not exceed max_zoom {}",
                self.min_zoom,
                self.max_zoom
            );
        }
        Ok(())
    }

    pub fn viewport(&self) -> Result<WebMercator> {
        self.validate()?;
        Ok(WebMercator::new(
            self.center,
            self.zoom,
            (self.width, self.height),
            (self.min_zoom, self.max_zoom),
        ))
    }
}

/// Parses a `LON,LAT` pair as given on the command line.
pub fn parse_center(raw: &str) -> Result<(f64, f64), String> {
    let (lon, lat) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected LON,LAT, got {raw:?}"))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude {lon:?}"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude {lat:?}"))?;
    if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
        return Err(format!("center {lon},{lat} is off the map"));
    }
    Ok((lon, lat))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.stations_source, DEFAULT_STATIONS_SOURCE);
        assert_eq!(config.map.zoom, 12.0);
        assert_eq!(config.map.viewport().unwrap().size(), (800.0, 600.0));
    }

    #[test]
    fn test_partial_file() {
        let path = format!("{}/station_traffic_config_test.json", env::temp_dir().display());
        fs::write(
            &path,
            r#"{"trips_source":"local.csv","map":{"zoom":14,"width":1024}}"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.trips_source, "local.csv");
        assert_eq!(config.stations_source, DEFAULT_STATIONS_SOURCE);
        assert_eq!(config.map.zoom, 14.0);
        assert_eq!(config.map.width, 1024.0);
        assert_eq!(config.map.height, 600.0);
    }

    #[test]
    fn test_missing_file() {
        let err = AppConfig::load("/nonexistent/station_traffic.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/station_traffic.json"));
    }

    #[test]
    fn test_malformed_file_names_path() {
        let path = format!("{}/station_traffic_config_bad.json", env::temp_dir().display());
        fs::write(&path, "{\"map\": [").unwrap();

        let err = AppConfig::load(&path).unwrap_err();
        fs::remove_file(&path).unwrap();

        assert!(err.to_string().contains("failed to parse config"));
        assert!(err.to_string().contains(&path));
    }

    #[test]
    fn test_inverted_zoom_bounds() {
        let path = format!("{}/station_traffic_config_zoom.json", env::temp_dir().display());
        fs::write(&path, r#"{"map":{"min_zoom":18,"max_zoom":5}}"#).unwrap();

        let loaded = AppConfig::load(&path);
        fs::remove_file(&path).unwrap();
        assert!(loaded.is_err());

        let mut config = AppConfig::default();
        config.map.min_zoom = 18.0;
        config.map.max_zoom = 5.0;
        let err = config.map.viewport().unwrap_err();
        assert!(err.to_string().contains("min_zoom"));
    }

    #[test]
    fn test_parse_center() {
        assert_eq!(parse_center("-71.05,42.38"), Ok((-71.05, 42.38)));
        assert_eq!(parse_center(" -71.05 , 42.38 "), Ok((-71.05, 42.38)));
        assert!(parse_center("-71.05").is_err());
        assert!(parse_center("west,north").is_err());
        assert!(parse_center("200,10").is_err());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::default().with_overrides(Some("s.json".into()), None);
        assert_eq!(config.stations_source, "s.json");
        assert_eq!(config.trips_source, DEFAULT_TRIPS_SOURCE);
    }
}
