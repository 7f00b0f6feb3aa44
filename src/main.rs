//! CLI entry point for the station traffic tool.
//!
//! Loads a bike-share station feed and a trip table, then reports per-station
//! traffic for a time of day, emits the circles a map would draw, or sweeps
//! the time slider across the day.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use station_traffic::{
    config::{AppConfig, parse_center},
    fetch::{BasicClient, load_source},
    output::{print_json, print_pretty, write_stations_csv},
    parser::{parse_stations, parse_trip_bytes},
    traffic::{MINUTES_PER_DAY, TimeFilter, format_time},
    view::{TrafficView, WebMercator},
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "station_traffic")]
#[command(about = "Bike-share station traffic by time of day", long_about = None)]
struct Cli {
    /// JSON config file with data sources and map framing
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Station feed path or URL (overrides config and STATIONS_SOURCE)
    #[arg(long, global = true)]
    stations: Option<String>,

    /// Trip CSV path or URL, optionally gzipped (overrides config and TRIPS_SOURCE)
    #[arg(long, global = true)]
    trips: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-station arrivals, departures and totals
    Traffic {
        /// "any", minutes since midnight, or HH:MM
        #[arg(short, long, default_value = "any")]
        time: TimeFilter,

        /// CSV file to write results to
        #[arg(short, long)]
        output: Option<String>,

        /// Log results as JSON instead of debug output
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Station circles (pixel position, radius, tooltip) as JSON on stdout
    Frame {
        /// "any", minutes since midnight, or HH:MM
        #[arg(short, long, default_value = "any")]
        time: TimeFilter,

        /// Map center as LON,LAT (defaults to the configured center)
        #[arg(long, value_name = "LON,LAT", value_parser = parse_center, allow_hyphen_values = true)]
        center: Option<(f64, f64)>,

        /// Map zoom level (clamped to the configured bounds)
        #[arg(short, long)]
        zoom: Option<f64>,

        /// Viewport width in pixels
        #[arg(long)]
        width: Option<f64>,

        /// Viewport height in pixels
        #[arg(long)]
        height: Option<f64>,
    },
    /// Move the time slider across the day and report each step
    Sweep {
        /// Minutes between slider positions
        #[arg(short, long, default_value_t = 60)]
        step: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/station_traffic.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("station_traffic.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    }
    .with_env()
    .with_overrides(cli.stations, cli.trips);

    let mut viewport = config.map.viewport()?;

    match cli.command {
        Commands::Traffic { time, output, json } => {
            let mut view = load_view(&config, viewport).await?;
            let stations = view.apply_filter(time);

            if let Some(path) = output {
                write_stations_csv(&path, stations)?;
                info!(path = %path, rows = stations.len(), "Station traffic written");
            } else if json {
                print_json(stations)?;
            } else {
                print_pretty(stations);
            }

            let summary = view.summary();
            info!(
                filter = %time,
                active_trips = view.active_trip_count(),
                stations = summary.stations,
                departures = summary.departures,
                arrivals = summary.arrivals,
                busiest = summary.busiest_station.as_deref().unwrap_or("-"),
                max_total_traffic = summary.max_total_traffic,
                "Station traffic summary"
            );
            if json {
                print_json(&summary)?;
            }
        }
        Commands::Frame {
            time,
            center,
            zoom,
            width,
            height,
        } => {
            if let Some((lon, lat)) = center {
                viewport.set_center(lon, lat);
            }
            if let Some(zoom) = zoom {
                viewport.set_zoom(zoom);
            }
            let (w, h) = viewport.size();
            viewport.resize(width.unwrap_or(w), height.unwrap_or(h));

            let mut view = load_view(&config, viewport).await?;
            view.apply_filter(time);
            let markers = view.markers();

            info!(
                filter = %time,
                label = view.time_label().as_deref().unwrap_or("(any time)"),
                markers = markers.len(),
                center = ?view.projector().center(),
                zoom = view.projector().zoom(),
                "Frame rendered"
            );
            println!("{}", serde_json::to_string_pretty(&markers)?);
        }
        Commands::Sweep { step } => {
            if step == 0 {
                bail!("sweep step must be at least one minute");
            }
            let mut view = load_view(&config, viewport).await?;
            sweep(&mut view, step)?;
        }
    }

    Ok(())
}

/// Loads stations and trips concurrently and builds the view around them.
#[tracing::instrument(skip_all, fields(stations = %config.stations_source, trips = %config.trips_source))]
async fn load_view(config: &AppConfig, viewport: WebMercator) -> Result<TrafficView<WebMercator>> {
    let client = BasicClient::new();

    let (station_bytes, trip_bytes) = tokio::try_join!(
        load_source(&client, &config.stations_source),
        load_source(&client, &config.trips_source),
    )?;

    let stations = parse_stations(&station_bytes)?;
    let trips = parse_trip_bytes(&trip_bytes)?;

    if stations.is_empty() {
        warn!("Station feed is empty");
    }
    info!(
        stations = stations.len(),
        trips = trips.len(),
        "Data loaded"
    );

    Ok(TrafficView::new(stations, trips, viewport))
}

/// Steps the slider from midnight in `step`-minute increments, logging the
/// active trip count and busiest station at each position.
#[tracing::instrument(skip(view))]
fn sweep(view: &mut TrafficView<WebMercator>, step: u16) -> Result<()> {
    for minute in (0..MINUTES_PER_DAY).step_by(step as usize) {
        view.on_state_change(minute as i32)?;
        let summary = view.summary();

        info!(
            time = %format_time(minute),
            active_trips = view.active_trip_count(),
            busiest = summary.busiest_station.as_deref().unwrap_or("-"),
            max_total_traffic = summary.max_total_traffic,
            "Slider position"
        );
    }

    view.on_state_change(TimeFilter::Any.slider_value())?;
    info!(
        active_trips = view.active_trip_count(),
        "Sweep finished, filter reset"
    );
    Ok(())
}
