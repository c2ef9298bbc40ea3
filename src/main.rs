//! CLI entry point for the NYC Taxi Explorer backend.
//!
//! Provides subcommands for loading the cleaned dataset into SQLite,
//! running the zone mobility ranking, and serving the JSON API.

use anyhow::Result;
use clap::{Parser, Subcommand};
use nyc_taxi_explorer::api::routes::create_router;
use nyc_taxi_explorer::dataset::Dataset;
use nyc_taxi_explorer::output::{print_ranking, write_report};
use nyc_taxi_explorer::ranking::rank_zones;
use nyc_taxi_explorer::stats::SummaryStats;
use nyc_taxi_explorer::store::Store;
use nyc_taxi_explorer::{output, parser};
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "nyc_taxi_explorer")]
#[command(about = "Aggregate, rank, and serve NYC taxi zone statistics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load cleaned trip and zone CSVs into the SQLite store
    Load {
        /// Cleaned trips CSV produced by the upstream cleaning step
        #[arg(short, long, default_value = "data/cleaned/trips_clean.csv")]
        trips: String,

        /// Zone lookup CSV
        #[arg(short, long, default_value = "data/cleaned/zones_clean.csv")]
        zones: String,

        /// Database file to (re)create
        #[arg(long, default_value = "data/nyc_taxi.db")]
        db: String,
    },
    /// Rank zones by mobility score
    Rank {
        /// Database file to read
        #[arg(long, default_value = "data/nyc_taxi.db")]
        db: String,

        /// How many top zones to log
        #[arg(short = 'n', long, default_value_t = 15)]
        top: usize,

        /// Optional plain-text report path
        #[arg(short, long)]
        output: Option<String>,

        /// Optional CSV file to append the ranking to
        #[arg(long)]
        csv: Option<String>,
    },
    /// Serve the JSON API over the loaded dataset
    Serve {
        /// Database file to read
        #[arg(long, default_value = "data/nyc_taxi.db")]
        db: String,

        /// Listen address
        #[arg(short, long, default_value = "0.0.0.0:5000")]
        addr: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/nyc_taxi_explorer.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("nyc_taxi_explorer.log"));

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

    match cli.command {
        Commands::Load { trips, zones, db } => load(&trips, &zones, &db)?,
        Commands::Rank {
            db,
            top,
            output,
            csv,
        } => rank(&db, top, output.as_deref(), csv.as_deref())?,
        Commands::Serve { db, addr } => serve(&db, &addr).await?,
    }

    Ok(())
}

/// Parses the cleaned CSVs, rebuilds the SQLite store, and persists the
/// summary stats snapshot.
#[tracing::instrument(skip_all, fields(trips_csv = %trips_csv, db = %db_path))]
fn load(trips_csv: &str, zones_csv: &str, db_path: &str) -> Result<()> {
    let trips = parser::read_trips(trips_csv)?;
    info!(trips = trips.len(), "Cleaned trips parsed");

    let zones = parser::read_zones(zones_csv)?;
    info!(zones = zones.len(), "Zone lookup parsed");

    let mut store = Store::create(db_path)?;
    store.insert_zones(&zones)?;
    let inserted = store.insert_trips(&trips)?;
    store.create_indexes()?;
    info!(inserted, "Trips loaded into store");

    let dataset = Dataset::new(trips, zones);
    let summary = SummaryStats::from_dataset(&dataset);
    output::print_pretty(&summary);
    output::print_json(&summary)?;
    store.write_summary(&summary)?;

    info!(db = db_path, "Load complete");
    Ok(())
}

/// Runs the aggregate -> score -> sort pipeline and reports the result.
#[tracing::instrument(skip_all, fields(db = %db_path, top))]
fn rank(
    db_path: &str,
    top: usize,
    report_path: Option<&str>,
    csv_path: Option<&str>,
) -> Result<()> {
    let store = Store::open(db_path)?;
    let dataset = Dataset::from_store(&store)?;
    info!(trips = dataset.trips().len(), "Dataset loaded");

    let ranked = rank_zones(&dataset);
    info!(zones = ranked.len(), "Zones ranked by mobility score");

    print_ranking(&ranked, top);

    if let Some(path) = report_path {
        write_report(path, &ranked)?;
    }

    if let Some(path) = csv_path {
        for zone in &ranked {
            output::append_record(path, zone)?;
        }
        info!(path, zones = ranked.len(), "Ranking appended to CSV");
    }

    Ok(())
}

/// Loads the dataset snapshot and serves the JSON API until interrupted.
async fn serve(db_path: &str, addr: &str) -> Result<()> {
    let store = Store::open(db_path)?;
    let dataset = Arc::new(Dataset::from_store(&store)?);
    info!(
        trips = dataset.trips().len(),
        zones = dataset.zones().len(),
        "Dataset snapshot loaded"
    );

    let router = create_router(dataset);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr, "API server listening");

    axum::serve(listener, router).await?;
    Ok(())
}
