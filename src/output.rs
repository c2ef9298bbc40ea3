//! Output formatting and persistence for ranking results.
//!
//! Supports pretty-printing, JSON serialization, CSV append, and the
//! plain-text ranking report.

use anyhow::Result;
use tracing::{debug, info};

use crate::ranking::types::RankedZone;
use crate::stats::SummaryStats;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Logs summary statistics using Rust's debug pretty-print format.
pub fn print_pretty(stats: &SummaryStats) {
    debug!("{:#?}", stats);
}

/// Logs summary statistics as pretty-printed JSON.
pub fn print_json(stats: &SummaryStats) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(stats)?);
    Ok(())
}

/// Logs the top-N ranking table.
pub fn print_ranking(ranked: &[RankedZone], top_n: usize) {
    for z in ranked.iter().take(top_n) {
        info!(
            rank = z.rank,
            zone = %z.zone,
            borough = %z.borough,
            score = z.score,
            trips = z.trip_count,
            "Ranked zone"
        );
    }
}

/// Appends a [`RankedZone`] record as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, zone: &RankedZone) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(zone)?;
    writer.flush()?;

    Ok(())
}

/// Writes the full ranking as a plain-text report.
pub fn write_report(path: &str, ranked: &[RankedZone]) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = std::fs::File::create(path)?;

    writeln!(file, "NYC TAXI ZONE MOBILITY RANKING")?;
    writeln!(file, "ALGORITHM: in-house insertion sort, descending by score")?;
    writeln!(
        file,
        "SCORE: trip_count / 1000 + avg_fare * 0.5 + avg_distance * 2"
    )?;
    writeln!(file)?;
    writeln!(
        file,
        "{:<6} {:<40} {:<15} {:<10} {:<12}",
        "Rank", "Zone", "Borough", "Score", "Trips"
    )?;
    writeln!(file, "{}", "-".repeat(90))?;

    for z in ranked {
        // Truncate on char boundaries, zone names are not always ASCII
        let zone: String = z.zone.chars().take(39).collect();
        writeln!(
            file,
            "{:<6} {:<40} {:<15} {:<10} {:<12}",
            z.rank, zone, z.borough, z.score, z.trip_count
        )?;
    }

    info!(path, zones = ranked.len(), "Ranking report written");
    Ok(())
}
