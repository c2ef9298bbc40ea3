//! CSV ingestion for cleaned trip data and the taxi zone lookup.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;

use crate::dataset::{Trip, Zone};

/// Reads cleaned trip rows from a CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a row does not match
/// the cleaned trip shape. Cleaning happens upstream; a malformed row here
/// means the wrong file was supplied.
pub fn read_trips(path: &str) -> Result<Vec<Trip>> {
    let file = File::open(path).with_context(|| format!("opening trips CSV {path}"))?;
    parse_trips(file)
}

/// Reads the zone lookup table from a CSV file.
pub fn read_zones(path: &str) -> Result<Vec<Zone>> {
    let file = File::open(path).with_context(|| format!("opening zones CSV {path}"))?;
    parse_zones(file)
}

/// Deserializes cleaned trip rows from any reader.
pub fn parse_trips<R: Read>(reader: R) -> Result<Vec<Trip>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut trips = Vec::new();

    for result in rdr.deserialize() {
        let record: Trip = result?;
        trips.push(record);
    }

    Ok(trips)
}

/// Deserializes zone lookup rows from any reader.
pub fn parse_zones<R: Read>(reader: R) -> Result<Vec<Zone>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut zones = Vec::new();

    for result in rdr.deserialize() {
        let record: Zone = result?;
        zones.push(record);
    }

    Ok(zones)
}
