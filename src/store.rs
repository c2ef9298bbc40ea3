//! SQLite persistence for cleaned trips, the zone lookup, and the
//! precomputed summary stats.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::Connection;
use tracing::{debug, info};

use crate::dataset::{Trip, Zone};
use crate::stats::SummaryStats;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const INSERT_BATCH_SIZE: usize = 50_000;

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens a database file, wiping any previous contents and creating a
    /// fresh schema.
    pub fn create(path: &str) -> Result<Self> {
        if std::path::Path::new(path).exists() {
            std::fs::remove_file(path).with_context(|| format!("removing old database {path}"))?;
            debug!(path, "Removed old database");
        }
        let conn = Connection::open(path).with_context(|| format!("creating database {path}"))?;
        let store = Store { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Opens an existing database file.
    pub fn open(path: &str) -> Result<Self> {
        anyhow::ensure!(
            std::path::Path::new(path).exists(),
            "database not found at {path}, run the load subcommand first"
        );
        let conn = Connection::open(path).with_context(|| format!("opening database {path}"))?;
        Ok(Store { conn })
    }

    /// In-memory database, used by tests.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Store { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS zones (
                location_id  INTEGER PRIMARY KEY,
                borough      TEXT NOT NULL,
                zone         TEXT NOT NULL,
                service_zone TEXT
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS trips (
                id                  INTEGER PRIMARY KEY AUTOINCREMENT,
                pickup_datetime     TEXT NOT NULL,
                pickup_location_id  INTEGER NOT NULL,
                dropoff_location_id INTEGER NOT NULL,
                fare_amount         REAL NOT NULL,
                trip_distance       REAL NOT NULL,
                trip_duration_mins  REAL NOT NULL,
                FOREIGN KEY (pickup_location_id)  REFERENCES zones(location_id),
                FOREIGN KEY (dropoff_location_id) REFERENCES zones(location_id)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS summary_stats (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                stat_name  TEXT NOT NULL,
                stat_value TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    pub fn insert_zones(&mut self, zones: &[Zone]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO zones (location_id, borough, zone, service_zone)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for z in zones {
                stmt.execute((z.location_id, &z.borough, &z.zone, &z.service_zone))?;
            }
        }
        tx.commit()?;
        Ok(zones.len())
    }

    /// Inserts trips in batched transactions so a full month of data does
    /// not sit in one transaction.
    pub fn insert_trips(&mut self, trips: &[Trip]) -> Result<usize> {
        let mut inserted = 0;

        for batch in trips.chunks(INSERT_BATCH_SIZE) {
            let tx = self.conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO trips (pickup_datetime, pickup_location_id,
                        dropoff_location_id, fare_amount, trip_distance, trip_duration_mins)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                )?;
                for t in batch {
                    stmt.execute((
                        t.pickup_datetime.format(TIMESTAMP_FORMAT).to_string(),
                        t.pickup_location_id,
                        t.dropoff_location_id,
                        t.fare_amount,
                        t.trip_distance,
                        t.trip_duration_mins,
                    ))?;
                }
            }
            tx.commit()?;
            inserted += batch.len();
            debug!(inserted, total = trips.len(), "Trip batch committed");
        }

        Ok(inserted)
    }

    pub fn create_indexes(&self) -> Result<()> {
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_pickup_location ON trips(pickup_location_id)",
            [],
        )?;
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_dropoff_location ON trips(dropoff_location_id)",
            [],
        )?;
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_pickup_datetime ON trips(pickup_datetime)",
            [],
        )?;
        Ok(())
    }

    /// Writes the precomputed summary as name/value rows, replacing any
    /// previous snapshot.
    pub fn write_summary(&mut self, stats: &SummaryStats) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();
        let rows = [
            ("total_trips", stats.total_trips.to_string()),
            ("avg_fare", stats.avg_fare.to_string()),
            ("avg_distance", stats.avg_distance.to_string()),
            ("avg_duration_mins", stats.avg_duration_mins.to_string()),
            ("avg_speed_mph", stats.avg_speed_mph.to_string()),
            (
                "top_pickup_borough",
                stats.top_borough.clone().unwrap_or_default(),
            ),
            (
                "peak_hour",
                stats.peak_hour.map(|h| h.to_string()).unwrap_or_default(),
            ),
        ];

        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM summary_stats", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO summary_stats (stat_name, stat_value, created_at)
                 VALUES (?1, ?2, ?3)",
            )?;
            for (name, value) in &rows {
                stmt.execute((name, value, &now))?;
            }
        }
        tx.commit()?;

        info!(rows = rows.len(), "Summary stats written");
        Ok(())
    }

    pub fn load_zones(&self) -> Result<Vec<Zone>> {
        let mut stmt = self.conn.prepare(
            "SELECT location_id, borough, zone, service_zone FROM zones ORDER BY location_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Zone {
                location_id: row.get(0)?,
                borough: row.get(1)?,
                zone: row.get(2)?,
                service_zone: row.get(3)?,
            })
        })?;

        let mut zones = Vec::new();
        for row in rows {
            zones.push(row?);
        }
        Ok(zones)
    }

    pub fn load_trips(&self) -> Result<Vec<Trip>> {
        let mut stmt = self.conn.prepare(
            "SELECT pickup_datetime, pickup_location_id, dropoff_location_id,
                    fare_amount, trip_distance, trip_duration_mins
             FROM trips ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            let raw: String = row.get(0)?;
            let pickup_datetime =
                NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        0,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?;
            Ok(Trip {
                pickup_datetime,
                pickup_location_id: row.get(1)?,
                dropoff_location_id: row.get(2)?,
                fare_amount: row.get(3)?,
                trip_distance: row.get(4)?,
                trip_duration_mins: row.get(5)?,
            })
        })?;

        let mut trips = Vec::new();
        for row in rows {
            trips.push(row?);
        }
        Ok(trips)
    }

    pub fn trip_count(&self) -> Result<u64> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM trips", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl crate::dataset::Dataset {
    /// Loads the full snapshot back out of the store.
    pub fn from_store(store: &Store) -> Result<Self> {
        let trips = store.load_trips()?;
        let zones = store.load_zones()?;
        Ok(crate::dataset::Dataset::new(trips, zones))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use chrono::NaiveDate;

    fn trip(zone_id: u32) -> Trip {
        Trip {
            pickup_datetime: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(8, 15, 30)
                .unwrap(),
            pickup_location_id: zone_id,
            dropoff_location_id: 4,
            fare_amount: 12.5,
            trip_distance: 2.4,
            trip_duration_mins: 11.0,
        }
    }

    #[test]
    fn test_roundtrip_trips_and_zones() {
        let mut store = Store::in_memory().unwrap();

        let zones = vec![Zone {
            location_id: 7,
            borough: "Queens".to_string(),
            zone: "Astoria".to_string(),
            service_zone: Some("Boro Zone".to_string()),
        }];
        store.insert_zones(&zones).unwrap();
        store.insert_trips(&[trip(7), trip(7)]).unwrap();
        store.create_indexes().unwrap();

        assert_eq!(store.trip_count().unwrap(), 2);

        let loaded_trips = store.load_trips().unwrap();
        assert_eq!(loaded_trips.len(), 2);
        assert_eq!(loaded_trips[0].pickup_location_id, 7);
        assert_eq!(loaded_trips[0].fare_amount, 12.5);
        assert_eq!(
            loaded_trips[0].pickup_datetime,
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(8, 15, 30)
                .unwrap()
        );

        let loaded_zones = store.load_zones().unwrap();
        assert_eq!(loaded_zones.len(), 1);
        assert_eq!(loaded_zones[0].service_zone.as_deref(), Some("Boro Zone"));
    }

    #[test]
    fn test_dataset_from_store() {
        let mut store = Store::in_memory().unwrap();
        store
            .insert_zones(&[Zone {
                location_id: 7,
                borough: "Queens".to_string(),
                zone: "Astoria".to_string(),
                service_zone: None,
            }])
            .unwrap();
        store.insert_trips(&[trip(7)]).unwrap();

        let dataset = Dataset::from_store(&store).unwrap();
        assert_eq!(dataset.trips().len(), 1);
        assert_eq!(dataset.borough(7), "Queens");
    }

    #[test]
    fn test_write_summary_replaces_previous() {
        let mut store = Store::in_memory().unwrap();
        let stats = SummaryStats {
            total_trips: 2,
            avg_fare: 12.5,
            ..Default::default()
        };

        store.write_summary(&stats).unwrap();
        store.write_summary(&stats).unwrap();

        let count: u64 = store
            .conn
            .query_row("SELECT COUNT(*) FROM summary_stats", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 7);
    }

    #[test]
    fn test_empty_store_loads_empty_dataset() {
        let store = Store::in_memory().unwrap();
        let dataset = Dataset::from_store(&store).unwrap();
        assert!(dataset.is_empty());
    }
}
