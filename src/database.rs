//! SQLite persistence for plant care records
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Import rows from the legacy single-table `plants` schema
//! - 1.0.0: `care_records` / `care_metrics` tables behind the `CareStore` trait

use async_trait::async_trait;
use log::{debug, info, warn};
use sqlite::{Connection, State};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::core::CareResult;
use crate::features::care::catalog::{MetricCatalog, FERTILIZER, WATER};
use crate::features::care::record::{CareRecord, MetricState};
use crate::features::care::store::CareStore;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS care_records (
        thread_id INTEGER PRIMARY KEY,
        created_at INTEGER NOT NULL
    );
    CREATE TABLE IF NOT EXISTS care_metrics (
        thread_id INTEGER NOT NULL REFERENCES care_records(thread_id),
        metric TEXT NOT NULL,
        interval_seconds INTEGER NOT NULL CHECK (interval_seconds > 0),
        last_action_time INTEGER,
        reminded INTEGER NOT NULL DEFAULT 0,
        PRIMARY KEY (thread_id, metric)
    );
";

#[derive(Clone)]
pub struct Database {
    connection: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database at `path` and apply the schema
    ///
    /// `":memory:"` gives a private in-memory database.
    pub async fn new<P: AsRef<Path>>(path: P) -> CareResult<Self> {
        let connection = sqlite::open(path.as_ref())?;
        connection.execute("PRAGMA journal_mode = WAL; PRAGMA synchronous = FULL;")?;
        connection.execute(SCHEMA)?;

        debug!("Database opened at {}", path.as_ref().display());

        Ok(Database {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Copy rows from the legacy `plants` table into the care tables
    ///
    /// Accepts both the water-only table and the one with fertilizer columns.
    /// Threads that already have a care record are left alone, so running
    /// this on every startup is safe. Returns the number of imported threads.
    pub async fn import_legacy_plants(&self, catalog: &MetricCatalog) -> CareResult<usize> {
        let conn = self.connection.lock().await;

        if !table_exists(&conn, "plants")? {
            return Ok(0);
        }

        let columns = table_columns(&conn, "plants")?;
        let has_fertilizer = ["interval_fertilizer", "last_fertilized", "reminded_fertilizer"]
            .iter()
            .all(|col| columns.iter().any(|c| c == col));

        let query = if has_fertilizer {
            "SELECT thread_id, interval_days, last_watered, reminded_water,
                    interval_fertilizer, last_fertilized, reminded_fertilizer
             FROM plants
             WHERE thread_id NOT IN (SELECT thread_id FROM care_records)"
        } else {
            "SELECT thread_id, interval_days, last_watered, reminded_water
             FROM plants
             WHERE thread_id NOT IN (SELECT thread_id FROM care_records)"
        };

        let day_seconds = catalog.day_seconds();
        let mut records = Vec::new();
        {
            let mut statement = conn.prepare(query)?;
            while let State::Row = statement.next()? {
                let thread_id = statement.read::<i64, _>(0)? as u64;
                let mut record = CareRecord::new(thread_id);

                record.metrics.insert(
                    WATER.to_string(),
                    legacy_metric(
                        statement.read::<Option<i64>, _>(1)?,
                        statement.read::<Option<i64>, _>(2)?,
                        statement.read::<Option<i64>, _>(3)?,
                        catalog.default_interval_seconds(WATER),
                        day_seconds,
                    ),
                );

                if has_fertilizer {
                    record.metrics.insert(
                        FERTILIZER.to_string(),
                        legacy_metric(
                            statement.read::<Option<i64>, _>(4)?,
                            statement.read::<Option<i64>, _>(5)?,
                            statement.read::<Option<i64>, _>(6)?,
                            catalog.default_interval_seconds(FERTILIZER),
                            day_seconds,
                        ),
                    );
                }

                records.push(record);
            }
        }

        if records.is_empty() {
            return Ok(0);
        }

        let now = chrono::Utc::now().timestamp();
        in_transaction(&conn, |conn| {
            for record in &records {
                write_record(conn, record, now)?;
            }
            Ok(())
        })?;

        info!(
            "Imported {} plant(s) from legacy table ({})",
            records.len(),
            if has_fertilizer {
                "water + fertilizer"
            } else {
                "water only"
            }
        );

        Ok(records.len())
    }
}

#[async_trait]
impl CareStore for Database {
    async fn get(&self, thread_id: u64) -> CareResult<Option<CareRecord>> {
        let conn = self.connection.lock().await;
        Ok(read_record(&conn, thread_id)?)
    }

    async fn upsert(&self, record: &CareRecord) -> CareResult<()> {
        let conn = self.connection.lock().await;
        let now = chrono::Utc::now().timestamp();
        in_transaction(&conn, |conn| write_record(conn, record, now))?;
        Ok(())
    }

    async fn list_all(&self) -> CareResult<Vec<CareRecord>> {
        let conn = self.connection.lock().await;
        let mut records: BTreeMap<u64, CareRecord> = BTreeMap::new();

        let mut statement = conn.prepare(
            "SELECT r.thread_id, m.metric, m.interval_seconds, m.last_action_time, m.reminded
             FROM care_records r
             LEFT JOIN care_metrics m ON m.thread_id = r.thread_id
             ORDER BY r.thread_id",
        )?;

        while let State::Row = statement.next()? {
            let thread_id = statement.read::<i64, _>(0)? as u64;
            let record = records
                .entry(thread_id)
                .or_insert_with(|| CareRecord::new(thread_id));

            if let Some(metric) = statement.read::<Option<String>, _>(1)? {
                record.metrics.insert(
                    metric,
                    MetricState {
                        interval_seconds: statement.read::<i64, _>(2)?,
                        last_action_time: statement.read::<Option<i64>, _>(3)?,
                        reminded: statement.read::<i64, _>(4)? != 0,
                    },
                );
            }
        }

        Ok(records.into_values().collect())
    }
}

fn legacy_metric(
    interval_days: Option<i64>,
    last_action_time: Option<i64>,
    reminded: Option<i64>,
    default_interval_seconds: i64,
    day_seconds: i64,
) -> MetricState {
    let interval_seconds = match interval_days {
        Some(days) if days > 0 => days.saturating_mul(day_seconds),
        Some(days) => {
            warn!("Legacy interval of {days} days replaced by the default");
            default_interval_seconds
        }
        None => default_interval_seconds,
    };

    MetricState {
        interval_seconds,
        last_action_time,
        reminded: last_action_time.is_some() && reminded.unwrap_or(0) != 0,
    }
}

fn in_transaction<F>(conn: &Connection, body: F) -> sqlite::Result<()>
where
    F: FnOnce(&Connection) -> sqlite::Result<()>,
{
    conn.execute("BEGIN IMMEDIATE")?;
    match body(conn).and_then(|_| conn.execute("COMMIT")) {
        Ok(()) => Ok(()),
        Err(e) => {
            if let Err(rollback) = conn.execute("ROLLBACK") {
                warn!("Rollback failed: {rollback}");
            }
            Err(e)
        }
    }
}

fn write_record(conn: &Connection, record: &CareRecord, now: i64) -> sqlite::Result<()> {
    let thread_id = record.thread_id as i64;

    let mut statement = conn.prepare(
        "INSERT INTO care_records (thread_id, created_at) VALUES (?, ?)
         ON CONFLICT(thread_id) DO NOTHING",
    )?;
    statement.bind((1, thread_id))?;
    statement.bind((2, now))?;
    while let State::Row = statement.next()? {}

    for (metric, state) in &record.metrics {
        let mut statement = conn.prepare(
            "INSERT INTO care_metrics (thread_id, metric, interval_seconds, last_action_time, reminded)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(thread_id, metric) DO UPDATE SET
                interval_seconds = excluded.interval_seconds,
                last_action_time = excluded.last_action_time,
                reminded = excluded.reminded",
        )?;
        statement.bind((1, thread_id))?;
        statement.bind((2, metric.as_str()))?;
        statement.bind((3, state.interval_seconds))?;
        statement.bind((4, state.last_action_time))?;
        statement.bind((5, state.reminded as i64))?;
        while let State::Row = statement.next()? {}
    }

    Ok(())
}

fn read_record(conn: &Connection, thread_id: u64) -> sqlite::Result<Option<CareRecord>> {
    let mut statement = conn.prepare("SELECT 1 FROM care_records WHERE thread_id = ?")?;
    statement.bind((1, thread_id as i64))?;
    if let State::Done = statement.next()? {
        return Ok(None);
    }

    let mut record = CareRecord::new(thread_id);
    let mut statement = conn.prepare(
        "SELECT metric, interval_seconds, last_action_time, reminded
         FROM care_metrics WHERE thread_id = ?",
    )?;
    statement.bind((1, thread_id as i64))?;
    while let State::Row = statement.next()? {
        record.metrics.insert(
            statement.read::<String, _>(0)?,
            MetricState {
                interval_seconds: statement.read::<i64, _>(1)?,
                last_action_time: statement.read::<Option<i64>, _>(2)?,
                reminded: statement.read::<i64, _>(3)? != 0,
            },
        );
    }

    Ok(Some(record))
}

fn table_exists(conn: &Connection, table: &str) -> sqlite::Result<bool> {
    let mut statement =
        conn.prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?")?;
    statement.bind((1, table))?;
    Ok(matches!(statement.next()?, State::Row))
}

fn table_columns(conn: &Connection, table: &str) -> sqlite::Result<Vec<String>> {
    let mut statement = conn.prepare(format!("PRAGMA table_info({table})"))?;
    let mut columns = Vec::new();
    while let State::Row = statement.next()? {
        columns.push(statement.read::<String, _>("name")?);
    }
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 86_400;

    fn sample_record(thread_id: u64) -> CareRecord {
        let mut record = CareRecord::new(thread_id);
        record.metrics.insert(
            WATER.to_string(),
            MetricState {
                interval_seconds: 7 * DAY,
                last_action_time: Some(1_700_000_000),
                reminded: true,
            },
        );
        record
            .metrics
            .insert(FERTILIZER.to_string(), MetricState::new(30 * DAY));
        record
    }

    #[tokio::test]
    async fn test_get_missing_record() {
        let db = Database::new(":memory:").await.unwrap();
        assert!(db.get(1).await.unwrap().is_none());
        assert!(db.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_and_get() {
        let db = Database::new(":memory:").await.unwrap();
        let record = sample_record(1_234_567_890_123_456_789);

        db.upsert(&record).await.unwrap();
        let loaded = db.get(record.thread_id).await.unwrap().unwrap();

        assert_eq!(loaded, record);
    }

    #[tokio::test]
    async fn test_upsert_overwrites_metric_state() {
        let db = Database::new(":memory:").await.unwrap();
        let mut record = sample_record(7);
        db.upsert(&record).await.unwrap();

        let water = record.metrics.get_mut(WATER).unwrap();
        water.last_action_time = Some(1_800_000_000);
        water.reminded = false;
        db.upsert(&record).await.unwrap();

        let loaded = db.get(7).await.unwrap().unwrap();
        assert_eq!(loaded.metric(WATER).unwrap().last_action_time, Some(1_800_000_000));
        assert!(!loaded.metric(WATER).unwrap().reminded);
        assert_eq!(db.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_all_groups_metrics_per_record() {
        let db = Database::new(":memory:").await.unwrap();
        db.upsert(&sample_record(1)).await.unwrap();
        db.upsert(&sample_record(2)).await.unwrap();

        let all = db.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|r| r.metrics.len() == 2));
    }

    #[tokio::test]
    async fn test_rejects_non_positive_interval() {
        let db = Database::new(":memory:").await.unwrap();
        let mut record = CareRecord::new(3);
        record.metrics.insert(WATER.to_string(), MetricState::new(0));

        assert!(db.upsert(&record).await.is_err());
        // The failed transaction must not leave a half-written record behind
        assert!(db.get(3).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plants.db");

        {
            let db = Database::new(&path).await.unwrap();
            db.upsert(&sample_record(99)).await.unwrap();
        }

        let db = Database::new(&path).await.unwrap();
        assert_eq!(db.get(99).await.unwrap(), Some(sample_record(99)));
    }

    #[tokio::test]
    async fn test_import_legacy_full_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plants.db");

        {
            let legacy = sqlite::open(&path).unwrap();
            legacy
                .execute(
                    "CREATE TABLE plants (
                        thread_id INTEGER PRIMARY KEY,
                        interval_days INTEGER DEFAULT 7,
                        last_watered INTEGER,
                        reminded_water INTEGER DEFAULT 0,
                        interval_fertilizer INTEGER DEFAULT 30,
                        last_fertilized INTEGER,
                        reminded_fertilizer INTEGER DEFAULT 0
                    );
                    INSERT INTO plants VALUES (10, 3, 1000, 1, 30, NULL, 1);
                    INSERT INTO plants (thread_id, interval_days) VALUES (11, 5);",
                )
                .unwrap();
        }

        let db = Database::new(&path).await.unwrap();
        let catalog = MetricCatalog::standard(7, 30, 60);

        assert_eq!(db.import_legacy_plants(&catalog).await.unwrap(), 2);

        let plant = db.get(10).await.unwrap().unwrap();
        let water = plant.metric(WATER).unwrap();
        assert_eq!(water.interval_seconds, 3 * 60);
        assert_eq!(water.last_action_time, Some(1000));
        assert!(water.reminded);

        // reminded without a timestamp is not carried over
        let fertilizer = plant.metric(FERTILIZER).unwrap();
        assert_eq!(fertilizer.interval_seconds, 30 * 60);
        assert_eq!(fertilizer.last_action_time, None);
        assert!(!fertilizer.reminded);

        let untouched = db.get(11).await.unwrap().unwrap();
        assert_eq!(untouched.metric(WATER).unwrap().interval_seconds, 5 * 60);
        assert!(!untouched.is_tracked());

        // Second run is a no-op
        assert_eq!(db.import_legacy_plants(&catalog).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_import_legacy_water_only_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plants.db");

        {
            let legacy = sqlite::open(&path).unwrap();
            legacy
                .execute(
                    "CREATE TABLE plants (
                        thread_id INTEGER PRIMARY KEY,
                        interval_days INTEGER DEFAULT 7,
                        last_watered INTEGER,
                        reminded_water INTEGER DEFAULT 0
                    );
                    INSERT INTO plants VALUES (20, 0, 500, 0);",
                )
                .unwrap();
        }

        let db = Database::new(&path).await.unwrap();
        let catalog = MetricCatalog::standard(7, 30, DAY);
        assert_eq!(db.import_legacy_plants(&catalog).await.unwrap(), 1);

        let plant = db.get(20).await.unwrap().unwrap();
        assert!(plant.metric(FERTILIZER).is_none());
        assert_eq!(plant.metric(WATER).unwrap().interval_seconds, 7 * DAY);
    }

    #[tokio::test]
    async fn test_import_without_legacy_table() {
        let db = Database::new(":memory:").await.unwrap();
        let catalog = MetricCatalog::standard(7, 30, DAY);
        assert_eq!(db.import_legacy_plants(&catalog).await.unwrap(), 0);
    }
}
