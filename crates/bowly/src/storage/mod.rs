//! Storage layer for bowly.
//!
//! This module provides `SQLite`-based persistent storage for game records
//! and the bowler's target average.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::record::{GameRecord, NewGame, MAX_SCORE};

/// Metadata key holding the target average.
const TARGET_KEY: &str = "target_score";

/// Columns selected for every record query, in `row_to_record` order.
const RECORD_COLUMNS: &str = "id, date, score, strikes, spares, created_at";

/// What a [`Storage::remove`] call deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removed {
    /// A single record matched by id.
    Id(String),
    /// Every record on a date.
    Date {
        /// The date that was cleared.
        date: NaiveDate,
        /// Number of records deleted.
        count: usize,
    },
}

/// Storage engine for game records.
///
/// Records are kept in date order; several games may share a date and are
/// then ordered by creation time.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Store a new game and return its record.
    ///
    /// # Errors
    ///
    /// Returns an error if the game is out of range or the insert fails.
    pub fn add(&self, game: NewGame) -> Result<GameRecord> {
        game.validate()?;
        let record = GameRecord::new(game);
        self.insert(&record)?;
        info!(id = %record.id, date = %record.date, score = record.score, "game added");
        Ok(record)
    }

    /// Insert a record as-is.
    ///
    /// Returns `false` if a record with the same id already exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is out of range or the insert fails.
    pub fn insert(&self, record: &GameRecord) -> Result<bool> {
        record.validate()?;
        let affected = self.conn.execute(
            r"
            INSERT OR IGNORE INTO games (id, date, score, strikes, spares, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
            params![
                record.id,
                record.date.to_string(),
                record.score,
                record.strikes,
                record.spares,
                record.created_at.timestamp_millis(),
            ],
        )?;

        if affected == 0 {
            debug!(id = %record.id, "Skipping duplicate game record");
        }
        Ok(affected > 0)
    }

    /// Get a record by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get(&self, id: &str) -> Result<Option<GameRecord>> {
        let result = self
            .conn
            .query_row(
                &format!("SELECT {RECORD_COLUMNS} FROM games WHERE id = ?1"),
                [id],
                Self::row_to_record,
            )
            .optional()?;
        Ok(result)
    }

    /// All records, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list(&self) -> Result<Vec<GameRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM games ORDER BY date ASC, created_at ASC"
        ))?;

        let records = stmt
            .query_map([], Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// The most recent `limit` records, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn recent(&self, limit: usize) -> Result<Vec<GameRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            r"
            SELECT * FROM (
                SELECT {RECORD_COLUMNS} FROM games
                ORDER BY date DESC, created_at DESC LIMIT ?1
            ) ORDER BY date ASC, created_at ASC
            "
        ))?;

        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let records = stmt
            .query_map([limit_i64], Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Count stored records.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM games", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Remove a record by id, or every record on a date.
    ///
    /// `key` is tried as an id first. If no record has that id and `key`
    /// parses as a `YYYY-MM-DD` date, all records on that date are removed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordNotFound`] if nothing matched.
    pub fn remove(&self, key: &str) -> Result<Removed> {
        let affected = self.conn.execute("DELETE FROM games WHERE id = ?1", [key])?;
        if affected > 0 {
            info!(id = key, "game removed");
            return Ok(Removed::Id(key.to_string()));
        }

        if let Ok(date) = key.parse::<NaiveDate>() {
            let count = self
                .conn
                .execute("DELETE FROM games WHERE date = ?1", [date.to_string()])?;
            if count > 0 {
                info!(%date, count, "games removed by date");
                return Ok(Removed::Date { date, count });
            }
        }

        Err(Error::RecordNotFound(key.to_string()))
    }

    /// Delete every record. Returns the number deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn clear(&self) -> Result<usize> {
        let affected = self.conn.execute("DELETE FROM games", [])?;
        info!("Cleared {} game records", affected);
        Ok(affected)
    }

    /// The stored target average, or `default` if none was set.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn target(&self, default: f64) -> Result<f64> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM metadata WHERE key = ?1",
                [TARGET_KEY],
                |row| row.get(0),
            )
            .optional()?;

        Ok(match value {
            Some(v) => v.parse().unwrap_or_else(|_| {
                warn!("Invalid stored target {:?}, using default", v);
                default
            }),
            None => default,
        })
    }

    /// Set the target average.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTarget`] outside 0-300, or a database error.
    pub fn set_target(&self, target: f64) -> Result<()> {
        check_target(target)?;
        Self::write_target(&self.conn, target)?;
        debug!(target, "target updated");
        Ok(())
    }

    /// Replace all records and the target in one transaction.
    ///
    /// Records without an id get one; records sharing an id are stored once.
    /// Returns the number of records stored.
    ///
    /// # Errors
    ///
    /// Returns an error if any record or the target is out of range, or
    /// the database operation fails. Nothing is changed on error.
    pub fn replace_all(&mut self, records: &[GameRecord], target: f64) -> Result<usize> {
        check_target(target)?;
        for record in records {
            record.validate()?;
        }

        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM games", [])?;
        let mut stored = 0;
        {
            let mut stmt = tx.prepare(
                r"
                INSERT OR IGNORE INTO games (id, date, score, strikes, spares, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ",
            )?;
            for record in records {
                let mut record = record.clone();
                record.ensure_id();
                stored += stmt.execute(params![
                    record.id,
                    record.date.to_string(),
                    record.score,
                    record.strikes,
                    record.spares,
                    record.created_at.timestamp_millis(),
                ])?;
            }
        }
        Self::write_target(&tx, target)?;
        tx.commit()?;

        info!(stored, target, "records replaced");
        Ok(stored)
    }

    fn write_target(conn: &Connection, target: f64) -> Result<()> {
        conn.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
            (TARGET_KEY, target.to_string()),
        )?;
        Ok(())
    }

    /// Convert a database row to a `GameRecord`.
    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<GameRecord> {
        let id: String = row.get(0)?;
        let date_str: String = row.get(1)?;
        let score: u16 = row.get(2)?;
        let strikes: u8 = row.get(3)?;
        let spares: u8 = row.get(4)?;
        let created_ms: i64 = row.get(5)?;

        let date = date_str.parse::<NaiveDate>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?;

        let created_at = DateTime::from_timestamp_millis(created_ms).unwrap_or_else(|| {
            warn!(
                "Invalid created_at {} for game {}, defaulting to now",
                created_ms, id
            );
            Utc::now()
        });

        Ok(GameRecord {
            id,
            date,
            score,
            strikes,
            spares,
            created_at,
        })
    }
}

/// Check that a target average is within 0-300.
///
/// # Errors
///
/// Returns [`Error::InvalidTarget`] otherwise (including NaN).
pub fn check_target(target: f64) -> Result<()> {
    if (0.0..=f64::from(MAX_SCORE)).contains(&target) {
        Ok(())
    } else {
        Err(Error::InvalidTarget(target))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn create_test_storage() -> Storage {
        Storage::open_in_memory().expect("failed to create test storage")
    }

    fn game(date: &str, score: u16) -> NewGame {
        NewGame::new(date.parse().unwrap(), score, 2, 4).unwrap()
    }

    fn record_at(date: &str, score: u16, minute: u32) -> GameRecord {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 12, minute, 0).unwrap();
        GameRecord::with_created_at(game(date, score), at)
    }

    #[test]
    fn test_open_in_memory() {
        let storage = create_test_storage();
        assert_eq!(storage.path(), Path::new(":memory:"));
        assert_eq!(storage.count().unwrap(), 0);
    }

    #[test]
    fn test_add_and_get() {
        let storage = create_test_storage();
        let record = storage.add(game("2026-04-01", 201)).unwrap();

        let fetched = storage.get(&record.id).unwrap().unwrap();
        assert_eq!(fetched.score, 201);
        assert_eq!(fetched.strikes, 2);
        assert_eq!(fetched.spares, 4);
        assert_eq!(fetched.date, record.date);
        assert_eq!(
            fetched.created_at.timestamp_millis(),
            record.created_at.timestamp_millis()
        );
    }

    #[test]
    fn test_get_missing() {
        let storage = create_test_storage();
        assert!(storage.get("nope").unwrap().is_none());
    }

    #[test]
    fn test_insert_deduplicates_by_id() {
        let storage = create_test_storage();
        let record = record_at("2026-04-01", 150, 0);

        assert!(storage.insert(&record).unwrap());
        assert!(!storage.insert(&record).unwrap());
        assert_eq!(storage.count().unwrap(), 1);
    }

    #[test]
    fn test_insert_rejects_out_of_range() {
        let storage = create_test_storage();
        let mut record = record_at("2026-04-01", 150, 0);
        record.score = 301;
        assert!(matches!(
            storage.insert(&record),
            Err(Error::RecordValidation { .. })
        ));
    }

    #[test]
    fn test_list_orders_by_date_then_creation() {
        let storage = create_test_storage();
        storage.insert(&record_at("2026-04-02", 120, 5)).unwrap();
        storage.insert(&record_at("2026-04-01", 130, 9)).unwrap();
        storage.insert(&record_at("2026-04-02", 140, 1)).unwrap();

        let scores: Vec<u16> = storage.list().unwrap().iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![130, 140, 120]);
    }

    #[test]
    fn test_same_day_games_are_kept() {
        let storage = create_test_storage();
        storage.insert(&record_at("2026-04-02", 120, 0)).unwrap();
        storage.insert(&record_at("2026-04-02", 120, 1)).unwrap();
        assert_eq!(storage.count().unwrap(), 2);
    }

    #[test]
    fn test_recent_returns_latest_in_order() {
        let storage = create_test_storage();
        for (i, score) in [100u16, 110, 120, 130, 140, 150, 160].iter().enumerate() {
            let date = (NaiveDate::from_ymd_opt(2026, 5, 1).unwrap()
                + Duration::days(i64::try_from(i).unwrap()))
            .to_string();
            storage.insert(&record_at(&date, *score, 0)).unwrap();
        }

        let scores: Vec<u16> = storage.recent(5).unwrap().iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![120, 130, 140, 150, 160]);
    }

    #[test]
    fn test_remove_by_id() {
        let storage = create_test_storage();
        let keep = storage.add(game("2026-04-01", 150)).unwrap();
        let gone = storage.add(game("2026-04-01", 160)).unwrap();

        assert_eq!(storage.remove(&gone.id).unwrap(), Removed::Id(gone.id.clone()));
        assert!(storage.get(&keep.id).unwrap().is_some());
        assert_eq!(storage.count().unwrap(), 1);
    }

    #[test]
    fn test_remove_by_date_removes_all_that_day() {
        let storage = create_test_storage();
        storage.insert(&record_at("2026-04-01", 150, 0)).unwrap();
        storage.insert(&record_at("2026-04-01", 160, 1)).unwrap();
        storage.insert(&record_at("2026-04-02", 170, 2)).unwrap();

        let removed = storage.remove("2026-04-01").unwrap();
        assert_eq!(
            removed,
            Removed::Date {
                date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
                count: 2
            }
        );
        assert_eq!(storage.count().unwrap(), 1);
    }

    #[test]
    fn test_remove_missing() {
        let storage = create_test_storage();
        assert!(matches!(
            storage.remove("2026-04-01"),
            Err(Error::RecordNotFound(_))
        ));
        assert!(matches!(
            storage.remove("abc"),
            Err(Error::RecordNotFound(_))
        ));
    }

    #[test]
    fn test_clear() {
        let storage = create_test_storage();
        storage.add(game("2026-04-01", 150)).unwrap();
        storage.add(game("2026-04-02", 160)).unwrap();

        assert_eq!(storage.clear().unwrap(), 2);
        assert_eq!(storage.count().unwrap(), 0);
    }

    #[test]
    fn test_target_default_and_set() {
        let storage = create_test_storage();
        assert!((storage.target(170.0).unwrap() - 170.0).abs() < f64::EPSILON);

        storage.set_target(182.5).unwrap();
        assert!((storage.target(170.0).unwrap() - 182.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_set_target_out_of_range() {
        let storage = create_test_storage();
        assert!(matches!(
            storage.set_target(300.5),
            Err(Error::InvalidTarget(_))
        ));
        assert!(storage.set_target(f64::NAN).is_err());
        assert!(storage.set_target(-1.0).is_err());
    }

    #[test]
    fn test_replace_all() {
        let mut storage = create_test_storage();
        storage.add(game("2026-01-01", 99)).unwrap();

        let mut legacy = record_at("2026-02-01", 150, 0);
        legacy.id.clear();
        let dup = record_at("2026-02-02", 160, 0);
        let stored = storage
            .replace_all(&[legacy, dup.clone(), dup], 190.0)
            .unwrap();

        assert_eq!(stored, 2);
        let records = storage.list().unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| !r.id.is_empty()));
        assert!((storage.target(170.0).unwrap() - 190.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_replace_all_is_atomic_on_bad_record() {
        let mut storage = create_test_storage();
        storage.add(game("2026-01-01", 99)).unwrap();

        let mut bad = record_at("2026-02-01", 150, 0);
        bad.strikes = 40;
        assert!(storage.replace_all(&[bad], 180.0).is_err());
        assert_eq!(storage.count().unwrap(), 1);
    }

    #[test]
    fn test_open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("games.db");

        let storage = Storage::open(&path).unwrap();
        storage.add(game("2026-04-01", 150)).unwrap();
        drop(storage);

        let reopened = Storage::open(&path).unwrap();
        assert_eq!(reopened.count().unwrap(), 1);
    }
}
