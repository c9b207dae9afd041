//! JSON backup files.
//!
//! A backup holds every record plus the target average. Importing a backup
//! replaces what is stored.

use std::io::{Read, Write};
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::record::GameRecord;
use crate::storage::Storage;

/// Contents of a backup file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    /// All records, oldest first.
    pub records: Vec<GameRecord>,
    /// Target average.
    pub target: f64,
    /// When the backup was written.
    pub export_date: DateTime<Utc>,
}

impl Backup {
    /// Snapshot everything in `storage`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn from_storage(storage: &Storage, default_target: f64) -> Result<Self> {
        Ok(Self {
            records: storage.list()?,
            target: storage.target(default_target)?,
            export_date: Utc::now(),
        })
    }

    /// Default file name for a backup written on `date`.
    #[must_use]
    pub fn file_name(date: NaiveDate) -> String {
        format!("bowly-backup-{date}.json")
    }

    /// Write the backup as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to(&self, mut writer: impl Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        Ok(())
    }

    /// Write the backup to a file, replacing it if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path)?;
        self.write_to(std::io::BufWriter::new(file))?;
        info!(path = %path.display(), records = self.records.len(), "backup written");
        Ok(())
    }

    /// Read a backup.
    ///
    /// The document must contain a `records` array. A missing or null
    /// `target` falls back to `default_target` (the configured
    /// `stats.default_target`), and a missing `exportDate` to now.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ImportFormat`] for a document of the wrong shape,
    /// or a JSON error if it is not JSON at all.
    pub fn read_from(reader: impl Read, default_target: f64) -> Result<Self> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_value(value, default_target)
    }

    /// Read a backup file.
    ///
    /// # Errors
    ///
    /// See [`Backup::read_from`]; also fails if the file cannot be opened.
    pub fn load(path: impl AsRef<Path>, default_target: f64) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading backup");
        let file = std::fs::File::open(path)?;
        Self::read_from(std::io::BufReader::new(file), default_target)
    }

    fn from_value(mut value: Value, default_target: f64) -> Result<Self> {
        let Some(doc) = value.as_object_mut() else {
            return Err(Error::import_format("expected a JSON object"));
        };

        let records = match doc.remove("records") {
            Some(records @ Value::Array(_)) => records,
            Some(_) => return Err(Error::import_format("'records' must be an array")),
            None => return Err(Error::import_format("missing 'records' array")),
        };
        let records: Vec<GameRecord> = serde_json::from_value(records)
            .map_err(|e| Error::import_format(format!("invalid record: {e}")))?;

        let target = match doc.get("target") {
            None | Some(Value::Null) => default_target,
            Some(v) => v
                .as_f64()
                .ok_or_else(|| Error::import_format("'target' must be a number"))?,
        };

        let export_date = match doc.remove("exportDate") {
            None | Some(Value::Null) => Utc::now(),
            Some(v) => serde_json::from_value(v)
                .map_err(|e| Error::import_format(format!("invalid exportDate: {e}")))?,
        };

        Ok(Self {
            records,
            target,
            export_date,
        })
    }

    /// Replace everything in `storage` with this backup.
    ///
    /// Returns the number of records stored after de-duplication.
    ///
    /// # Errors
    ///
    /// Returns an error if a record or the target is out of range, or the
    /// database operation fails. Storage is unchanged on error.
    pub fn restore(&self, storage: &mut Storage) -> Result<usize> {
        let stored = storage.replace_all(&self.records, self.target)?;
        info!(stored, target = self.target, "backup restored");
        Ok(stored)
    }
}
