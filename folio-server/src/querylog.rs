//! CSV persistence for per-request SQL diagnostics.
//!
//! Handlers drain the database's statement log after each request and append
//! the entries here. Columns are `SQL,Time`; the header row is written when
//! the file is first created.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use folio_db::LoggedQuery;

use crate::error::{QueryLogError, Result};

pub struct QueryLogWriter {
    path: PathBuf,
    // Serializes appends across workers
    lock: Mutex<()>,
}

impl QueryLogWriter {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    /// Append the drained statement log entries to the CSV file.
    ///
    /// A no-op for an empty batch, so requests served entirely from the
    /// cache leave no trace here.
    pub fn append(&self, queries: &[LoggedQuery]) -> Result<()> {
        if queries.is_empty() {
            return Ok(());
        }

        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());

        let is_new = !self.path.exists();
        let mut out = String::new();
        if is_new {
            out.push_str("SQL,Time\n");
        }
        for query in queries {
            out.push_str(&csv_field(&query.sql));
            out.push(',');
            out.push_str(&format!("{:.6}", query.seconds));
            out.push('\n');
        }

        self.write_all(out.as_bytes())
            .map_err(|e| QueryLogError::Append {
                path: self.path.display().to_string(),
                source: e,
            })?;
        Ok(())
    }

    fn write_all(&self, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(bytes)
    }
}

/// Quote a CSV field when it contains a separator, quote, or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}
