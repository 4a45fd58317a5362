use std::path::PathBuf;
use std::time::Duration;

use folio_db::{CatalogDb, OpenMode};
use tokio::sync::{Mutex, MutexGuard};

use crate::cache::LibraryCache;
use crate::error::Result;
use crate::querylog::QueryLogWriter;

/// Shared catalog state: the database handle, the library listing cache,
/// and the CSV query log writer.
pub struct Catalog {
    database_path: PathBuf,
    db: Mutex<Option<CatalogDb>>,
    library_cache: LibraryCache,
    query_log: QueryLogWriter,
}

impl Catalog {
    pub fn new(database_path: PathBuf, query_log_path: PathBuf, cache_ttl: Duration) -> Self {
        Self {
            database_path,
            db: Mutex::new(None),
            library_cache: LibraryCache::new(cache_ttl),
            query_log: QueryLogWriter::new(query_log_path),
        }
    }

    /// Get the database handle, opening (and creating) it on first use.
    pub async fn get_db(&self) -> Result<MutexGuard<'_, Option<CatalogDb>>> {
        let mut db_guard = self.db.lock().await;

        if db_guard.is_none() {
            *db_guard = Some(CatalogDb::open(&self.database_path, OpenMode::Create)?);
        }

        Ok(db_guard)
    }

    pub fn library_cache(&self) -> &LibraryCache {
        &self.library_cache
    }

    pub fn query_log(&self) -> &QueryLogWriter {
        &self.query_log
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(
            PathBuf::from("catalog.sqlite"),
            PathBuf::from("analyze-queries.csv"),
            Duration::from_secs(60 * 15),
        )
    }
}
