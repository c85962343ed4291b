use redb::{Database, ReadableDatabase, ReadableTableMetadata, TableDefinition};
use spotlight_shared::geocode::normalize_place;
use spotlight_shared::models::Coordinate;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Normalized place name -> JSON `Option<Coordinate>`. Misses are cached too.
const GEOCODE_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("geocode_cache");

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(String),
    #[error("corrupt cache entry: {0}")]
    Encoding(#[from] serde_json::Error),
}

fn db_err(e: impl std::fmt::Display) -> StorageError {
    StorageError::Database(e.to_string())
}

pub struct Storage {
    db: Database,
    path: PathBuf,
}

impl Storage {
    pub fn open(path: &Path) -> Result<Arc<Self>, StorageError> {
        let db = Database::create(path).map_err(db_err)?;

        // Ensure table exists
        let write_txn = db.begin_write().map_err(db_err)?;
        {
            write_txn.open_table(GEOCODE_TABLE).map_err(db_err)?;
        }
        write_txn.commit().map_err(db_err)?;

        Ok(Arc::new(Storage {
            db,
            path: path.to_path_buf(),
        }))
    }

    /// `None` when the place was never looked up, `Some(None)` for a cached miss.
    pub fn cached_geocode(&self, place: &str) -> Result<Option<Option<Coordinate>>, StorageError> {
        let key = normalize_place(place);
        let read_txn = self.db.begin_read().map_err(db_err)?;
        let table = read_txn.open_table(GEOCODE_TABLE).map_err(db_err)?;

        match table.get(key.as_str()).map_err(db_err)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn store_geocode(&self, place: &str, result: Option<Coordinate>) -> Result<(), StorageError> {
        let key = normalize_place(place);
        let json = serde_json::to_vec(&result)?;

        let write_txn = self.db.begin_write().map_err(db_err)?;
        {
            let mut table = write_txn.open_table(GEOCODE_TABLE).map_err(db_err)?;
            table
                .insert(key.as_str(), json.as_slice())
                .map_err(db_err)?;
        }
        write_txn.commit().map_err(db_err)?;
        Ok(())
    }

    pub fn count_geocodes(&self) -> Result<u64, StorageError> {
        let read_txn = self.db.begin_read().map_err(db_err)?;
        let table = read_txn.open_table(GEOCODE_TABLE).map_err(db_err)?;
        table.len().map_err(db_err)
    }

    pub fn db_size_bytes(&self) -> Result<u64, StorageError> {
        std::fs::metadata(&self.path)
            .map(|m| m.len())
            .map_err(db_err)
    }
}
