//! Redb (Rust embedded database) backend for catalog storage.
//!
//! Each [`Table`] maps to its own redb table keyed by `u64` record id, so
//! redb's ordered key iteration gives the ascending-id scan order the
//! catalog contract requires without any sorting on read.
//!
//! # Configuration Example
//! ```yaml
//! catalog:
//!   backend: redb
//!   path: "/data/details.redb"
//! ```

use crate::backend::{CatalogBackend, Table};
use crate::CatalogError;
use ::redb::{Database, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::Arc;

const DETAILS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new(Table::Details.name());
const USAGE_RULES_TABLE: TableDefinition<u64, &[u8]> =
    TableDefinition::new(Table::UsageRules.name());

fn definition(table: Table) -> TableDefinition<'static, u64, &'static [u8]> {
    match table {
        Table::Details => DETAILS_TABLE,
        Table::UsageRules => USAGE_RULES_TABLE,
    }
}

/// Redb backend for persistent catalog storage.
///
/// Every write is its own committed transaction; reads use MVCC snapshots,
/// so a scan never observes a half-applied write.
pub struct RedbBackend {
    db: Arc<Database>,
}

impl RedbBackend {
    /// Open or create a Redb database at the given path and make sure both
    /// catalog tables exist.
    ///
    /// ```no_run
    /// use catalog::RedbBackend;
    ///
    /// let backend = RedbBackend::open("/tmp/details.redb").unwrap();
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let db = Database::create(path).map_err(CatalogError::unavailable)?;

        let write_txn = db.begin_write().map_err(CatalogError::unavailable)?;
        {
            // Opening a table inside a write transaction creates it.
            write_txn
                .open_table(DETAILS_TABLE)
                .map_err(CatalogError::unavailable)?;
            write_txn
                .open_table(USAGE_RULES_TABLE)
                .map_err(CatalogError::unavailable)?;
        }
        write_txn.commit().map_err(CatalogError::unavailable)?;

        Ok(Self { db: Arc::new(db) })
    }
}

impl CatalogBackend for RedbBackend {
    fn put(&self, table: Table, id: u64, value: &[u8]) -> Result<(), CatalogError> {
        let write_txn = self.db.begin_write().map_err(CatalogError::unavailable)?;
        {
            let mut handle = write_txn
                .open_table(definition(table))
                .map_err(CatalogError::unavailable)?;
            handle
                .insert(id, value)
                .map_err(CatalogError::unavailable)?;
        }
        write_txn.commit().map_err(CatalogError::unavailable)?;
        Ok(())
    }

    fn get(&self, table: Table, id: u64) -> Result<Option<Vec<u8>>, CatalogError> {
        let read_txn = self.db.begin_read().map_err(CatalogError::unavailable)?;
        let handle = read_txn
            .open_table(definition(table))
            .map_err(CatalogError::unavailable)?;

        let value = handle.get(id).map_err(CatalogError::unavailable)?;
        Ok(value.map(|guard| guard.value().to_vec()))
    }

    fn scan(
        &self,
        table: Table,
        visitor: &mut dyn FnMut(u64, &[u8]) -> Result<(), CatalogError>,
    ) -> Result<(), CatalogError> {
        let read_txn = self.db.begin_read().map_err(CatalogError::unavailable)?;
        let handle = read_txn
            .open_table(definition(table))
            .map_err(CatalogError::unavailable)?;

        for item in handle.iter().map_err(CatalogError::unavailable)? {
            let (key, value) = item.map_err(CatalogError::unavailable)?;
            visitor(key.value(), value.value())?;
        }
        Ok(())
    }

    fn last_id(&self, table: Table) -> Result<Option<u64>, CatalogError> {
        let read_txn = self.db.begin_read().map_err(CatalogError::unavailable)?;
        let handle = read_txn
            .open_table(definition(table))
            .map_err(CatalogError::unavailable)?;

        let last = handle.last().map_err(CatalogError::unavailable)?;
        Ok(last.map(|(key, _)| key.value()))
    }

    fn flush(&self) -> Result<(), CatalogError> {
        // Commits are durable when `commit` returns; nothing is buffered.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn redb_roundtrip_per_table() {
        let temp_file = NamedTempFile::new().unwrap();
        let backend = RedbBackend::open(temp_file.path()).unwrap();

        backend.put(Table::Details, 1, b"detail-1").unwrap();
        backend.put(Table::UsageRules, 1, b"rule-1").unwrap();

        assert_eq!(
            backend.get(Table::Details, 1).unwrap(),
            Some(b"detail-1".to_vec())
        );
        assert_eq!(
            backend.get(Table::UsageRules, 1).unwrap(),
            Some(b"rule-1".to_vec())
        );
        assert_eq!(backend.get(Table::Details, 2).unwrap(), None);
    }

    #[test]
    fn redb_scan_orders_numeric_keys() {
        let temp_file = NamedTempFile::new().unwrap();
        let backend = RedbBackend::open(temp_file.path()).unwrap();

        for id in [10u64, 2, 33, 1] {
            backend.put(Table::Details, id, &id.to_le_bytes()).unwrap();
        }

        let mut ids = Vec::new();
        backend
            .scan(Table::Details, &mut |id, _| {
                ids.push(id);
                Ok(())
            })
            .unwrap();

        assert_eq!(ids, vec![1, 2, 10, 33]);
        assert_eq!(backend.last_id(Table::Details).unwrap(), Some(33));
        assert_eq!(backend.last_id(Table::UsageRules).unwrap(), None);
    }

    #[test]
    fn redb_data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.redb");

        {
            let backend = RedbBackend::open(&path).unwrap();
            backend.put(Table::UsageRules, 5, b"kept").unwrap();
        }

        let reopened = RedbBackend::open(&path).unwrap();
        assert_eq!(
            reopened.get(Table::UsageRules, 5).unwrap(),
            Some(b"kept".to_vec())
        );
    }
}
