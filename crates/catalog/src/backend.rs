use crate::CatalogError;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Logical record collections held by a backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Table {
    Details,
    UsageRules,
}

impl Table {
    pub const fn name(self) -> &'static str {
        match self {
            Table::Details => "details",
            Table::UsageRules => "detail_usage_rules",
        }
    }
}

/// Trait for an id-keyed storage backend for the catalog.
/// This allows for different storage implementations (e.g., in-memory, Redb).
///
/// Values are opaque encoded records. Every scan must visit keys in ascending
/// order; the catalog relies on that for its "ordered by id" contract.
pub trait CatalogBackend: Send + Sync {
    /// Insert or replace the value stored under `id`.
    fn put(&self, table: Table, id: u64, value: &[u8]) -> Result<(), CatalogError>;
    /// Retrieve a value by id.
    fn get(&self, table: Table, id: u64) -> Result<Option<Vec<u8>>, CatalogError>;
    /// Visit every value in ascending id order.
    fn scan(
        &self,
        table: Table,
        visitor: &mut dyn FnMut(u64, &[u8]) -> Result<(), CatalogError>,
    ) -> Result<(), CatalogError>;
    /// Highest id currently stored, if any.
    fn last_id(&self, table: Table) -> Result<Option<u64>, CatalogError>;
    /// Flush any buffered writes to the backend.
    fn flush(&self) -> Result<(), CatalogError> {
        Ok(())
    }
}

/// Configuration for selecting and building a backend.
///
/// # Example
/// ```
/// use catalog::BackendConfig;
///
/// // In-memory (for testing)
/// let config = BackendConfig::in_memory();
///
/// // Redb (durable, pure Rust)
/// let config = BackendConfig::redb("/data/details.redb");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum BackendConfig {
    /// Use Redb for storage. The `path` is the file path for the database.
    ///
    /// Requires the `backend-redb` feature (enabled by default).
    Redb { path: String },
    /// Use ordered in-memory maps. Contents are lost when the process exits.
    #[default]
    InMemory,
}

impl BackendConfig {
    pub fn in_memory() -> Self {
        BackendConfig::InMemory
    }

    pub fn redb<P: Into<String>>(path: P) -> Self {
        BackendConfig::Redb { path: path.into() }
    }

    /// Build the backend described by this configuration.
    pub fn build(&self) -> Result<Box<dyn CatalogBackend>, CatalogError> {
        match self {
            BackendConfig::InMemory => Ok(Box::new(InMemoryBackend::new())),
            BackendConfig::Redb { path } => {
                #[cfg(feature = "backend-redb")]
                {
                    Ok(Box::new(RedbBackend::open(path)?))
                }
                #[cfg(not(feature = "backend-redb"))]
                {
                    let _ = path;
                    Err(CatalogError::unavailable(
                        "redb backend disabled at compile time",
                    ))
                }
            }
        }
    }
}

/// An in-memory backend: one `BTreeMap` per table, each behind a `RwLock`.
pub struct InMemoryBackend {
    details: RwLock<BTreeMap<u64, Vec<u8>>>,
    usage_rules: RwLock<BTreeMap<u64, Vec<u8>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            details: RwLock::new(BTreeMap::new()),
            usage_rules: RwLock::new(BTreeMap::new()),
        }
    }

    fn table(&self, table: Table) -> &RwLock<BTreeMap<u64, Vec<u8>>> {
        match table {
            Table::Details => &self.details,
            Table::UsageRules => &self.usage_rules,
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogBackend for InMemoryBackend {
    fn put(&self, table: Table, id: u64, value: &[u8]) -> Result<(), CatalogError> {
        self.table(table)
            .write()
            .map_err(|_| CatalogError::unavailable("poisoned lock"))?
            .insert(id, value.to_vec());
        Ok(())
    }

    fn get(&self, table: Table, id: u64) -> Result<Option<Vec<u8>>, CatalogError> {
        let guard = self
            .table(table)
            .read()
            .map_err(|_| CatalogError::unavailable("poisoned lock"))?;
        Ok(guard.get(&id).cloned())
    }

    fn scan(
        &self,
        table: Table,
        visitor: &mut dyn FnMut(u64, &[u8]) -> Result<(), CatalogError>,
    ) -> Result<(), CatalogError> {
        // A read lock is held for the duration of the scan.
        let guard = self
            .table(table)
            .read()
            .map_err(|_| CatalogError::unavailable("poisoned lock"))?;
        for (id, value) in guard.iter() {
            visitor(*id, value)?;
        }
        Ok(())
    }

    fn last_id(&self, table: Table) -> Result<Option<u64>, CatalogError> {
        let guard = self
            .table(table)
            .read()
            .map_err(|_| CatalogError::unavailable("poisoned lock"))?;
        Ok(guard.keys().next_back().copied())
    }
}

/// Durable backend on top of redb.
#[cfg(feature = "backend-redb")]
pub mod redb;

#[cfg(feature = "backend-redb")]
pub use self::redb::RedbBackend;
