//! # Detail Catalog
//!
//! Read-mostly store of construction [`Detail`]s and the [`UsageRule`]s that
//! say where each detail applies. The catalog is the record-store adapter for
//! the matching engine: it hands back ordered, pre-filtered candidates and
//! never ranks them.
//!
//! ## Core Features
//!
//! - **Pluggable Backends** through the [`CatalogBackend`] trait: an ordered
//!   in-memory backend for tests and ephemeral services, and a durable redb
//!   backend (feature `backend-redb`, on by default).
//! - **Ordered retrieval**: every listing is ascending by id.
//! - **Case-insensitive substring filters** built on the shared
//!   [`normalize::Pattern`] primitive.
//! - **Ownership checks**: a usage rule can only be written for a detail that
//!   exists.
//!
//! ## Example Usage
//!
//! ```
//! use catalog::{BackendConfig, Catalog, CatalogConfig};
//!
//! let cfg = CatalogConfig::new()
//!     .with_backend(BackendConfig::in_memory())
//!     .with_seed(true);
//! let catalog = Catalog::open(cfg).unwrap();
//!
//! let hits = catalog.find_by_text("drip").unwrap();
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].title, "Window Sill Detail with Drip");
//!
//! let pairs = catalog
//!     .find_rules_by_context("external wall", "slab", "external")
//!     .unwrap();
//! assert_eq!(pairs[0].0.id, 1);
//! ```

mod backend;
pub mod normalize;
pub mod seed;
mod types;

#[cfg(feature = "backend-redb")]
pub use backend::RedbBackend;
pub use backend::{BackendConfig, CatalogBackend, InMemoryBackend, Table};
pub use types::{Detail, NewDetail, NewUsageRule, UsageRule, CATALOG_SCHEMA_VERSION};

use bincode::config::standard;
use bincode::error::{DecodeError, EncodeError};
use bincode::serde::{decode_from_slice, encode_to_vec};
use normalize::Pattern;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Mutex;
use thiserror::Error;
use types::Stored;

/// Errors raised by the catalog and its backends.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The backing store could not be opened or a transaction failed.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("record encode error: {0}")]
    Encode(String),
    #[error("record decode error: {0}")]
    Decode(String),
    #[error("invalid record: {0}")]
    InvalidRecord(String),
    #[error("usage rule references unknown detail {0}")]
    UnknownDetail(u64),
}

impl CatalogError {
    pub fn unavailable<E: std::fmt::Display>(err: E) -> Self {
        Self::Unavailable(err.to_string())
    }
}

impl From<EncodeError> for CatalogError {
    fn from(e: EncodeError) -> Self {
        CatalogError::Encode(e.to_string())
    }
}

impl From<DecodeError> for CatalogError {
    fn from(e: DecodeError) -> Self {
        CatalogError::Decode(e.to_string())
    }
}

/// Config for opening a catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Backend storage configuration (in-memory or redb).
    pub backend: BackendConfig,
    /// Insert the reference records from [`seed`] when opening.
    pub seed: bool,
}

impl CatalogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_backend(mut self, backend: BackendConfig) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_seed(mut self, seed: bool) -> Self {
        self.seed = seed;
        self
    }
}

/// The detail catalog.
pub struct Catalog {
    /// The backend used for storage, abstracted behind a trait.
    backend: Box<dyn CatalogBackend>,
    /// Serializes id assignment so concurrent creates never collide.
    id_lock: Mutex<()>,
}

impl Catalog {
    /// Build the configured backend and open a catalog over it.
    pub fn open(cfg: CatalogConfig) -> Result<Self, CatalogError> {
        let backend = cfg.backend.build()?;
        let catalog = Self::with_backend(backend);
        if cfg.seed {
            catalog.seed_defaults()?;
        }
        Ok(catalog)
    }

    /// Open a catalog over a caller-supplied backend.
    pub fn with_backend(backend: Box<dyn CatalogBackend>) -> Self {
        Self {
            backend,
            id_lock: Mutex::new(()),
        }
    }

    /// All details, ascending by id.
    pub fn list_all(&self) -> Result<Vec<Detail>, CatalogError> {
        self.collect(Table::Details)
    }

    /// Look up one detail by id.
    pub fn get_detail(&self, id: u64) -> Result<Option<Detail>, CatalogError> {
        self.backend
            .get(Table::Details, id)?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    /// Details whose title, tags, or description contain `pattern`, ignoring
    /// case. Ascending by id; ranking is the caller's concern.
    pub fn find_by_text(&self, pattern: &str) -> Result<Vec<Detail>, CatalogError> {
        let pattern = Pattern::new(pattern);
        let mut hits = self.list_all()?;
        hits.retain(|detail| {
            pattern.matches(&detail.title)
                || pattern.matches(&detail.tags)
                || pattern.matches(&detail.description)
        });
        tracing::debug!(pattern = pattern.as_str(), hits = hits.len(), "text filter");
        Ok(hits)
    }

    /// `(Detail, UsageRule)` pairs where at least one rule field contains its
    /// corresponding pattern. Ordered by detail id, then rule id.
    pub fn find_rules_by_context(
        &self,
        host: &str,
        adjacent: &str,
        exposure: &str,
    ) -> Result<Vec<(Detail, UsageRule)>, CatalogError> {
        let host = Pattern::new(host);
        let adjacent = Pattern::new(adjacent);
        let exposure = Pattern::new(exposure);

        let details: BTreeMap<u64, Detail> = self
            .list_all()?
            .into_iter()
            .map(|detail| (detail.id, detail))
            .collect();

        let mut pairs = Vec::new();
        for rule in self.collect::<UsageRule>(Table::UsageRules)? {
            let relevant = host.matches(&rule.host_element)
                || adjacent.matches(&rule.adjacent_element)
                || exposure.matches(&rule.exposure);
            if !relevant {
                continue;
            }
            match details.get(&rule.detail_id) {
                Some(detail) => pairs.push((detail.clone(), rule)),
                None => tracing::warn!(
                    rule_id = rule.id,
                    detail_id = rule.detail_id,
                    "usage rule points at a missing detail; skipping"
                ),
            }
        }
        pairs.sort_by_key(|(detail, rule)| (detail.id, rule.id));

        tracing::debug!(
            host = host.as_str(),
            adjacent = adjacent.as_str(),
            exposure = exposure.as_str(),
            candidates = pairs.len(),
            "context filter"
        );
        Ok(pairs)
    }

    /// All usage rules, ascending by id.
    pub fn list_rules(&self) -> Result<Vec<UsageRule>, CatalogError> {
        self.collect(Table::UsageRules)
    }

    /// Store a new detail under the next free id.
    pub fn create_detail(&self, new: NewDetail) -> Result<Detail, CatalogError> {
        let _guard = self
            .id_lock
            .lock()
            .map_err(|_| CatalogError::unavailable("poisoned lock"))?;
        let id = self.next_id(Table::Details)?;
        let detail = new.into_detail(id);
        detail.validate()?;
        self.write(Table::Details, detail.id, &detail)?;
        tracing::info!(id = detail.id, title = %detail.title, "detail created");
        Ok(detail)
    }

    /// Store a new usage rule under the next free id. The owning detail must
    /// already exist.
    pub fn create_rule(&self, new: NewUsageRule) -> Result<UsageRule, CatalogError> {
        let _guard = self
            .id_lock
            .lock()
            .map_err(|_| CatalogError::unavailable("poisoned lock"))?;
        let id = self.next_id(Table::UsageRules)?;
        let rule = new.into_rule(id);
        rule.validate()?;
        self.ensure_detail_exists(rule.detail_id)?;
        self.write(Table::UsageRules, rule.id, &rule)?;
        tracing::info!(id = rule.id, detail_id = rule.detail_id, "usage rule created");
        Ok(rule)
    }

    /// Insert a detail with an explicit id unless that id is already taken.
    /// Returns whether anything was written.
    pub fn insert_detail_if_absent(&self, detail: Detail) -> Result<bool, CatalogError> {
        detail.validate()?;
        let _guard = self
            .id_lock
            .lock()
            .map_err(|_| CatalogError::unavailable("poisoned lock"))?;
        if self.backend.get(Table::Details, detail.id)?.is_some() {
            return Ok(false);
        }
        self.write(Table::Details, detail.id, &detail)?;
        Ok(true)
    }

    /// Insert a usage rule with an explicit id unless that id is already
    /// taken. The owning detail must exist.
    pub fn insert_rule_if_absent(&self, rule: UsageRule) -> Result<bool, CatalogError> {
        rule.validate()?;
        let _guard = self
            .id_lock
            .lock()
            .map_err(|_| CatalogError::unavailable("poisoned lock"))?;
        if self.backend.get(Table::UsageRules, rule.id)?.is_some() {
            return Ok(false);
        }
        self.ensure_detail_exists(rule.detail_id)?;
        self.write(Table::UsageRules, rule.id, &rule)?;
        Ok(true)
    }

    /// Insert the reference catalog. Safe to call repeatedly; existing ids
    /// are left untouched. Returns how many records were written.
    pub fn seed_defaults(&self) -> Result<usize, CatalogError> {
        let mut written = 0;
        for detail in seed::default_details() {
            written += usize::from(self.insert_detail_if_absent(detail)?);
        }
        for rule in seed::default_rules() {
            written += usize::from(self.insert_rule_if_absent(rule)?);
        }
        tracing::info!(written, "seed data applied");
        Ok(written)
    }

    /// Flush backend buffers if supported.
    pub fn flush(&self) -> Result<(), CatalogError> {
        self.backend.flush()
    }

    fn next_id(&self, table: Table) -> Result<u64, CatalogError> {
        Ok(self.backend.last_id(table)?.map_or(1, |last| last + 1))
    }

    fn ensure_detail_exists(&self, detail_id: u64) -> Result<(), CatalogError> {
        if self.backend.get(Table::Details, detail_id)?.is_none() {
            return Err(CatalogError::UnknownDetail(detail_id));
        }
        Ok(())
    }

    fn write<T: Serialize>(&self, table: Table, id: u64, record: &T) -> Result<(), CatalogError> {
        let payload = encode(record)?;
        self.backend.put(table, id, &payload)
    }

    fn collect<T: DeserializeOwned>(&self, table: Table) -> Result<Vec<T>, CatalogError> {
        let mut records = Vec::new();
        self.backend.scan(table, &mut |_, bytes| {
            records.push(decode(bytes)?);
            Ok(())
        })?;
        Ok(records)
    }
}

fn encode<T: Serialize>(record: &T) -> Result<Vec<u8>, CatalogError> {
    let stored = Stored {
        schema_version: CATALOG_SCHEMA_VERSION,
        record,
    };
    Ok(encode_to_vec(&stored, standard())?)
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CatalogError> {
    let (stored, _): (Stored<T>, usize) = decode_from_slice(bytes, standard())?;
    if stored.schema_version != CATALOG_SCHEMA_VERSION {
        return Err(CatalogError::Decode(format!(
            "unsupported schema version {}",
            stored.schema_version
        )));
    }
    Ok(stored.record)
}
