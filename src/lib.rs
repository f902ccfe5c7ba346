//! Workspace umbrella crate for the construction detail library.
//!
//! Re-exports the catalog and matching APIs so callers can depend on one
//! crate, and owns the YAML [`LibraryConfig`] that wires them together.
//!
//! ```
//! use detail_library::{LibraryConfig, SearchQuery};
//!
//! let matcher = LibraryConfig::default().build().unwrap();
//! let hits = matcher.search(&SearchQuery::new("wall").unwrap()).unwrap();
//! assert!(!hits.is_empty());
//! ```

pub mod config;

pub use catalog::{
    BackendConfig, Catalog, CatalogBackend, CatalogConfig, CatalogError, Detail, InMemoryBackend,
    NewDetail, NewUsageRule, Table, UsageRule, normalize::contains_ci, seed,
};
#[cfg(feature = "backend-redb")]
pub use catalog::RedbBackend;
pub use config::{CatalogBackendKind, CatalogYamlConfig, ConfigLoadError, LibraryConfig};
pub use matcher::{
    ContextScore, ContextScorer, ContextWeights, MatchError, Matcher, MatcherConfig,
    NO_MATCH_EXPLANATION, REQUIRED_CONTEXT_FIELDS, RankedDetail, ScoredCandidate, Scorer,
    SearchQuery, Selection, Suggestion, TextScorer, Tier, UsageContext, explain,
};
