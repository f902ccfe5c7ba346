//! # Detail Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` sits on top of the record store (`catalog`). It turns a free-text
//! query into a tiered, ordered result list and turns an architectural usage
//! context into a single recommended detail with a human-readable
//! explanation.
//!
//! ## Core Types
//!
//! - [`SearchQuery`] / [`UsageContext`]: validated inputs. Only empty strings
//!   are rejected.
//! - [`Tier`]: which field a text hit came from (title, tags, description).
//! - [`ContextWeights`]: per-field weights for context scoring (3/3/2 by
//!   default).
//! - [`Scorer`]: the ranking seam, implemented by [`TextScorer`] and
//!   [`ContextScorer`].
//! - [`Selection`]: either a [`Suggestion`] or a no-match explanation.
//! - [`Matcher`]: wires the catalog and the scorers together.
//!
//! ## Example Usage
//!
//! ```
//! use matcher::{Matcher, SearchQuery, UsageContext};
//!
//! let matcher = Matcher::in_memory_seeded().unwrap();
//!
//! let hits = matcher.search(&SearchQuery::new("drip").unwrap()).unwrap();
//! assert_eq!(hits[0].detail.title, "Window Sill Detail with Drip");
//!
//! let ctx = UsageContext::new("External Wall", "Slab", "External").unwrap();
//! let selection = matcher.suggest(&ctx).unwrap();
//! assert_eq!(selection.suggestion().unwrap().score.total, 8);
//! ```
//!
//! ## Errors
//!
//! All fallible operations return [`MatchError`]. Store failures surface as
//! [`MatchError::StoreUnavailable`] and are never masked as "no result".

pub mod engine;
pub mod explain;
pub mod scorer;
pub mod types;

pub use catalog::{Catalog, CatalogConfig, CatalogError, Detail, UsageRule};
pub use engine::Matcher;
pub use explain::{explain, NO_MATCH_EXPLANATION};
pub use scorer::{ContextScorer, Scorer, TextScorer};
pub use types::{
    ContextScore, ContextWeights, MatchError, MatcherConfig, RankedDetail, ScoredCandidate,
    SearchQuery, Selection, Suggestion, Tier, UsageContext, REQUIRED_CONTEXT_FIELDS,
};
