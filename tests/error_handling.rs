use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use detail_library::{
    Catalog, CatalogBackend, CatalogError, InMemoryBackend, MatchError, Matcher, SearchQuery,
    Table, UsageContext, seed,
};

/// Wraps an in-memory backend and starts failing reads once tripped.
struct FlakyBackend {
    inner: InMemoryBackend,
    down: Arc<AtomicBool>,
}

impl FlakyBackend {
    fn check(&self) -> Result<(), CatalogError> {
        if self.down.load(Ordering::SeqCst) {
            Err(CatalogError::unavailable("connection reset by peer"))
        } else {
            Ok(())
        }
    }
}

impl CatalogBackend for FlakyBackend {
    fn put(&self, table: Table, id: u64, value: &[u8]) -> Result<(), CatalogError> {
        self.check()?;
        self.inner.put(table, id, value)
    }

    fn get(&self, table: Table, id: u64) -> Result<Option<Vec<u8>>, CatalogError> {
        self.check()?;
        self.inner.get(table, id)
    }

    fn scan(
        &self,
        table: Table,
        visit: &mut dyn FnMut(u64, &[u8]) -> Result<(), CatalogError>,
    ) -> Result<(), CatalogError> {
        self.check()?;
        self.inner.scan(table, visit)
    }

    fn last_id(&self, table: Table) -> Result<Option<u64>, CatalogError> {
        self.check()?;
        self.inner.last_id(table)
    }
}

fn flaky_matcher() -> (Matcher, Arc<AtomicBool>) {
    let down = Arc::new(AtomicBool::new(false));
    let backend = FlakyBackend {
        inner: InMemoryBackend::new(),
        down: down.clone(),
    };
    let catalog = Catalog::with_backend(Box::new(backend));
    catalog.seed_defaults().expect("seed");
    (Matcher::new(catalog), down)
}

#[test]
fn empty_inputs_are_rejected_before_any_store_access() {
    assert!(matches!(SearchQuery::new(""), Err(MatchError::InvalidQuery(_))));
    for (h, a, e) in [("", "Slab", "External"), ("Wall", "", "External"), ("Wall", "Slab", "")] {
        assert!(matches!(
            UsageContext::new(h, a, e),
            Err(MatchError::InvalidQuery(_))
        ));
    }
}

#[test]
fn whitespace_is_a_valid_query() {
    let (matcher, _) = flaky_matcher();
    let hits = matcher.search(&SearchQuery::new(" ").unwrap()).unwrap();
    // Every seeded title contains a space.
    assert_eq!(hits.len(), seed::default_details().len());
}

#[test]
fn store_outage_surfaces_as_error_not_empty_result() {
    let (matcher, down) = flaky_matcher();
    let query = SearchQuery::new("wall").unwrap();
    let ctx = UsageContext::new("External Wall", "Slab", "External").unwrap();
    assert!(!matcher.search(&query).unwrap().is_empty());

    down.store(true, Ordering::SeqCst);

    let err = matcher.search(&query).unwrap_err();
    assert!(matches!(
        err,
        MatchError::StoreUnavailable(CatalogError::Unavailable(ref msg)) if msg == "connection reset by peer"
    ));
    assert!(matches!(
        matcher.suggest(&ctx),
        Err(MatchError::StoreUnavailable(_))
    ));
    assert!(matches!(
        matcher.list_details(),
        Err(MatchError::StoreUnavailable(_))
    ));

    down.store(false, Ordering::SeqCst);
    assert_eq!(matcher.suggest(&ctx).unwrap().suggestion().unwrap().detail.id, 1);
}

#[test]
fn wildcard_characters_are_literal() {
    let (matcher, _) = flaky_matcher();
    for q in ["%", "_", "wall%", "w_ll"] {
        let hits = matcher.search(&SearchQuery::new(q).unwrap()).unwrap();
        assert!(hits.is_empty(), "{q:?} should match nothing");
    }
}
