use super::*;

use catalog::{CatalogBackend, CatalogError, NewDetail, NewUsageRule, Table};

use crate::types::{ContextWeights, Tier};

fn seeded_matcher() -> Matcher {
    Matcher::in_memory_seeded().expect("seeded matcher")
}

fn empty_catalog() -> Catalog {
    Catalog::open(CatalogConfig::new()).expect("in-memory catalog")
}

fn add_detail(catalog: &Catalog, title: &str, tags: &str, description: &str) -> Detail {
    catalog
        .create_detail(NewDetail {
            title: title.into(),
            category: "Test".into(),
            tags: tags.into(),
            description: description.into(),
        })
        .expect("create detail")
}

fn add_rule(catalog: &Catalog, detail_id: u64, host: &str, adjacent: &str, exposure: &str) {
    catalog
        .create_rule(NewUsageRule {
            detail_id,
            host_element: host.into(),
            adjacent_element: adjacent.into(),
            exposure: exposure.into(),
        })
        .expect("create rule");
}

fn ids(hits: &[RankedDetail]) -> Vec<u64> {
    hits.iter().map(|hit| hit.detail.id).collect()
}

/// Backend whose every call fails, standing in for an unreachable store.
struct DownBackend;

impl CatalogBackend for DownBackend {
    fn put(&self, _: Table, _: u64, _: &[u8]) -> Result<(), CatalogError> {
        Err(CatalogError::unavailable("connection refused"))
    }

    fn get(&self, _: Table, _: u64) -> Result<Option<Vec<u8>>, CatalogError> {
        Err(CatalogError::unavailable("connection refused"))
    }

    fn scan(
        &self,
        _: Table,
        _: &mut dyn FnMut(u64, &[u8]) -> Result<(), CatalogError>,
    ) -> Result<(), CatalogError> {
        Err(CatalogError::unavailable("connection refused"))
    }

    fn last_id(&self, _: Table) -> Result<Option<u64>, CatalogError> {
        Err(CatalogError::unavailable("connection refused"))
    }
}

#[test]
fn list_details_returns_catalog_in_id_order() {
    let matcher = seeded_matcher();
    let details = matcher.list_details().unwrap();
    assert_eq!(details.iter().map(|d| d.id).collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[test]
fn drip_returns_window_sill_alone() {
    let matcher = seeded_matcher();
    let hits = matcher.search(&SearchQuery::new("drip").unwrap()).unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].detail.title, "Window Sill Detail with Drip");
    // "Drip" is in the title as well as the tags; the title tier applies.
    assert_eq!(hits[0].tier, Tier::Title);
}

#[test]
fn title_hits_rank_before_tag_hits_regardless_of_id() {
    let catalog = empty_catalog();
    let tagged = add_detail(&catalog, "Sill Detail", "window,flashing", "Sill with upstand");
    let titled = add_detail(&catalog, "Flashing Detail", "roof", "Lead flashing to abutment");
    let matcher = Matcher::new(catalog);

    let hits = matcher.search(&SearchQuery::new("flashing").unwrap()).unwrap();
    assert_eq!(ids(&hits), vec![titled.id, tagged.id]);
    assert_eq!(hits[0].tier, Tier::Title);
    assert_eq!(hits[1].tier, Tier::Tags);
}

#[test]
fn same_tier_ties_break_by_ascending_id() {
    let catalog = empty_catalog();
    for n in 0..5 {
        add_detail(
            &catalog,
            &format!("Junction {n}"),
            "generic",
            "membrane lap detail",
        );
    }
    let matcher = Matcher::new(catalog);

    let hits = matcher.search(&SearchQuery::new("MEMBRANE").unwrap()).unwrap();
    assert_eq!(ids(&hits), vec![1, 2, 3, 4, 5]);
    assert!(hits.iter().all(|hit| hit.tier == Tier::Description));
}

#[test]
fn every_search_hit_mentions_the_query() {
    let matcher = seeded_matcher();
    for q in ["wall", "EXTERNAL", "junction", "a", "floor", " ", "–"] {
        let query = SearchQuery::new(q).unwrap();
        for hit in matcher.search(&query).unwrap() {
            let d = &hit.detail;
            let lower = q.to_lowercase();
            assert!(
                d.title.to_lowercase().contains(&lower)
                    || d.tags.to_lowercase().contains(&lower)
                    || d.description.to_lowercase().contains(&lower),
                "detail {} returned for {q:?} without mentioning it",
                d.id
            );
        }
    }
}

#[test]
fn search_ordering_is_tier_then_id() {
    let matcher = seeded_matcher();
    let hits = matcher.search(&SearchQuery::new("external").unwrap()).unwrap();
    // 1: title, 2: tags ("external" in tags; title has none)
    assert_eq!(ids(&hits), vec![1, 2]);

    for pair in hits.windows(2) {
        let key = |h: &RankedDetail| (h.tier, h.detail.id);
        assert!(key(&pair[0]) < key(&pair[1]));
    }
}

#[test]
fn full_context_selects_wall_slab_junction() {
    let matcher = seeded_matcher();
    let ctx = UsageContext::new("External Wall", "Slab", "External").unwrap();

    let selection = matcher.suggest(&ctx).unwrap();
    let suggestion = selection.suggestion().expect("a suggestion");
    assert_eq!(suggestion.detail.id, 1);
    assert_eq!(suggestion.score.total, 8);
    assert_eq!(suggestion.rule.host_element, "External Wall");
    assert!(suggestion.explanation.contains("compatible with External Wall as host element"));
    assert!(suggestion.explanation.contains("works with Slab as adjacent element"));
    assert!(suggestion.explanation.contains("suitable for External exposure"));
}

#[test]
fn unrelated_context_is_no_match() {
    let matcher = seeded_matcher();
    let ctx = UsageContext::new("Roof", "Gutter", "Submerged").unwrap();

    let selection = matcher.suggest(&ctx).unwrap();
    assert_eq!(
        selection,
        Selection::NoMatch {
            explanation: NO_MATCH_EXPLANATION.to_string()
        }
    );
    assert!(selection.suggestion().is_none());
}

#[test]
fn highest_score_wins_over_lower_id() {
    let matcher = seeded_matcher();
    // Rule 1 scores 2 on exposure alone; rule 2 matches every field.
    let ctx = UsageContext::new("Window", "external wall", "external").unwrap();
    let selection = matcher.suggest(&ctx).unwrap();
    let suggestion = selection.suggestion().unwrap();
    assert_eq!(suggestion.detail.id, 2);
    assert_eq!(suggestion.score.total, 8);
}

#[test]
fn equal_scores_resolve_to_lowest_detail_id() {
    let matcher = seeded_matcher();
    // Both wall junctions score 3 on host alone.
    let ctx = UsageContext::new("wall", "none", "none").unwrap();
    let candidates = matcher.candidates(&ctx).unwrap();
    let totals: Vec<(u64, u32)> = candidates
        .iter()
        .map(|c| (c.detail.id, c.score.total))
        .collect();
    assert_eq!(totals, vec![(1, 3), (3, 3)]);

    let selection = matcher.suggest(&ctx).unwrap();
    assert_eq!(selection.suggestion().unwrap().detail.id, 1);
}

#[test]
fn equal_scores_on_one_detail_resolve_to_lowest_rule_id() {
    let catalog = empty_catalog();
    let d = add_detail(&catalog, "Roof Upstand", "roof", "Upstand at parapet");
    add_rule(&catalog, d.id, "Flat Roof", "Parapet", "External");
    add_rule(&catalog, d.id, "Flat Roof", "Rooflight", "External");
    let matcher = Matcher::new(catalog);

    let ctx = UsageContext::new("flat roof", "chimney", "external").unwrap();
    let suggestion = matcher.suggest(&ctx).unwrap();
    let suggestion = suggestion.suggestion().unwrap();
    assert_eq!(suggestion.rule.id, 1);
    assert_eq!(suggestion.rule.adjacent_element, "Parapet");
}

#[test]
fn selected_score_dominates_all_candidates() {
    let matcher = seeded_matcher();
    let contexts = [
        ("wall", "slab", "external"),
        ("window", "wall", "internal"),
        ("internal", "floor", "external"),
        ("e", "a", "l"),
    ];
    for (host, adjacent, exposure) in contexts {
        let ctx = UsageContext::new(host, adjacent, exposure).unwrap();
        let candidates = matcher.candidates(&ctx).unwrap();
        assert!(candidates.iter().all(|c| c.score.total > 0));

        let Some(suggestion) = matcher.suggest(&ctx).unwrap().suggestion().cloned() else {
            assert!(candidates.is_empty());
            continue;
        };
        for other in &candidates {
            assert!(suggestion.score.total >= other.score.total);
            if other.score.total == suggestion.score.total {
                assert!(suggestion.detail.id <= other.detail.id);
            }
        }
    }
}

#[test]
fn repeated_queries_are_identical() {
    let matcher = seeded_matcher();
    let query = SearchQuery::new("wall").unwrap();
    let ctx = UsageContext::new("External Wall", "Slab", "External").unwrap();

    let first_search = matcher.search(&query).unwrap();
    let first_suggest = matcher.suggest(&ctx).unwrap();
    for _ in 0..5 {
        assert_eq!(matcher.search(&query).unwrap(), first_search);
        assert_eq!(matcher.suggest(&ctx).unwrap(), first_suggest);
    }
}

#[test]
fn custom_weights_change_the_winner() {
    let catalog = Arc::new(Catalog::open(CatalogConfig::new().with_seed(true)).unwrap());
    // Exposure-heavy weights: "external" exposure outweighs a host match.
    let cfg = MatcherConfig {
        weights: ContextWeights {
            host: 1,
            adjacent: 1,
            exposure: 10,
        },
    };
    let matcher = Matcher::with_catalog_arc(catalog, cfg).unwrap();
    let ctx = UsageContext::new("internal wall", "none", "external").unwrap();

    let suggestion = matcher.suggest(&ctx).unwrap();
    let suggestion = suggestion.suggestion().unwrap();
    assert_eq!(suggestion.detail.id, 1);
    assert_eq!(suggestion.score.total, 10);
}

#[test]
fn invalid_weights_are_rejected_at_construction() {
    let catalog = Arc::new(empty_catalog());
    let cfg = MatcherConfig {
        weights: ContextWeights {
            host: 0,
            ..ContextWeights::default()
        },
    };
    assert!(matches!(
        Matcher::with_catalog_arc(catalog, cfg),
        Err(MatchError::InvalidConfig(_))
    ));
}

#[test]
fn store_failures_propagate_unchanged() {
    let matcher = Matcher::new(Catalog::with_backend(Box::new(DownBackend)));

    let err = matcher.list_details().unwrap_err();
    assert!(matches!(err, MatchError::StoreUnavailable(CatalogError::Unavailable(_))));

    let err = matcher.search(&SearchQuery::new("wall").unwrap()).unwrap_err();
    assert!(matches!(err, MatchError::StoreUnavailable(_)));

    let ctx = UsageContext::new("a", "b", "c").unwrap();
    let err = matcher.suggest(&ctx).unwrap_err();
    assert_eq!(err.to_string(), "store unavailable: connection refused");
}
