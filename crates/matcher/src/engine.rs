use std::sync::Arc;
use std::time::Instant;

use catalog::{Catalog, CatalogConfig, Detail};

use crate::explain::{explain, NO_MATCH_EXPLANATION};
use crate::scorer::{ContextScorer, Scorer, TextScorer};
use crate::types::{
    MatchError, MatcherConfig, RankedDetail, ScoredCandidate, SearchQuery, Selection, Suggestion,
    UsageContext,
};

#[cfg(test)]
mod tests;

/// Runs retrieval against the catalog and ranks what comes back.
///
/// Holds no per-request state; one instance is shared by every request.
pub struct Matcher {
    catalog: Arc<Catalog>,
    text: TextScorer,
    context: ContextScorer,
}

impl Matcher {
    /// Construct a matcher that owns its catalog, using default weights.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            text: TextScorer,
            context: ContextScorer::default(),
        }
    }

    /// Construct a matcher from a shared catalog handle and explicit config.
    pub fn with_catalog_arc(
        catalog: Arc<Catalog>,
        cfg: MatcherConfig,
    ) -> Result<Self, MatchError> {
        cfg.validate()?;
        Ok(Self {
            catalog,
            text: TextScorer,
            context: ContextScorer::new(cfg.weights),
        })
    }

    /// Convenience helper: seeded in-memory catalog with default weights.
    pub fn in_memory_seeded() -> Result<Self, MatchError> {
        let catalog = Catalog::open(CatalogConfig::new().with_seed(true))?;
        Ok(Self::new(catalog))
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Every detail, ascending by id.
    pub fn list_details(&self) -> Result<Vec<Detail>, MatchError> {
        let details = self.catalog.list_all()?;
        tracing::debug!(count = details.len(), "listed details");
        Ok(details)
    }

    /// Free-text search ordered by tier, then id.
    pub fn search(&self, query: &SearchQuery) -> Result<Vec<RankedDetail>, MatchError> {
        let start = Instant::now();
        let candidates = self.catalog.find_by_text(query.as_str())?;
        let candidate_count = candidates.len();

        let mut ranked: Vec<RankedDetail> = candidates
            .into_iter()
            .filter_map(|detail| {
                self.text
                    .score(query, &detail)
                    .map(|tier| RankedDetail { detail, tier })
            })
            .collect();
        ranked.sort_by_key(|hit| (hit.tier, hit.detail.id));

        tracing::debug!(
            query = query.as_str(),
            candidates = candidate_count,
            hits = ranked.len(),
            best_tier = ranked.first().map_or(0, |hit| hit.tier.rank()),
            latency_us = start.elapsed().as_micros() as u64,
            "text search"
        );
        Ok(ranked)
    }

    /// All rules scoring above zero for `context`, best first: highest score,
    /// then lowest detail id, then lowest rule id.
    pub fn candidates(&self, context: &UsageContext) -> Result<Vec<ScoredCandidate>, MatchError> {
        let pairs = self.catalog.find_rules_by_context(
            context.host(),
            context.adjacent(),
            context.exposure(),
        )?;

        let mut scored: Vec<ScoredCandidate> = pairs
            .into_iter()
            .filter_map(|(detail, rule)| {
                self.context
                    .score(context, &rule)
                    .map(|score| ScoredCandidate {
                        detail,
                        rule,
                        score,
                    })
            })
            .collect();
        scored.sort_by(|a, b| {
            b.score
                .total
                .cmp(&a.score.total)
                .then(a.detail.id.cmp(&b.detail.id))
                .then(a.rule.id.cmp(&b.rule.id))
        });
        Ok(scored)
    }

    /// Pick the single best detail for `context` and explain the choice.
    pub fn suggest(&self, context: &UsageContext) -> Result<Selection, MatchError> {
        let start = Instant::now();
        let candidates = self.candidates(context)?;
        let candidate_count = candidates.len();

        let Some(best) = candidates.into_iter().next() else {
            tracing::info!(
                host = context.host(),
                adjacent = context.adjacent(),
                exposure = context.exposure(),
                "no detail matches context"
            );
            return Ok(Selection::NoMatch {
                explanation: NO_MATCH_EXPLANATION.to_string(),
            });
        };

        let explanation = explain(&best.detail, &best.rule, context);
        tracing::info!(
            detail_id = best.detail.id,
            rule_id = best.rule.id,
            score = best.score.total,
            candidates = candidate_count,
            latency_us = start.elapsed().as_micros() as u64,
            "detail suggested"
        );

        Ok(Selection::Suggested(Suggestion {
            detail: best.detail,
            rule: best.rule,
            score: best.score,
            explanation,
        }))
    }
}
