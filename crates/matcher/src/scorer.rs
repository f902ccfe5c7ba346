//! Pure scoring functions, separate from retrieval so ranking can be tested
//! without a store.

use catalog::{Detail, UsageRule};

use crate::types::{ContextScore, ContextWeights, SearchQuery, Tier, UsageContext};

/// Scores one record against one query. `None` excludes the record.
pub trait Scorer {
    type Query;
    type Record;
    type Score;

    fn score(&self, query: &Self::Query, record: &Self::Record) -> Option<Self::Score>;
}

/// Ranks a detail by the most important field that mentions the query.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextScorer;

impl Scorer for TextScorer {
    type Query = SearchQuery;
    type Record = Detail;
    type Score = Tier;

    fn score(&self, query: &SearchQuery, detail: &Detail) -> Option<Tier> {
        let pattern = query.pattern();
        if pattern.matches(&detail.title) {
            Some(Tier::Title)
        } else if pattern.matches(&detail.tags) {
            Some(Tier::Tags)
        } else if pattern.matches(&detail.description) {
            Some(Tier::Description)
        } else {
            None
        }
    }
}

/// Weighted relevance of a usage rule to a context.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextScorer {
    weights: ContextWeights,
}

impl ContextScorer {
    pub fn new(weights: ContextWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ContextWeights {
        &self.weights
    }
}

impl Scorer for ContextScorer {
    type Query = UsageContext;
    type Record = UsageRule;
    type Score = ContextScore;

    fn score(&self, context: &UsageContext, rule: &UsageRule) -> Option<ContextScore> {
        let host = context.host_pattern().matches(&rule.host_element);
        let adjacent = context.adjacent_pattern().matches(&rule.adjacent_element);
        let exposure = context.exposure_pattern().matches(&rule.exposure);

        let total = u32::from(host) * self.weights.host
            + u32::from(adjacent) * self.weights.adjacent
            + u32::from(exposure) * self.weights.exposure;

        (total > 0).then_some(ContextScore {
            host,
            adjacent,
            exposure,
            total,
        })
    }
}
