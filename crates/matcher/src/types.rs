use catalog::normalize::Pattern;
use catalog::{CatalogError, Detail, UsageRule};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Field names a context request must carry, in response order.
pub const REQUIRED_CONTEXT_FIELDS: [&str; 3] = ["host_element", "adjacent_element", "exposure"];

/// A validated free-text search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pattern: Pattern,
}

impl SearchQuery {
    /// Only the empty string is rejected; whitespace is a legitimate term.
    pub fn new(q: &str) -> Result<Self, MatchError> {
        if q.is_empty() {
            return Err(MatchError::InvalidQuery(
                "search query must not be empty".into(),
            ));
        }
        Ok(Self {
            pattern: Pattern::new(q),
        })
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    pub(crate) fn pattern(&self) -> &Pattern {
        &self.pattern
    }
}

/// The architectural situation a client wants a detail for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageContext {
    host: Pattern,
    adjacent: Pattern,
    exposure: Pattern,
}

impl UsageContext {
    pub fn new(host: &str, adjacent: &str, exposure: &str) -> Result<Self, MatchError> {
        if host.is_empty() || adjacent.is_empty() || exposure.is_empty() {
            return Err(MatchError::InvalidQuery(format!(
                "missing required fields: {}",
                REQUIRED_CONTEXT_FIELDS.join(", ")
            )));
        }
        Ok(Self {
            host: Pattern::new(host),
            adjacent: Pattern::new(adjacent),
            exposure: Pattern::new(exposure),
        })
    }

    pub fn host(&self) -> &str {
        self.host.as_str()
    }

    pub fn adjacent(&self) -> &str {
        self.adjacent.as_str()
    }

    pub fn exposure(&self) -> &str {
        self.exposure.as_str()
    }

    pub(crate) fn host_pattern(&self) -> &Pattern {
        &self.host
    }

    pub(crate) fn adjacent_pattern(&self) -> &Pattern {
        &self.adjacent
    }

    pub(crate) fn exposure_pattern(&self) -> &Pattern {
        &self.exposure
    }
}

/// Which field a text search hit came from. Lower ranks first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Title = 1,
    Tags = 2,
    Description = 3,
}

impl Tier {
    pub fn rank(self) -> u8 {
        self as u8
    }
}

/// Per-field weights for context scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextWeights {
    #[serde(default = "ContextWeights::default_host")]
    pub host: u32,
    #[serde(default = "ContextWeights::default_adjacent")]
    pub adjacent: u32,
    #[serde(default = "ContextWeights::default_exposure")]
    pub exposure: u32,
}

impl ContextWeights {
    fn default_host() -> u32 {
        3
    }

    fn default_adjacent() -> u32 {
        3
    }

    fn default_exposure() -> u32 {
        2
    }

    /// Highest score a single rule can reach.
    pub fn max_score(&self) -> u32 {
        self.host + self.adjacent + self.exposure
    }

    /// Every weight must be positive, otherwise a rule that passes the store
    /// filter could score zero and silently drop out.
    pub fn validate(&self) -> Result<(), MatchError> {
        for (name, weight) in [
            ("host", self.host),
            ("adjacent", self.adjacent),
            ("exposure", self.exposure),
        ] {
            if weight == 0 {
                return Err(MatchError::InvalidConfig(format!(
                    "{name} weight must be greater than zero"
                )));
            }
        }
        Ok(())
    }
}

impl Default for ContextWeights {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            adjacent: Self::default_adjacent(),
            exposure: Self::default_exposure(),
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatcherConfig {
    #[serde(default)]
    pub weights: ContextWeights,
}

impl MatcherConfig {
    pub fn validate(&self) -> Result<(), MatchError> {
        self.weights.validate()
    }
}

/// Breakdown of a context score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContextScore {
    pub host: bool,
    pub adjacent: bool,
    pub exposure: bool,
    pub total: u32,
}

/// A detail returned by text search, with the tier it matched at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedDetail {
    pub detail: Detail,
    pub tier: Tier,
}

/// A usage rule that scored above zero for a context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredCandidate {
    pub detail: Detail,
    pub rule: UsageRule,
    pub score: ContextScore,
}

/// The single best detail for a context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub detail: Detail,
    /// The rule that produced the match; its fields are the usage context.
    pub rule: UsageRule,
    pub score: ContextScore,
    pub explanation: String,
}

/// Outcome of a suggestion request. `NoMatch` is a valid answer, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Suggested(Suggestion),
    NoMatch { explanation: String },
}

impl Selection {
    pub fn suggestion(&self) -> Option<&Suggestion> {
        match self {
            Selection::Suggested(suggestion) => Some(suggestion),
            Selection::NoMatch { .. } => None,
        }
    }

    pub fn explanation(&self) -> &str {
        match self {
            Selection::Suggested(suggestion) => &suggestion.explanation,
            Selection::NoMatch { explanation } => explanation,
        }
    }
}

/// Errors produced by the matching layer.
#[derive(Debug, Error)]
pub enum MatchError {
    /// Missing or empty required input. Reported to clients, never retried.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    #[error("invalid matcher config: {0}")]
    InvalidConfig(String),
    /// The catalog could not be read.
    #[error(transparent)]
    StoreUnavailable(#[from] CatalogError),
}
