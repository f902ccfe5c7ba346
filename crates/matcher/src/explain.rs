//! Templated justification for a selected detail.

use catalog::normalize::contains_ci;
use catalog::{Detail, UsageRule};

use crate::types::UsageContext;

pub const NO_MATCH_EXPLANATION: &str = "No matching detail found for the given context.";

/// Build the explanation for `detail` chosen through `rule`.
///
/// Each clause is re-checked against the rule independently of the score
/// that selected it. When no clause holds the sentence keeps its frame and
/// lists nothing.
pub fn explain(detail: &Detail, rule: &UsageRule, context: &UsageContext) -> String {
    let mut clauses = Vec::with_capacity(3);
    if contains_ci(&rule.host_element, context.host()) {
        clauses.push(format!(
            "compatible with {} as host element",
            context.host()
        ));
    }
    if contains_ci(&rule.adjacent_element, context.adjacent()) {
        clauses.push(format!(
            "works with {} as adjacent element",
            context.adjacent()
        ));
    }
    if contains_ci(&rule.exposure, context.exposure()) {
        clauses.push(format!("suitable for {} exposure", context.exposure()));
    }

    format!(
        "This detail ({}) is recommended because it is {}.",
        detail.title,
        clauses.join(" and ")
    )
}
