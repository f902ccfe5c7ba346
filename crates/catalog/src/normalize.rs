//! Case-insensitive containment shared by the store filter and every scorer.
//!
//! All "does this field mention that term" checks in the workspace go through
//! [`Pattern`] or [`contains_ci`], so search, context filtering, scoring and
//! explanation can never disagree about what counts as a match.

/// Fold text for comparison. Unicode-aware lower-casing.
#[inline]
pub fn fold(text: &str) -> String {
    text.to_lowercase()
}

/// Returns `true` when `haystack` contains `needle`, ignoring case.
///
/// The match is an unanchored substring test. An empty needle matches
/// everything; callers reject empty input before reaching this point.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    Pattern::new(needle).matches(haystack)
}

/// A search term folded once and tested against many fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    raw: String,
    folded: String,
}

impl Pattern {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            folded: fold(raw),
        }
    }

    /// The term exactly as the caller supplied it.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn matches(&self, haystack: &str) -> bool {
        fold(haystack).contains(&self.folded)
    }
}
