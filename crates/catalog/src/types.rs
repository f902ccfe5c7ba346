use serde::{Deserialize, Serialize};

use crate::normalize::fold;
use crate::CatalogError;

/// Bump this value whenever the stored `Detail` or `UsageRule` layout changes.
pub const CATALOG_SCHEMA_VERSION: u16 = 1;

/// A catalog entry describing a reusable construction junction.
///
/// `id` is assigned once at creation and never changes. `tags` is kept in
/// its stored comma-delimited form so search sees exactly what was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detail {
    pub id: u64,
    pub title: String,
    pub category: String,
    pub tags: String,
    pub description: String,
}

impl Detail {
    /// Individual tags in stored order, trimmed, empty segments dropped.
    pub fn tag_list(&self) -> impl Iterator<Item = &str> {
        split_tags(&self.tags)
    }

    pub(crate) fn validate(&self) -> Result<(), CatalogError> {
        validate_detail_fields(&self.title, &self.category, &self.tags, &self.description)
    }
}

/// Fields for a detail whose id the catalog will assign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDetail {
    pub title: String,
    pub category: String,
    pub tags: String,
    pub description: String,
}

impl NewDetail {
    pub(crate) fn into_detail(self, id: u64) -> Detail {
        Detail {
            id,
            title: self.title,
            category: self.category,
            tags: self.tags,
            description: self.description,
        }
    }
}

/// Describes where a detail applies. Owned by exactly one [`Detail`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRule {
    pub id: u64,
    pub detail_id: u64,
    pub host_element: String,
    pub adjacent_element: String,
    pub exposure: String,
}

impl UsageRule {
    pub(crate) fn validate(&self) -> Result<(), CatalogError> {
        require_non_empty("host_element", &self.host_element)?;
        require_non_empty("adjacent_element", &self.adjacent_element)?;
        require_non_empty("exposure", &self.exposure)
    }
}

/// Fields for a usage rule whose id the catalog will assign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUsageRule {
    pub detail_id: u64,
    pub host_element: String,
    pub adjacent_element: String,
    pub exposure: String,
}

impl NewUsageRule {
    pub(crate) fn into_rule(self, id: u64) -> UsageRule {
        UsageRule {
            id,
            detail_id: self.detail_id,
            host_element: self.host_element,
            adjacent_element: self.adjacent_element,
            exposure: self.exposure,
        }
    }
}

/// Versioned envelope written to the backend.
#[derive(Serialize, Deserialize)]
pub(crate) struct Stored<T> {
    pub(crate) schema_version: u16,
    pub(crate) record: T,
}

fn split_tags(tags: &str) -> impl Iterator<Item = &str> {
    tags.split(',').map(str::trim).filter(|tag| !tag.is_empty())
}

fn require_non_empty(field: &str, value: &str) -> Result<(), CatalogError> {
    if value.trim().is_empty() {
        return Err(CatalogError::InvalidRecord(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}

fn validate_detail_fields(
    title: &str,
    category: &str,
    tags: &str,
    description: &str,
) -> Result<(), CatalogError> {
    require_non_empty("title", title)?;
    require_non_empty("category", category)?;
    require_non_empty("tags", tags)?;
    require_non_empty("description", description)?;

    let mut seen = std::collections::HashSet::new();
    for tag in split_tags(tags) {
        if !seen.insert(fold(tag)) {
            return Err(CatalogError::InvalidRecord(format!(
                "duplicate tag '{tag}'"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(tags: &str) -> Detail {
        Detail {
            id: 7,
            title: "Parapet Capping".into(),
            category: "Roof".into(),
            tags: tags.into(),
            description: "Metal capping over parapet wall".into(),
        }
    }

    #[test]
    fn tag_list_preserves_stored_order() {
        let d = detail("roof, parapet ,capping,,metal");
        let tags: Vec<&str> = d.tag_list().collect();
        assert_eq!(tags, vec!["roof", "parapet", "capping", "metal"]);
    }

    #[test]
    fn duplicate_tags_are_rejected_case_insensitively() {
        let err = detail("roof,Parapet,parapet").validate().unwrap_err();
        assert!(matches!(err, CatalogError::InvalidRecord(msg) if msg.contains("duplicate tag")));
    }

    #[test]
    fn blank_fields_are_rejected() {
        let mut d = detail("roof");
        d.description = "   ".into();
        let err = d.validate().unwrap_err();
        assert!(matches!(err, CatalogError::InvalidRecord(msg) if msg.contains("description")));

        let rule = UsageRule {
            id: 1,
            detail_id: 7,
            host_element: "Roof".into(),
            adjacent_element: "".into(),
            exposure: "External".into(),
        };
        let err = rule.validate().unwrap_err();
        assert!(matches!(err, CatalogError::InvalidRecord(msg) if msg.contains("adjacent_element")));
    }

    #[test]
    fn detail_serializes_with_flat_fields() {
        let json = serde_json::to_value(detail("roof")).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["tags"], "roof");
        assert_eq!(json.as_object().unwrap().len(), 5);
    }
}
