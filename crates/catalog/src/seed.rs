//! Reference records a fresh catalog is provisioned with.

use crate::{Detail, UsageRule};

pub fn default_details() -> Vec<Detail> {
    vec![
        detail(
            1,
            "External Wall – Slab Junction",
            "Waterproofing",
            "wall,slab,waterproofing,external",
            "Waterproof membrane continuity at external wall and slab junction",
        ),
        detail(
            2,
            "Window Sill Detail with Drip",
            "Window",
            "window,sill,drip,external",
            "External window sill detail with drip groove",
        ),
        detail(
            3,
            "Internal Wall – Floor Junction",
            "Wall",
            "wall,floor,internal",
            "Junction detail between internal wall and finished floor",
        ),
    ]
}

pub fn default_rules() -> Vec<UsageRule> {
    vec![
        rule(1, 1, "External Wall", "Slab", "External"),
        rule(2, 2, "Window", "External Wall", "External"),
        rule(3, 3, "Internal Wall", "Floor", "Internal"),
    ]
}

fn detail(id: u64, title: &str, category: &str, tags: &str, description: &str) -> Detail {
    Detail {
        id,
        title: title.to_string(),
        category: category.to_string(),
        tags: tags.to_string(),
        description: description.to_string(),
    }
}

fn rule(id: u64, detail_id: u64, host: &str, adjacent: &str, exposure: &str) -> UsageRule {
    UsageRule {
        id,
        detail_id,
        host_element: host.to_string(),
        adjacent_element: adjacent.to_string(),
        exposure: exposure.to_string(),
    }
}
