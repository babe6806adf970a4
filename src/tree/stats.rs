use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tree::element::Element;

/// Element counts for one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotStats {
    pub total: usize,
    pub visible_to_user: usize,
    pub important: usize,
    pub with_text: usize,
    pub clickable: usize,
    pub layouts: usize,
    pub by_class: BTreeMap<String, usize>,
}

impl SnapshotStats {
    pub fn collect(elements: &[&Element]) -> Self {
        let mut stats = SnapshotStats {
            total: elements.len(),
            ..Default::default()
        };

        for el in elements {
            if el.visible_to_user {
                stats.visible_to_user += 1;
            }
            if el.important {
                stats.important += 1;
            }
            if el.has_text() {
                stats.with_text += 1;
            }
            if el.clickable {
                stats.clickable += 1;
            }
            if el.is_layout() {
                stats.layouts += 1;
            }
            *stats.by_class.entry(el.class_name.clone()).or_insert(0) += 1;
        }

        stats
    }
}
