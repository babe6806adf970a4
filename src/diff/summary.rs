use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::tree::element_tree::ElementTree;
use crate::tree::stats::SnapshotStats;

/// Signed change of each count between two snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsDelta {
    pub total: i64,
    pub visible_to_user: i64,
    pub important: i64,
    pub with_text: i64,
    pub clickable: i64,
    pub layouts: i64,
}

impl StatsDelta {
    pub fn between(before: &SnapshotStats, after: &SnapshotStats) -> Self {
        fn delta(b: usize, a: usize) -> i64 {
            a as i64 - b as i64
        }
        Self {
            total: delta(before.total, after.total),
            visible_to_user: delta(before.visible_to_user, after.visible_to_user),
            important: delta(before.important, after.important),
            with_text: delta(before.with_text, after.with_text),
            clickable: delta(before.clickable, after.clickable),
            layouts: delta(before.layouts, after.layouts),
        }
    }
}

/// Trimmed, non-empty element texts split by which snapshot holds them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextComparison {
    pub common: Vec<String>,
    pub only_before: Vec<String>,
    pub only_after: Vec<String>,
}

impl TextComparison {
    pub fn between(before: &ElementTree, after: &ElementTree) -> Self {
        let before_texts = texts(before);
        let after_texts = texts(after);

        Self {
            common: before_texts.intersection(&after_texts).cloned().collect(),
            only_before: before_texts.difference(&after_texts).cloned().collect(),
            only_after: after_texts.difference(&before_texts).cloned().collect(),
        }
    }
}

/// Whole-snapshot comparison that complements the element-level diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotComparison {
    pub before: SnapshotStats,
    pub after: SnapshotStats,
    pub delta: StatsDelta,
    pub texts: TextComparison,
}

impl SnapshotComparison {
    pub fn between(before: &ElementTree, after: &ElementTree) -> Self {
        let before_stats = before.stats();
        let after_stats = after.stats();
        let delta = StatsDelta::between(&before_stats, &after_stats);

        Self {
            before: before_stats,
            after: after_stats,
            delta,
            texts: TextComparison::between(before, after),
        }
    }
}

fn texts(tree: &ElementTree) -> BTreeSet<String> {
    tree.flatten()
        .into_iter()
        .map(|el| el.text.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
