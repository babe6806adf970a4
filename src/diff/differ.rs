use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::tree::element::{Element, StructuralPath};
use crate::tree::element_tree::ElementTree;

// ============================================================================
// Options & result types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffOptions {
    /// Geometric pass only pairs elements whose centers are strictly closer
    /// than this many pixels.
    pub max_center_distance: f64,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            max_center_distance: 64.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffKind {
    Added,
    Removed,
    Modified,
    Unchanged,
}

/// Attributes compared between matched elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangedField {
    Text,
    ContentDescription,
    Bounds,
    ClassName,
}

/// Which pass paired the two sides of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPass {
    ResourceId,
    StructuralPath,
    Geometric,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiffEntry<'a> {
    pub kind: DiffKind,
    pub before: Option<&'a Element>,
    pub after: Option<&'a Element>,
    pub changed_fields: BTreeSet<ChangedField>,
    pub matched_by: Option<MatchPass>,
}

impl<'a> DiffEntry<'a> {
    /// Path of the element this entry is about: the `after` side when there
    /// is one, the `before` side for removals.
    pub fn path(&self) -> Option<&'a StructuralPath> {
        self.after.or(self.before).map(|el| &el.path)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
    pub unchanged: usize,
}

impl DiffSummary {
    pub fn from_entries(entries: &[DiffEntry<'_>]) -> Self {
        let mut summary = DiffSummary::default();
        for entry in entries {
            match entry.kind {
                DiffKind::Added => summary.added += 1,
                DiffKind::Removed => summary.removed += 1,
                DiffKind::Modified => summary.modified += 1,
                DiffKind::Unchanged => summary.unchanged += 1,
            }
        }
        summary
    }

    pub fn has_changes(&self) -> bool {
        self.added + self.removed + self.modified > 0
    }
}

// ============================================================================
// Public entry points
// ============================================================================

/// Match the elements of two snapshots of the same screen and classify each.
///
/// Entries follow the pre-order of `after` (added, modified, unchanged),
/// then the leftover `before` elements in their pre-order as removals.
pub fn diff<'a>(before: &'a ElementTree, after: &'a ElementTree) -> Vec<DiffEntry<'a>> {
    diff_with(before, after, &DiffOptions::default())
}

pub fn diff_with<'a>(
    before: &'a ElementTree,
    after: &'a ElementTree,
    options: &DiffOptions,
) -> Vec<DiffEntry<'a>> {
    let mut matching = Matching::new(before.flatten(), after.flatten());

    let by_id = matching.match_by_resource_id();
    let by_path = matching.match_by_path();
    let by_geometry = matching.match_by_geometry(options.max_center_distance);

    tracing::debug!(
        before = matching.before.len(),
        after = matching.after.len(),
        by_id,
        by_path,
        by_geometry,
        "matched snapshot elements"
    );

    matching.into_entries()
}

// ============================================================================
// Matching state
// ============================================================================

struct Matching<'a> {
    before: Vec<&'a Element>,
    after: Vec<&'a Element>,
    /// before index -> after index
    before_match: Vec<Option<usize>>,
    /// after index -> (before index, pass)
    after_match: Vec<Option<(usize, MatchPass)>>,
}

impl<'a> Matching<'a> {
    fn new(before: Vec<&'a Element>, after: Vec<&'a Element>) -> Self {
        let before_match = vec![None; before.len()];
        let after_match = vec![None; after.len()];
        Self {
            before,
            after,
            before_match,
            after_match,
        }
    }

    fn commit(&mut self, before: usize, after: usize, pass: MatchPass) {
        self.before_match[before] = Some(after);
        self.after_match[after] = Some((before, pass));
    }

    fn unmatched_before(&self) -> impl Iterator<Item = (usize, &'a Element)> + '_ {
        self.before
            .iter()
            .copied()
            .enumerate()
            .filter(|(i, _)| self.before_match[*i].is_none())
    }

    fn unmatched_after(&self) -> impl Iterator<Item = (usize, &'a Element)> + '_ {
        self.after
            .iter()
            .copied()
            .enumerate()
            .filter(|(i, _)| self.after_match[*i].is_none())
    }

    /// Pass 1: a `(resource_id, class)` key held by exactly one element on
    /// each side. Keys shared by several elements on either side are left
    /// for the later passes.
    fn match_by_resource_id(&mut self) -> usize {
        let mut groups: BTreeMap<(&'a str, &'a str), (Vec<usize>, Vec<usize>)> = BTreeMap::new();

        for (i, el) in self.unmatched_before() {
            if !el.resource_id.trim().is_empty() {
                groups
                    .entry((el.resource_id.as_str(), el.class_name.as_str()))
                    .or_default()
                    .0
                    .push(i);
            }
        }
        for (i, el) in self.unmatched_after() {
            if !el.resource_id.trim().is_empty() {
                groups
                    .entry((el.resource_id.as_str(), el.class_name.as_str()))
                    .or_default()
                    .1
                    .push(i);
            }
        }

        let mut matched = 0;
        for (before, after) in groups.into_values() {
            if let ([b], [a]) = (before.as_slice(), after.as_slice()) {
                self.commit(*b, *a, MatchPass::ResourceId);
                matched += 1;
            }
        }
        matched
    }

    /// Pass 2: identical structural paths.
    fn match_by_path(&mut self) -> usize {
        let before_paths: HashMap<&'a StructuralPath, usize> = self
            .unmatched_before()
            .map(|(i, el)| (&el.path, i))
            .collect();

        let pairs: Vec<(usize, usize)> = self
            .unmatched_after()
            .filter_map(|(a, el)| before_paths.get(&el.path).map(|&b| (b, a)))
            .collect();

        let mut matched = 0;
        for (b, a) in pairs {
            if self.before_match[b].is_none() && self.after_match[a].is_none() {
                self.commit(b, a, MatchPass::StructuralPath);
                matched += 1;
            }
        }
        matched
    }

    /// Pass 3: greedy nearest-center pairing among elements of the same
    /// class at the same depth, closest pair first.
    fn match_by_geometry(&mut self, max_center_distance: f64) -> usize {
        let mut buckets: HashMap<(&'a str, usize), Vec<usize>> = HashMap::new();
        for (i, el) in self.unmatched_before() {
            buckets
                .entry((el.class_name.as_str(), el.depth))
                .or_default()
                .push(i);
        }

        let mut candidates: Vec<(f64, usize, usize)> = Vec::new();
        for (a, el) in self.unmatched_after() {
            let Some(bucket) = buckets.get(&(el.class_name.as_str(), el.depth)) else {
                continue;
            };
            for &b in bucket {
                let distance = self.before[b].bounds.center_distance(&el.bounds);
                if distance < max_center_distance {
                    candidates.push((distance, a, b));
                }
            }
        }

        candidates.sort_by(|x, y| {
            x.0.total_cmp(&y.0)
                .then(x.1.cmp(&y.1))
                .then(x.2.cmp(&y.2))
        });

        let mut matched = 0;
        for (_, a, b) in candidates {
            if self.before_match[b].is_none() && self.after_match[a].is_none() {
                self.commit(b, a, MatchPass::Geometric);
                matched += 1;
            }
        }
        matched
    }

    fn into_entries(self) -> Vec<DiffEntry<'a>> {
        let mut entries = Vec::with_capacity(self.after.len() + self.before.len());

        for (a, after) in self.after.iter().copied().enumerate() {
            let entry = match self.after_match[a] {
                None => DiffEntry {
                    kind: DiffKind::Added,
                    before: None,
                    after: Some(after),
                    changed_fields: BTreeSet::new(),
                    matched_by: None,
                },
                Some((b, pass)) => {
                    let before = self.before[b];
                    let changed_fields = changed_fields(before, after);
                    let kind = if changed_fields.is_empty() {
                        DiffKind::Unchanged
                    } else {
                        DiffKind::Modified
                    };
                    DiffEntry {
                        kind,
                        before: Some(before),
                        after: Some(after),
                        changed_fields,
                        matched_by: Some(pass),
                    }
                }
            };
            entries.push(entry);
        }

        for (b, before) in self.before.iter().copied().enumerate() {
            if self.before_match[b].is_none() {
                entries.push(DiffEntry {
                    kind: DiffKind::Removed,
                    before: Some(before),
                    after: None,
                    changed_fields: BTreeSet::new(),
                    matched_by: None,
                });
            }
        }

        entries
    }
}

pub fn changed_fields(before: &Element, after: &Element) -> BTreeSet<ChangedField> {
    let mut fields = BTreeSet::new();
    if before.text != after.text {
        fields.insert(ChangedField::Text);
    }
    if before.content_description != after.content_description {
        fields.insert(ChangedField::ContentDescription);
    }
    if before.bounds != after.bounds {
        fields.insert(ChangedField::Bounds);
    }
    if before.class_name != after.class_name {
        fields.insert(ChangedField::ClassName);
    }
    fields
}
