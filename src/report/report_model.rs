use serde::{Deserialize, Serialize};

use crate::diff::differ::{ChangedField, DiffEntry, DiffKind, DiffSummary, MatchPass};
use crate::diff::summary::SnapshotComparison;
use crate::geometry::bounds::Bounds;
use crate::ocr::block::{OcrTextBlock, TextKind};
use crate::ocr::matcher::MatchEntry;
use crate::tree::element::Element;
use crate::tree::element_tree::ElementTree;
use crate::tree::parser::ParseWarning;
use crate::visibility::analyzer::{
    Edge, Visibility, VisibilityClass, VisibilityReport, VisibilitySummary,
};

// ============================================================================
// Plain output records
//
// Everything here is data only, so presentation layers (console, JSON,
// HTML) can consume results without touching the analysis types.
// ============================================================================

/// An element without its subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSummary {
    pub path: String,
    pub class_name: String,
    pub label: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub text: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub content_description: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub resource_id: String,
    pub bounds: Bounds,
}

impl From<&Element> for ElementSummary {
    fn from(el: &Element) -> Self {
        Self {
            path: el.path.to_string(),
            class_name: el.class_name.clone(),
            label: el.label(),
            text: el.text.clone(),
            content_description: el.content_description.clone(),
            resource_id: el.resource_id.clone(),
            bounds: el.bounds,
        }
    }
}

// ============================================================================
// Visibility
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilityRecord {
    pub path: String,
    pub label: String,
    pub visible_ratio: f64,
    pub visible_bounds: Option<Bounds>,
    pub visibility: VisibilityClass,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub offscreen_edges: Vec<Edge>,
    pub declared_visible: bool,
}

impl From<&Visibility<'_>> for VisibilityRecord {
    fn from(v: &Visibility<'_>) -> Self {
        Self {
            path: v.element.path.to_string(),
            label: v.element.label(),
            visible_ratio: v.visible_ratio,
            visible_bounds: v.visible_bounds,
            visibility: v.class,
            offscreen_edges: v.offscreen_edges.clone(),
            declared_visible: v.element.visible_to_user,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilityDocument {
    pub viewport: Bounds,
    pub summary: VisibilitySummary,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<String>,
    pub elements: Vec<VisibilityRecord>,
}

impl VisibilityDocument {
    pub fn build(report: &VisibilityReport<'_>, warnings: &[ParseWarning]) -> Self {
        Self {
            viewport: report.viewport(),
            summary: report.summary(),
            warnings: warnings.iter().map(|w| w.to_string()).collect(),
            elements: report.entries().iter().map(VisibilityRecord::from).collect(),
        }
    }
}

// ============================================================================
// Diff
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffRecord {
    pub kind: DiffKind,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub before: Option<ElementSummary>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub after: Option<ElementSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub changed_fields: Vec<ChangedField>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub matched_by: Option<MatchPass>,
}

impl From<&DiffEntry<'_>> for DiffRecord {
    fn from(entry: &DiffEntry<'_>) -> Self {
        Self {
            kind: entry.kind,
            path: entry.path().map(|p| p.to_string()).unwrap_or_default(),
            before: entry.before.map(ElementSummary::from),
            after: entry.after.map(ElementSummary::from),
            changed_fields: entry.changed_fields.iter().copied().collect(),
            matched_by: entry.matched_by,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffDocument {
    pub before_fingerprint: String,
    pub after_fingerprint: String,
    pub identical: bool,
    pub summary: DiffSummary,
    pub comparison: SnapshotComparison,
    pub entries: Vec<DiffRecord>,
}

impl DiffDocument {
    pub fn build(before: &ElementTree, after: &ElementTree, entries: &[DiffEntry<'_>]) -> Self {
        let before_fingerprint = before.fingerprint();
        let after_fingerprint = after.fingerprint();
        Self {
            identical: before_fingerprint == after_fingerprint,
            before_fingerprint,
            after_fingerprint,
            summary: DiffSummary::from_entries(entries),
            comparison: SnapshotComparison::between(before, after),
            entries: entries.iter().map(DiffRecord::from).collect(),
        }
    }
}

// ============================================================================
// OCR matches
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub element: Option<ElementSummary>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub text_block: Option<OcrTextBlock>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub text_kind: Option<TextKind>,
    pub overlap_ratio: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub similarity: Option<f64>,
}

impl From<&MatchEntry<'_>> for MatchRecord {
    fn from(entry: &MatchEntry<'_>) -> Self {
        Self {
            element: entry.element.map(ElementSummary::from),
            text_block: entry.text_block.clone(),
            text_kind: entry.text_kind(),
            overlap_ratio: entry.overlap_ratio,
            similarity: entry.similarity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDocument {
    pub blocks: usize,
    pub matched: usize,
    pub free_text: usize,
    pub unmatched_elements: usize,
    pub entries: Vec<MatchRecord>,
}

impl MatchDocument {
    pub fn build(entries: &[MatchEntry<'_>]) -> Self {
        let blocks = entries.iter().filter(|e| e.text_block.is_some()).count();
        let free_text = entries.iter().filter(|e| e.is_free_text()).count();
        let unmatched_elements = entries.iter().filter(|e| e.text_block.is_none()).count();
        Self {
            blocks,
            matched: blocks - free_text,
            free_text,
            unmatched_elements,
            entries: entries.iter().map(MatchRecord::from).collect(),
        }
    }
}
