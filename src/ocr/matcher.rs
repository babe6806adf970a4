use std::cmp::Ordering;

use crate::ocr::block::{OcrTextBlock, TextKind};
use crate::ocr::consolidate::consolidate_blocks;
use crate::ocr::similarity::text_similarity;
use crate::tree::element::Element;
use crate::tree::element_tree::ElementTree;

// ============================================================================
// Options & result types
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct MatchOptions {
    /// Smallest share of a block that must lie inside an element.
    pub min_overlap: f64,
    /// Blocks recognized with lower confidence are ignored.
    pub min_confidence: f64,
    /// Inserted between the texts of merged blocks.
    pub join_separator: String,
    /// Also list text-bearing leaves that no block landed on.
    pub report_unmatched_elements: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            min_overlap: 0.5,
            min_confidence: 0.0,
            join_separator: String::new(),
            report_unmatched_elements: false,
        }
    }
}

/// Pairing of a (consolidated) OCR block with a tree element.
///
/// A block without an element is free text; an element without a block is
/// only listed when `report_unmatched_elements` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchEntry<'a> {
    pub element: Option<&'a Element>,
    pub text_block: Option<OcrTextBlock>,
    /// `overlap_ratio(block, element)`; for free text, the best ratio seen.
    pub overlap_ratio: f64,
    /// Diagnostic only: similarity of the block text to the element's own
    /// text, when the element has any.
    pub similarity: Option<f64>,
}

impl MatchEntry<'_> {
    pub fn is_free_text(&self) -> bool {
        self.element.is_none() && self.text_block.is_some()
    }

    pub fn text_kind(&self) -> Option<TextKind> {
        self.text_block.as_ref().map(OcrTextBlock::text_kind)
    }
}

// ============================================================================
// Matching
// ============================================================================

pub fn match_ocr<'a>(tree: &'a ElementTree, blocks: &[OcrTextBlock]) -> Vec<MatchEntry<'a>> {
    match_ocr_with(tree, blocks, &MatchOptions::default())
}

pub fn match_ocr_with<'a>(
    tree: &'a ElementTree,
    blocks: &[OcrTextBlock],
    options: &MatchOptions,
) -> Vec<MatchEntry<'a>> {
    if blocks.is_empty() {
        return Vec::new();
    }

    let usable: Vec<OcrTextBlock> = blocks
        .iter()
        .filter(|b| b.confidence >= options.min_confidence && !b.text.trim().is_empty())
        .cloned()
        .collect();
    let consolidated = consolidate_blocks(&usable, &options.join_separator);

    let elements = tree.flatten();
    let mut claimed = vec![false; elements.len()];
    let mut entries = Vec::with_capacity(consolidated.len());

    for block in consolidated {
        match best_element(&block, &elements, options.min_overlap) {
            Best::Matched { index, ratio } => {
                claimed[index] = true;
                let element = elements[index];
                let similarity = element
                    .has_text()
                    .then(|| text_similarity(&block.text, &element.text));
                entries.push(MatchEntry {
                    element: Some(element),
                    text_block: Some(block),
                    overlap_ratio: ratio,
                    similarity,
                });
            }
            Best::FreeText { best_ratio } => {
                tracing::debug!(text = %block.text, bounds = %block.bounds, "free OCR text");
                entries.push(MatchEntry {
                    element: None,
                    text_block: Some(block),
                    overlap_ratio: best_ratio,
                    similarity: None,
                });
            }
        }
    }

    if options.report_unmatched_elements {
        for (index, element) in elements.iter().copied().enumerate() {
            if !claimed[index] && element.has_text() && element.is_leaf() {
                entries.push(MatchEntry {
                    element: Some(element),
                    text_block: None,
                    overlap_ratio: 0.0,
                    similarity: None,
                });
            }
        }
    }

    entries
}

enum Best {
    Matched { index: usize, ratio: f64 },
    FreeText { best_ratio: f64 },
}

struct Candidate {
    index: usize,
    ratio: f64,
    leafish: bool,
    area: i64,
}

const RATIO_EPSILON: f64 = 1e-9;

/// Leaf-ish elements first, then highest overlap, then the narrower
/// element, then document order.
fn rank(a: &Candidate, b: &Candidate) -> Ordering {
    b.leafish
        .cmp(&a.leafish)
        .then_with(|| {
            if (a.ratio - b.ratio).abs() < RATIO_EPSILON {
                Ordering::Equal
            } else {
                b.ratio.total_cmp(&a.ratio)
            }
        })
        .then(a.area.cmp(&b.area))
        .then(a.index.cmp(&b.index))
}

fn best_element(block: &OcrTextBlock, elements: &[&Element], min_overlap: f64) -> Best {
    let mut best_ratio: f64 = 0.0;
    let mut best: Option<Candidate> = None;

    for (index, el) in elements.iter().enumerate() {
        let ratio = block.bounds.overlap_ratio(&el.bounds);
        best_ratio = best_ratio.max(ratio);
        if ratio < min_overlap || ratio <= 0.0 {
            continue;
        }

        let candidate = Candidate {
            index,
            ratio,
            leafish: el.is_leafish(),
            area: el.bounds.area(),
        };
        best = match best {
            Some(current) if rank(&current, &candidate) != Ordering::Greater => Some(current),
            _ => Some(candidate),
        };
    }

    match best {
        Some(c) => Best::Matched {
            index: c.index,
            ratio: c.ratio,
        },
        None => Best::FreeText { best_ratio },
    }
}
