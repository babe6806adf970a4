use std::path::Path;

use crate::diff::differ::{DiffOptions, DiffSummary, diff_with};
use crate::error::MalformedBoundsError;
use crate::geometry::bounds::Bounds;
use crate::ocr::matcher::{MatchOptions, match_ocr_with};
use crate::ocr::recognizer::{HttpRecognizer, RecordedRecognizer, TextRecognizer};
use crate::report::console::{format_diff_console, format_match_console, format_visibility_console};
use crate::report::report_model::{DiffDocument, MatchDocument, VisibilityDocument};
use crate::tree::element_tree::ElementTree;
use crate::visibility::analyzer::{VisibilityOptions, VisibilitySummary, compute_visibility_with};

// ============================================================================
// visibility subcommand
// ============================================================================

/// Where the viewport comes from, in order of precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportSource<'a> {
    Explicit(&'a str),
    Screenshot { width: i32, height: i32 },
    Inferred,
}

impl<'a> ViewportSource<'a> {
    pub fn from_args(viewport: Option<&'a str>, width: Option<i32>, height: Option<i32>) -> Self {
        match (viewport, width, height) {
            (Some(raw), _, _) => ViewportSource::Explicit(raw),
            (None, Some(width), Some(height)) => ViewportSource::Screenshot { width, height },
            _ => ViewportSource::Inferred,
        }
    }
}

/// Resolve the viewport in tree coordinates.
///
/// A screenshot size is shifted down by `status_bar_offset`; an explicit
/// viewport is taken as-is.
pub fn resolve_viewport(
    tree: &ElementTree,
    source: ViewportSource<'_>,
    status_bar_offset: i32,
) -> Result<Bounds, MalformedBoundsError> {
    match source {
        ViewportSource::Explicit(raw) => Bounds::parse_lenient(raw),
        ViewportSource::Screenshot { width, height } => {
            Ok(Bounds::from_size(width, height).translate(0, status_bar_offset))
        }
        ViewportSource::Inferred => Ok(tree.screen_bounds()),
    }
}

pub fn cmd_visibility(
    snapshot: &str,
    source: ViewportSource<'_>,
    status_bar_offset: i32,
    options: &VisibilityOptions,
    format: &str,
    output: Option<&str>,
) -> Result<VisibilitySummary, Box<dyn std::error::Error>> {
    let tree = load_tree(snapshot)?;
    let viewport = resolve_viewport(&tree, source, status_bar_offset)?;

    tracing::info!(snapshot, viewport = %viewport, elements = tree.len(), "computing visibility");

    let report = compute_visibility_with(&tree, &viewport, options);
    if let Err(e) = report.ensure_any_visible() {
        tracing::warn!("{}", e);
    }

    let doc = VisibilityDocument::build(&report, tree.warnings());
    let content = match format {
        "json" => to_json(&doc)?,
        _ => format_visibility_console(&doc),
    };
    emit(&content, output)?;

    Ok(doc.summary)
}

// ============================================================================
// diff subcommand
// ============================================================================

pub fn cmd_diff(
    before: &str,
    after: &str,
    options: &DiffOptions,
    format: &str,
    output: Option<&str>,
) -> Result<DiffSummary, Box<dyn std::error::Error>> {
    let before_tree = load_tree(before)?;
    let after_tree = load_tree(after)?;

    tracing::info!(
        before,
        after,
        max_center_distance = options.max_center_distance,
        "diffing snapshots"
    );

    let entries = diff_with(&before_tree, &after_tree, options);
    let doc = DiffDocument::build(&before_tree, &after_tree, &entries);

    let content = match format {
        "json" => to_json(&doc)?,
        _ => format_diff_console(&doc),
    };
    emit(&content, output)?;

    Ok(doc.summary)
}

// ============================================================================
// match-ocr subcommand
// ============================================================================

/// Pick the OCR source once: a recorded OCR file, or a live service.
pub fn build_recognizer(
    ocr: Option<&str>,
    endpoint: Option<&str>,
) -> Result<Box<dyn TextRecognizer>, Box<dyn std::error::Error>> {
    match (ocr, endpoint) {
        (Some(path), _) => Ok(Box::new(RecordedRecognizer::new(path))),
        (None, Some(url)) => Ok(Box::new(HttpRecognizer::new(url))),
        (None, None) => Err("match-ocr needs --ocr FILE or --endpoint URL --image FILE".into()),
    }
}

pub fn cmd_match_ocr(
    snapshot: &str,
    recognizer: &dyn TextRecognizer,
    image: Option<&str>,
    status_bar_offset: i32,
    options: &MatchOptions,
    format: &str,
    output: Option<&str>,
) -> Result<MatchDocument, Box<dyn std::error::Error>> {
    let tree = load_tree(snapshot)?;

    let blocks: Vec<_> = recognizer
        .recognize(Path::new(image.unwrap_or_default()))?
        .iter()
        .map(|b| b.translated(0, status_bar_offset))
        .collect();

    tracing::info!(snapshot, blocks = blocks.len(), "matching OCR blocks");

    let entries = match_ocr_with(&tree, &blocks, options);
    let doc = MatchDocument::build(&entries);

    let content = match format {
        "json" => to_json(&doc)?,
        _ => format_match_console(&doc),
    };
    emit(&content, output)?;

    Ok(doc)
}

// ============================================================================
// Helpers
// ============================================================================

fn load_tree(path: &str) -> Result<ElementTree, Box<dyn std::error::Error>> {
    let tree = ElementTree::from_file(path)?;
    if !tree.warnings().is_empty() {
        tracing::info!(
            snapshot = path,
            skipped = tree.warnings().len(),
            "snapshot loaded with skipped nodes"
        );
    }
    Ok(tree)
}

fn to_json<T: serde::Serialize>(doc: &T) -> Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(doc)?;
    json.push('\n');
    Ok(json)
}

/// Write to `output` when given, stdout otherwise.
fn emit(content: &str, output: Option<&str>) -> std::io::Result<()> {
    match output {
        Some(path) => std::fs::write(path, content),
        None => {
            print!("{}", content);
            Ok(())
        }
    }
}
