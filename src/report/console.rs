use crate::diff::differ::{ChangedField, DiffKind};
use crate::report::report_model::{DiffDocument, MatchDocument, VisibilityDocument};
use crate::visibility::analyzer::VisibilityClass;

// ============================================================================
// Console reporter: formatted terminal output
// ============================================================================

/// Format a visibility document for terminal output.
///
/// Produces output like:
/// ```text
/// === Visibility in [0,0][1080,1920] ===
///
///   FULL     100.0%  hierarchy[0]/android.widget.FrameLayout[0]  "Settings"
///   PART      25.0%  hierarchy[0]/.../android.widget.Button[1]  "OK"
///
/// === 1 full, 1 partial, 0 hidden (2 total) ===
/// ```
pub fn format_visibility_console(doc: &VisibilityDocument) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Visibility in {} ===\n\n", doc.viewport));

    for warning in &doc.warnings {
        out.push_str(&format!("  [WARN] {}\n", warning));
    }
    if !doc.warnings.is_empty() {
        out.push('\n');
    }

    for record in &doc.elements {
        let marker = match record.visibility {
            VisibilityClass::Full => "FULL  ",
            VisibilityClass::Partial => "PART  ",
            VisibilityClass::Hidden => "HIDDEN",
        };
        out.push_str(&format!(
            "  {}  {:>6.1}%  {}  \"{}\"",
            marker,
            record.visible_ratio * 100.0,
            record.path,
            record.label
        ));
        if !record.offscreen_edges.is_empty() {
            let edges: Vec<String> = record
                .offscreen_edges
                .iter()
                .map(|e| format!("{:?}", e).to_lowercase())
                .collect();
            out.push_str(&format!("  (off {})", edges.join(", ")));
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "\n=== {} full, {} partial, {} hidden ({} total) ===\n",
        doc.summary.full, doc.summary.partial, doc.summary.hidden, doc.summary.total
    ));

    out
}

/// Format a diff document; unchanged entries are summarized, not listed.
pub fn format_diff_console(doc: &DiffDocument) -> String {
    let mut out = String::new();

    out.push_str("=== Snapshot diff ===\n");
    out.push_str(&format!(
        "before {}  after {}{}\n\n",
        short(&doc.before_fingerprint),
        short(&doc.after_fingerprint),
        if doc.identical { "  (identical)" } else { "" }
    ));

    for record in &doc.entries {
        let (marker, label) = match record.kind {
            DiffKind::Added => ("+ ADDED   ", record.after.as_ref().map(|e| e.label.as_str())),
            DiffKind::Removed => ("- REMOVED ", record.before.as_ref().map(|e| e.label.as_str())),
            DiffKind::Modified => ("~ MODIFIED", record.after.as_ref().map(|e| e.label.as_str())),
            DiffKind::Unchanged => continue,
        };
        out.push_str(&format!(
            "  {}  {}  \"{}\"\n",
            marker,
            record.path,
            label.unwrap_or_default()
        ));

        if record.kind == DiffKind::Modified {
            if let (Some(before), Some(after)) = (&record.before, &record.after) {
                for field in &record.changed_fields {
                    let (old, new) = match field {
                        ChangedField::Text => (before.text.clone(), after.text.clone()),
                        ChangedField::ContentDescription => (
                            before.content_description.clone(),
                            after.content_description.clone(),
                        ),
                        ChangedField::Bounds => {
                            (before.bounds.to_string(), after.bounds.to_string())
                        }
                        ChangedField::ClassName => {
                            (before.class_name.clone(), after.class_name.clone())
                        }
                    };
                    out.push_str(&format!("      {:?}: \"{}\" -> \"{}\"\n", field, old, new));
                }
            }
        }
    }

    let c = &doc.comparison;
    out.push_str(&format!(
        "\n{:<16} {:>8} {:>8} {:>8}\n",
        "", "before", "after", "delta"
    ));
    let rows = [
        ("elements", c.before.total, c.after.total, c.delta.total),
        ("visible", c.before.visible_to_user, c.after.visible_to_user, c.delta.visible_to_user),
        ("important", c.before.important, c.after.important, c.delta.important),
        ("with text", c.before.with_text, c.after.with_text, c.delta.with_text),
        ("clickable", c.before.clickable, c.after.clickable, c.delta.clickable),
    ];
    for (name, before, after, delta) in rows {
        out.push_str(&format!("{:<16} {:>8} {:>8} {:>+8}\n", name, before, after, delta));
    }

    out.push_str(&format!(
        "\ntexts: {} common, {} only before, {} only after\n",
        c.texts.common.len(),
        c.texts.only_before.len(),
        c.texts.only_after.len()
    ));

    out.push_str(&format!(
        "\n=== {} added, {} removed, {} modified, {} unchanged ===\n",
        doc.summary.added, doc.summary.removed, doc.summary.modified, doc.summary.unchanged
    ));

    out
}

pub fn format_match_console(doc: &MatchDocument) -> String {
    let mut out = String::new();

    out.push_str("=== OCR matches ===\n\n");

    for record in &doc.entries {
        match (&record.text_block, &record.element) {
            (Some(block), Some(element)) => {
                out.push_str(&format!(
                    "  \"{}\" {} -> {} ({:.0}% inside",
                    block.text,
                    block.bounds,
                    element.path,
                    record.overlap_ratio * 100.0
                ));
                if let Some(similarity) = record.similarity {
                    out.push_str(&format!(", text similarity {:.2}", similarity));
                }
                out.push_str(")\n");
            }
            (Some(block), None) => {
                out.push_str(&format!("  \"{}\" {} -> free text\n", block.text, block.bounds));
            }
            (None, Some(element)) => {
                out.push_str(&format!(
                    "  (no OCR text) {} \"{}\"\n",
                    element.path, element.label
                ));
            }
            (None, None) => {}
        }
    }

    out.push_str(&format!(
        "\n=== {} blocks: {} matched, {} free text ===\n",
        doc.blocks, doc.matched, doc.free_text
    ));

    out
}

fn short(fingerprint: &str) -> &str {
    fingerprint.get(..12).unwrap_or(fingerprint)
}
