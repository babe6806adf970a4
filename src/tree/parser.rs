use std::collections::HashMap;
use std::fmt;

use roxmltree::{Document, Node};

use crate::error::{MalformedBoundsError, SnapshotParseError};
use crate::geometry::bounds::Bounds;
use crate::tree::element::{Element, StructuralPath};
use crate::tree::element_tree::ElementTree;

/// A node the parser dropped because its bounds were unusable.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseWarning {
    pub error: MalformedBoundsError,
    /// 1-based position of the node's start tag.
    pub line: u32,
    pub column: u32,
    /// Path of the parent the node's children were attached to.
    pub parent: StructuralPath,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: node under {} skipped: {}",
            self.line, self.column, self.parent, self.error
        )
    }
}

/// Parse a UI snapshot document into an [`ElementTree`].
///
/// Only document-level XML errors fail the parse. A node with missing or
/// malformed bounds is dropped with a warning and its children are attached
/// to its parent in its place.
pub fn parse_snapshot(xml: &str) -> Result<ElementTree, SnapshotParseError> {
    let doc = Document::parse(xml)?;
    let root_node = doc.root_element();

    let mut warnings = Vec::new();
    let class_name = class_of(root_node);
    let path = StructuralPath::root(&class_name);

    let declared = match root_node.attribute("bounds") {
        Some(raw) => match Bounds::parse_lenient(raw) {
            Ok(b) => Some(b),
            Err(error) => {
                record(&doc, root_node, error, &path, &mut warnings);
                None
            }
        },
        None => None,
    };

    let mut children = Vec::new();
    build_children(
        &doc,
        root_node,
        &path,
        1,
        &mut HashMap::new(),
        &mut children,
        &mut warnings,
    );

    let bounds = declared.unwrap_or_else(|| enclosing(&children));
    let root = element_from(root_node, class_name, bounds, 0, path, children);

    tracing::debug!(
        root = %root.class_name,
        skipped = warnings.len(),
        "parsed snapshot"
    );

    Ok(ElementTree::new(root, warnings))
}

fn build_children(
    doc: &Document,
    node: Node,
    parent_path: &StructuralPath,
    depth: usize,
    class_counters: &mut HashMap<String, usize>,
    out: &mut Vec<Element>,
    warnings: &mut Vec<ParseWarning>,
) {
    for child in node.children().filter(|n| n.is_element()) {
        let parsed = match child.attribute("bounds") {
            Some(raw) => Bounds::parse_lenient(raw),
            None => Err(MalformedBoundsError::new("", "missing bounds attribute")),
        };

        match parsed {
            Ok(bounds) => {
                let class_name = class_of(child);
                let counter = class_counters.entry(class_name.clone()).or_insert(0);
                let index = *counter;
                *counter += 1;

                let path = parent_path.child(&class_name, index);
                let mut grandchildren = Vec::new();
                build_children(
                    doc,
                    child,
                    &path,
                    depth + 1,
                    &mut HashMap::new(),
                    &mut grandchildren,
                    warnings,
                );

                out.push(element_from(child, class_name, bounds, depth, path, grandchildren));
            }
            Err(error) => {
                record(doc, child, error, parent_path, warnings);
                // Splice: the skipped node's children take its place.
                build_children(doc, child, parent_path, depth, class_counters, out, warnings);
            }
        }
    }
}

fn record(
    doc: &Document,
    node: Node,
    error: MalformedBoundsError,
    parent: &StructuralPath,
    warnings: &mut Vec<ParseWarning>,
) {
    let pos = doc.text_pos_at(node.range().start);
    tracing::warn!(
        line = pos.row,
        column = pos.col,
        parent = %parent,
        "skipping node: {}",
        error
    );
    warnings.push(ParseWarning {
        error,
        line: pos.row,
        column: pos.col,
        parent: parent.clone(),
    });
}

fn element_from(
    node: Node,
    class_name: String,
    bounds: Bounds,
    depth: usize,
    path: StructuralPath,
    children: Vec<Element>,
) -> Element {
    Element {
        class_name,
        text: attr(node, "text"),
        content_description: attr(node, "content-desc"),
        resource_id: attr(node, "resource-id"),
        node_id: attr(node, "source-node-id"),
        bounds,
        clickable: flag(node, "clickable", false),
        important: flag(node, "important", false),
        visible_to_user: flag(node, "visible-to-user", true),
        depth,
        path,
        children,
    }
}

fn class_of(node: Node) -> String {
    match node.attribute("class") {
        Some(c) if !c.trim().is_empty() => c.trim().to_string(),
        _ => node.tag_name().name().to_string(),
    }
}

fn attr(node: Node, name: &str) -> String {
    node.attribute(name).unwrap_or_default().to_string()
}

fn flag(node: Node, name: &str, default: bool) -> bool {
    match node.attribute(name) {
        Some(v) => v.trim().eq_ignore_ascii_case("true"),
        None => default,
    }
}

/// Bounding box of every element in `elements` and below.
fn enclosing(elements: &[Element]) -> Bounds {
    elements
        .iter()
        .flat_map(|e| e.descendants())
        .map(|e| e.bounds)
        .reduce(|acc, b| acc.union(&b))
        .unwrap_or_else(Bounds::zero)
}
