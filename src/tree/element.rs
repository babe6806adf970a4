use std::fmt;

use serde::{Serialize, Serializer};

use crate::geometry::bounds::Bounds;

/// One level of a structural path: class name plus the node's index among
/// siblings sharing that class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathSegment {
    pub class_name: String,
    pub index: usize,
}

/// Identity of a node derived from its position in the tree.
///
/// Unique within one tree. Stable across snapshots as long as the layout
/// around the node keeps its shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructuralPath(Vec<PathSegment>);

impl StructuralPath {
    pub fn root(class_name: &str) -> Self {
        StructuralPath(vec![PathSegment {
            class_name: class_name.to_string(),
            index: 0,
        }])
    }

    pub fn child(&self, class_name: &str, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment {
            class_name: class_name.to_string(),
            index,
        });
        StructuralPath(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// Parse the `Class[i]/Class[j]` display form back into a path.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut segments = Vec::new();
        for part in raw.split('/') {
            let (class_name, rest) = part.rsplit_once('[')?;
            let index = rest.strip_suffix(']')?.parse().ok()?;
            segments.push(PathSegment {
                class_name: class_name.to_string(),
                index,
            });
        }
        if segments.is_empty() {
            return None;
        }
        Some(StructuralPath(segments))
    }
}

impl fmt::Display for StructuralPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}[{}]", seg.class_name, seg.index)?;
        }
        Ok(())
    }
}

impl Serialize for StructuralPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub class_name: String,
    pub text: String,
    pub content_description: String,
    pub resource_id: String,
    pub node_id: String,
    pub bounds: Bounds,

    pub clickable: bool,
    pub important: bool,
    /// `visible-to-user` as declared by the dump; absent counts as true.
    pub visible_to_user: bool,

    pub depth: usize,
    pub path: StructuralPath,
    pub children: Vec<Element>,
}

impl Element {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Preferred OCR target: carries text, or has nothing below it.
    pub fn is_leafish(&self) -> bool {
        self.has_text() || self.is_leaf()
    }

    pub fn is_layout(&self) -> bool {
        let lower = self.class_name.to_lowercase();
        lower.contains("layout") || lower.contains("viewgroup")
    }

    /// Short human label: text, content description, resource id name, or
    /// the class' simple name.
    pub fn label(&self) -> String {
        let text = self.text.trim();
        if !text.is_empty() {
            return truncate(text, 20);
        }

        let desc = self.content_description.trim();
        if !desc.is_empty() {
            return truncate(desc, 20);
        }

        let rid = self.resource_id.trim();
        if !rid.is_empty() {
            let name = rid.rsplit('/').next().unwrap_or(rid);
            return truncate(name, 20);
        }

        let simple = self.class_name.rsplit('.').next().unwrap_or(&self.class_name);
        truncate(simple, 15)
    }

    /// Pre-order walk of this node and everything below it.
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        collect_preorder(self, &mut out);
        out
    }
}

pub(crate) fn collect_preorder<'a>(el: &'a Element, out: &mut Vec<&'a Element>) {
    out.push(el);
    for child in &el.children {
        collect_preorder(child, out);
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
