use std::path::Path;

use sha1::{Digest, Sha1};

use crate::error::SnapshotParseError;
use crate::geometry::bounds::Bounds;
use crate::tree::element::{Element, StructuralPath, collect_preorder};
use crate::tree::parser::{ParseWarning, parse_snapshot};
use crate::tree::stats::SnapshotStats;

/// A parsed snapshot: the root element plus what the parser had to skip.
///
/// Built once, immutable afterwards.
#[derive(Debug, Clone)]
pub struct ElementTree {
    root: Element,
    warnings: Vec<ParseWarning>,
    len: usize,
}

impl ElementTree {
    pub(crate) fn new(root: Element, warnings: Vec<ParseWarning>) -> Self {
        let len = root.descendants().len();
        Self {
            root,
            warnings,
            len,
        }
    }

    pub fn parse(xml: &str) -> Result<Self, SnapshotParseError> {
        parse_snapshot(xml)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SnapshotParseError> {
        let path = path.as_ref();
        let xml = std::fs::read_to_string(path).map_err(|source| SnapshotParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse_snapshot(&xml)
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Every element, depth-first pre-order (document order).
    pub fn flatten(&self) -> Vec<&Element> {
        let mut out = Vec::with_capacity(self.len);
        collect_preorder(&self.root, &mut out);
        out
    }

    pub fn find_by_path(&self, path: &StructuralPath) -> Option<&Element> {
        let mut segments = path.segments().iter();
        let first = segments.next()?;
        if self.root.path.segments().first() != Some(first) {
            return None;
        }

        let mut current = &self.root;
        for seg in segments {
            current = current
                .children
                .iter()
                .find(|c| c.path.segments().last() == Some(seg))?;
        }
        Some(current)
    }

    /// Screen rectangle implied by the dump: the root's bounds, or the
    /// extent of all elements when the root carries none.
    pub fn screen_bounds(&self) -> Bounds {
        if !self.root.bounds.is_degenerate() {
            return self.root.bounds;
        }

        let (right, bottom) = self
            .flatten()
            .iter()
            .fold((0, 0), |(r, b), el| (r.max(el.bounds.right), b.max(el.bounds.bottom)));
        Bounds::from_size(right, bottom)
    }

    pub fn stats(&self) -> SnapshotStats {
        SnapshotStats::collect(&self.flatten())
    }

    /// SHA-1 over every node's identity and compared attributes.
    ///
    /// Two trees with the same fingerprint diff as all-unchanged.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha1::new();
        for el in self.flatten() {
            hasher.update(el.path.to_string().as_bytes());
            hasher.update([0u8]);
            for field in [
                el.class_name.as_str(),
                el.text.as_str(),
                el.content_description.as_str(),
                el.resource_id.as_str(),
            ] {
                hasher.update(field.as_bytes());
                hasher.update([0u8]);
            }
            hasher.update(el.bounds.to_string().as_bytes());
            hasher.update([b'\n']);
        }
        format!("{:x}", hasher.finalize())
    }
}
