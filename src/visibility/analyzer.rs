use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::EmptyTreeError;
use crate::geometry::bounds::Bounds;
use crate::tree::element::{Element, StructuralPath};
use crate::tree::element_tree::ElementTree;

// ============================================================================
// Options & result types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityOptions {
    /// Ratio at or above which an element counts as fully visible.
    pub full_threshold: f64,
}

impl Default for VisibilityOptions {
    fn default() -> Self {
        Self {
            full_threshold: 0.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityClass {
    Full,
    Partial,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Left,
    Top,
    Right,
    Bottom,
}

/// Visibility of one element against one viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct Visibility<'a> {
    pub element: &'a Element,
    pub visible_bounds: Option<Bounds>,
    /// `area(visible_bounds) / area(element.bounds)`, in `[0, 1]`.
    pub visible_ratio: f64,
    pub class: VisibilityClass,
    /// Viewport edges the element sticks out of.
    pub offscreen_edges: Vec<Edge>,
}

impl Visibility<'_> {
    pub fn is_visible(&self) -> bool {
        self.visible_ratio > 0.0
    }

    pub fn path(&self) -> &StructuralPath {
        &self.element.path
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilitySummary {
    pub total: usize,
    pub full: usize,
    pub partial: usize,
    pub hidden: usize,
}

/// Visibility of every element of a tree, in pre-order, indexed by path.
#[derive(Debug, Clone)]
pub struct VisibilityReport<'a> {
    viewport: Bounds,
    entries: Vec<Visibility<'a>>,
    by_path: HashMap<&'a StructuralPath, usize>,
}

impl<'a> VisibilityReport<'a> {
    pub fn viewport(&self) -> Bounds {
        self.viewport
    }

    pub fn entries(&self) -> &[Visibility<'a>] {
        &self.entries
    }

    pub fn get(&self, path: &StructuralPath) -> Option<&Visibility<'a>> {
        self.by_path.get(path).map(|&i| &self.entries[i])
    }

    pub fn visible(&self) -> impl Iterator<Item = &Visibility<'a>> {
        self.entries.iter().filter(|v| v.is_visible())
    }

    pub fn summary(&self) -> VisibilitySummary {
        let mut summary = VisibilitySummary {
            total: self.entries.len(),
            ..Default::default()
        };
        for entry in &self.entries {
            match entry.class {
                VisibilityClass::Full => summary.full += 1,
                VisibilityClass::Partial => summary.partial += 1,
                VisibilityClass::Hidden => summary.hidden += 1,
            }
        }
        summary
    }

    /// Fails when nothing of the tree shows inside the viewport.
    pub fn ensure_any_visible(&self) -> Result<(), EmptyTreeError> {
        if self.visible().next().is_some() {
            Ok(())
        } else {
            Err(EmptyTreeError {
                viewport: self.viewport,
            })
        }
    }
}

// ============================================================================
// Computation
// ============================================================================

pub fn compute_visibility<'a>(tree: &'a ElementTree, viewport: &Bounds) -> VisibilityReport<'a> {
    compute_visibility_with(tree, viewport, &VisibilityOptions::default())
}

pub fn compute_visibility_with<'a>(
    tree: &'a ElementTree,
    viewport: &Bounds,
    options: &VisibilityOptions,
) -> VisibilityReport<'a> {
    let entries: Vec<Visibility<'a>> = tree
        .flatten()
        .into_iter()
        .map(|el| element_visibility(el, viewport, options))
        .collect();

    let by_path = entries
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let element: &'a Element = v.element;
            (&element.path, i)
        })
        .collect();

    VisibilityReport {
        viewport: *viewport,
        entries,
        by_path,
    }
}

fn element_visibility<'a>(
    element: &'a Element,
    viewport: &Bounds,
    options: &VisibilityOptions,
) -> Visibility<'a> {
    let visible_bounds = element.bounds.intersect(viewport);
    let visible_ratio = match visible_bounds {
        Some(vb) if element.bounds.area() > 0 => vb.area() as f64 / element.bounds.area() as f64,
        _ => 0.0,
    };

    let class = if visible_ratio <= 0.0 {
        VisibilityClass::Hidden
    } else if visible_ratio >= options.full_threshold {
        VisibilityClass::Full
    } else {
        VisibilityClass::Partial
    };

    Visibility {
        element,
        visible_bounds,
        visible_ratio,
        class,
        offscreen_edges: offscreen_edges(&element.bounds, viewport),
    }
}

fn offscreen_edges(bounds: &Bounds, viewport: &Bounds) -> Vec<Edge> {
    let mut edges = Vec::new();
    if bounds.left < viewport.left {
        edges.push(Edge::Left);
    }
    if bounds.top < viewport.top {
        edges.push(Edge::Top);
    }
    if bounds.right > viewport.right {
        edges.push(Edge::Right);
    }
    if bounds.bottom > viewport.bottom {
        edges.push(Edge::Bottom);
    }
    edges
}
