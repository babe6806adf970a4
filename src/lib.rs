//! Geometric matching and differencing of UI element trees.
//!
//! A snapshot (XML dump of an on-screen UI tree) becomes an
//! [`ElementTree`]. From there:
//!
//! - [`compute_visibility`] tells which elements show inside a viewport,
//! - [`diff()`] pairs the elements of two snapshots and classifies changes,
//! - [`match_ocr`] attaches OCR text blocks to the elements they sit on.
//!
//! All analysis is synchronous and works on immutable inputs.

pub mod cli;
pub mod diff;
pub mod error;
pub mod geometry;
pub mod ocr;
pub mod report;
pub mod tree;
pub mod visibility;

pub use diff::differ::{DiffEntry, DiffKind, DiffOptions, diff, diff_with};
pub use error::{EmptyTreeError, MalformedBoundsError, RecognizeError, SnapshotParseError};
pub use geometry::bounds::Bounds;
pub use ocr::block::OcrTextBlock;
pub use ocr::matcher::{MatchEntry, MatchOptions, match_ocr, match_ocr_with};
pub use tree::element::{Element, StructuralPath};
pub use tree::element_tree::ElementTree;
pub use visibility::analyzer::{
    Visibility, VisibilityOptions, VisibilityReport, compute_visibility, compute_visibility_with,
};
