use std::path::PathBuf;

use thiserror::Error;

use crate::geometry::bounds::Bounds;

/// A bounds attribute that could not be turned into a valid rectangle.
///
/// Raised per node while parsing a snapshot; the parser records it as a
/// warning and keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed bounds '{raw}': {reason}")]
pub struct MalformedBoundsError {
    pub raw: String,
    pub reason: String,
}

impl MalformedBoundsError {
    pub fn new(raw: &str, reason: impl Into<String>) -> Self {
        Self {
            raw: raw.to_string(),
            reason: reason.into(),
        }
    }
}

/// Fatal snapshot failures: the document as a whole is unusable.
#[derive(Debug, Error)]
pub enum SnapshotParseError {
    #[error("snapshot is not well-formed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A tree with nothing visible or comparable inside the viewport.
///
/// Reported to the caller, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no element of the snapshot is visible inside viewport {viewport}")]
pub struct EmptyTreeError {
    pub viewport: Bounds,
}

/// Failures of an OCR text recognizer at the I/O boundary.
#[derive(Debug, Error)]
pub enum RecognizeError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid OCR document ({context}): {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("OCR service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OCR service answered {status}: {body}")]
    Status { status: u16, body: String },
}
