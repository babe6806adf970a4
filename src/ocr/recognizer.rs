use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::RecognizeError;
use crate::ocr::block::{OcrTextBlock, parse_ocr_document};

// ============================================================================
// TextRecognizer trait: the OCR capability seen by callers
// ============================================================================

/// Turns a screenshot into text blocks.
///
/// Implementations are picked once by the caller; matching code only ever
/// sees the resulting blocks.
pub trait TextRecognizer {
    fn recognize(&self, image: &Path) -> Result<Vec<OcrTextBlock>, RecognizeError>;
}

/// Replays blocks an external OCR run already wrote to a JSON file.
pub struct RecordedRecognizer {
    path: PathBuf,
}

impl RecordedRecognizer {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl TextRecognizer for RecordedRecognizer {
    fn recognize(&self, _image: &Path) -> Result<Vec<OcrTextBlock>, RecognizeError> {
        let json = std::fs::read_to_string(&self.path).map_err(|source| RecognizeError::Io {
            path: self.path.clone(),
            source,
        })?;
        parse_ocr_document(&json).map_err(|source| RecognizeError::Json {
            context: self.path.display().to_string(),
            source,
        })
    }
}

/// Posts the screenshot bytes to an OCR service that answers with an OCR
/// document.
pub struct HttpRecognizer {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl HttpRecognizer {
    pub fn new(endpoint: &str) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());

        Self {
            endpoint: endpoint.to_string(),
            client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl TextRecognizer for HttpRecognizer {
    fn recognize(&self, image: &Path) -> Result<Vec<OcrTextBlock>, RecognizeError> {
        let bytes = std::fs::read(image).map_err(|source| RecognizeError::Io {
            path: image.to_path_buf(),
            source,
        })?;

        tracing::info!(endpoint = %self.endpoint, image = %image.display(), "requesting OCR");

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(RecognizeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_ocr_document(&body).map_err(|source| RecognizeError::Json {
            context: format!("response from {}", self.endpoint),
            source,
        })
    }
}
