use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::bounds::Bounds;

// ============================================================================
// Engine identity
// ============================================================================

/// Which OCR engine produced a block. Carried through, never branched on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OcrEngineId {
    Tesseract,
    EasyOcr,
    PaddleOcr,
    Other(String),
    #[default]
    Unknown,
}

impl From<String> for OcrEngineId {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "tesseract" => OcrEngineId::Tesseract,
            "easyocr" => OcrEngineId::EasyOcr,
            "paddleocr" | "paddle" => OcrEngineId::PaddleOcr,
            "" | "unknown" | "auto" => OcrEngineId::Unknown,
            _ => OcrEngineId::Other(raw.trim().to_string()),
        }
    }
}

impl From<OcrEngineId> for String {
    fn from(id: OcrEngineId) -> Self {
        id.to_string()
    }
}

impl fmt::Display for OcrEngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OcrEngineId::Tesseract => f.write_str("tesseract"),
            OcrEngineId::EasyOcr => f.write_str("easyocr"),
            OcrEngineId::PaddleOcr => f.write_str("paddleocr"),
            OcrEngineId::Other(name) => f.write_str(name),
            OcrEngineId::Unknown => f.write_str("unknown"),
        }
    }
}

// ============================================================================
// Text blocks
// ============================================================================

/// One recognized text region, in screenshot pixel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrTextBlock {
    pub bounds: Bounds,
    pub text: String,
    /// In `[0, 1]`.
    #[serde(default = "full_confidence")]
    pub confidence: f64,
    #[serde(default, alias = "engine")]
    pub source_engine: OcrEngineId,
}

impl OcrTextBlock {
    pub fn new(bounds: Bounds, text: impl Into<String>, confidence: f64) -> Self {
        Self {
            bounds,
            text: text.into(),
            confidence,
            source_engine: OcrEngineId::Unknown,
        }
    }

    pub fn with_engine(mut self, engine: OcrEngineId) -> Self {
        self.source_engine = engine;
        self
    }

    /// Shift into tree coordinates, e.g. when the screenshot starts below
    /// the status bar.
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            bounds: self.bounds.translate(dx, dy),
            ..self.clone()
        }
    }

    pub fn text_kind(&self) -> TextKind {
        TextKind::classify(&self.text)
    }
}

fn full_confidence() -> f64 {
    1.0
}

// ============================================================================
// OCR document (JSON written by external OCR runs)
// ============================================================================

/// `{engine, total_blocks, text_blocks: [...]}` as written by the OCR
/// processing step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrDocument {
    #[serde(default)]
    pub engine: OcrEngineId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_blocks: Option<usize>,
    pub text_blocks: Vec<OcrTextBlock>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OcrPayload {
    Document(OcrDocument),
    Blocks(Vec<OcrTextBlock>),
}

/// Read OCR blocks from JSON: either a full [`OcrDocument`] or a bare
/// array of blocks. Blocks without an engine inherit the document's.
pub fn parse_ocr_document(json: &str) -> Result<Vec<OcrTextBlock>, serde_json::Error> {
    let blocks = match serde_json::from_str::<OcrPayload>(json)? {
        OcrPayload::Blocks(blocks) => blocks,
        OcrPayload::Document(doc) => {
            let engine = doc.engine;
            doc.text_blocks
                .into_iter()
                .map(|mut block| {
                    if block.source_engine == OcrEngineId::Unknown {
                        block.source_engine = engine.clone();
                    }
                    block
                })
                .collect()
        }
    };
    Ok(blocks)
}

// ============================================================================
// Text kind
// ============================================================================

/// Coarse role of a piece of recognized text, from keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextKind {
    SearchInput,
    Input,
    ButtonText,
    LinkText,
    Text,
}

const SEARCH_KEYWORDS: &[&str] = &["搜索", "search", "查找", "查询"];
const INPUT_KEYWORDS: &[&str] = &["输入", "input", "请输入", "请填写", "enter "];
const BUTTON_KEYWORDS: &[&str] = &[
    "确定", "取消", "确认", "提交", "登录", "注册", "返回", "关闭", "下一步", "完成", "删除", "编辑",
    "保存", "ok", "cancel", "submit", "sign in", "log in", "login", "close", "next", "done",
    "delete", "save",
];
const LINK_KEYWORDS: &[&str] = &["了解更多", "查看详情", "点击查看", "点击进入", "learn more", "details"];

impl TextKind {
    pub fn classify(text: &str) -> Self {
        let lower = text.trim().to_lowercase();
        let has = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

        if has(SEARCH_KEYWORDS) {
            TextKind::SearchInput
        } else if has(INPUT_KEYWORDS) {
            TextKind::Input
        } else if BUTTON_KEYWORDS.iter().any(|k| is_button_word(&lower, k)) {
            TextKind::ButtonText
        } else if has(LINK_KEYWORDS) {
            TextKind::LinkText
        } else {
            TextKind::Text
        }
    }
}

/// ASCII keywords must be the whole text ("OK", not "book"); CJK keywords
/// may appear anywhere.
fn is_button_word(lower: &str, keyword: &str) -> bool {
    if keyword.is_ascii() {
        lower == keyword
    } else {
        lower.contains(keyword)
    }
}
