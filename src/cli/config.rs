use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::diff::differ::DiffOptions;
use crate::ocr::matcher::MatchOptions;
use crate::visibility::analyzer::VisibilityOptions;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "uitree-inspect",
    version,
    about = "Visibility, diff and OCR matching for UI tree dumps"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: uitree-inspect.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report which elements of a snapshot are inside the viewport
    Visibility {
        /// UI tree XML dump
        #[arg(long)]
        snapshot: String,

        /// Viewport as [l,t][r,b] (default: screen size implied by the dump)
        #[arg(long)]
        viewport: Option<String>,

        /// Screenshot width in pixels
        #[arg(long, requires = "height", conflicts_with = "viewport")]
        width: Option<i32>,

        /// Screenshot height in pixels
        #[arg(long, requires = "width", conflicts_with = "viewport")]
        height: Option<i32>,

        /// Pixels the screenshot starts below the top of the dump
        #[arg(long)]
        status_bar_offset: Option<i32>,

        /// Visible ratio at which an element counts as fully visible
        #[arg(long)]
        full_threshold: Option<f64>,

        /// Output format: console, json
        #[arg(long, default_value = "console")]
        format: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Compare two snapshots of the same screen
    Diff {
        /// Earlier UI tree XML dump
        #[arg(long)]
        before: String,

        /// Later UI tree XML dump
        #[arg(long)]
        after: String,

        /// Largest center distance (px) for pairing moved elements
        #[arg(long)]
        max_distance: Option<f64>,

        /// Output format: console, json
        #[arg(long, default_value = "console")]
        format: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Match OCR text blocks to snapshot elements
    MatchOcr {
        /// UI tree XML dump
        #[arg(long)]
        snapshot: String,

        /// OCR result JSON written by an OCR run
        #[arg(long, conflicts_with = "endpoint")]
        ocr: Option<String>,

        /// OCR service URL (requires --image)
        #[arg(long, requires = "image")]
        endpoint: Option<String>,

        /// Screenshot to send to the OCR service
        #[arg(long)]
        image: Option<String>,

        /// Pixels the screenshot starts below the top of the dump
        #[arg(long)]
        status_bar_offset: Option<i32>,

        /// Smallest share of a block that must lie inside an element
        #[arg(long)]
        min_overlap: Option<f64>,

        /// Ignore blocks recognized below this confidence
        #[arg(long)]
        min_confidence: Option<f64>,

        /// Also list text elements no OCR block landed on
        #[arg(long)]
        include_unmatched: bool,

        /// Output format: console, json
        #[arg(long, default_value = "console")]
        format: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `uitree-inspect.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub visibility: VisibilityConfig,
    #[serde(default)]
    pub diff: DiffConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisibilityConfig {
    #[serde(default = "default_full_threshold")]
    pub full_threshold: f64,

    #[serde(default)]
    pub status_bar_offset: i32,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            full_threshold: default_full_threshold(),
            status_bar_offset: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffConfig {
    #[serde(default = "default_max_center_distance")]
    pub max_center_distance: f64,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            max_center_distance: default_max_center_distance(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    #[serde(default = "default_min_overlap")]
    pub min_overlap: f64,

    #[serde(default)]
    pub min_confidence: f64,

    #[serde(default)]
    pub join_separator: String,

    #[serde(default)]
    pub report_unmatched_elements: bool,

    pub endpoint: Option<String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            min_overlap: default_min_overlap(),
            min_confidence: 0.0,
            join_separator: String::new(),
            report_unmatched_elements: false,
            endpoint: None,
        }
    }
}

// Serde default helpers
fn default_full_threshold() -> f64 { 0.9 }
fn default_max_center_distance() -> f64 { 64.0 }
fn default_min_overlap() -> f64 { 0.5 }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("uitree-inspect.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => match serde_yaml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = config_path, "ignoring malformed config: {}", e);
                AppConfig::default()
            }
        },
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Option Builders (CLI flag > config file > default)
// ============================================================================

pub fn build_visibility_options(
    config: &VisibilityConfig,
    full_threshold: Option<f64>,
) -> VisibilityOptions {
    VisibilityOptions {
        full_threshold: full_threshold.unwrap_or(config.full_threshold),
    }
}

pub fn build_diff_options(config: &DiffConfig, max_distance: Option<f64>) -> DiffOptions {
    DiffOptions {
        max_center_distance: max_distance.unwrap_or(config.max_center_distance),
    }
}

pub fn build_match_options(
    config: &OcrConfig,
    min_overlap: Option<f64>,
    min_confidence: Option<f64>,
    include_unmatched: bool,
) -> MatchOptions {
    MatchOptions {
        min_overlap: min_overlap.unwrap_or(config.min_overlap),
        min_confidence: min_confidence.unwrap_or(config.min_confidence),
        join_separator: config.join_separator.clone(),
        report_unmatched_elements: include_unmatched || config.report_unmatched_elements,
    }
}
