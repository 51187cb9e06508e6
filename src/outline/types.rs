//! Common types for the outline module

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================
// Constants
// ============================================================

/// Default number of source lines assumed to fit on one page
pub const DEFAULT_LINES_PER_PAGE: u32 = 50;

/// Smallest accepted lines-per-page value
pub const MIN_LINES_PER_PAGE: u32 = 1;

/// Default input text encoding label
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Deepest heading level in the output model
pub const MAX_HEADING_LEVEL: u8 = 6;

/// Deepest heading level the PDF classifier assigns
pub const MAX_PDF_HEADING_LEVEL: u8 = 3;

// ============================================================
// Error Types
// ============================================================

/// Outline extraction error types
#[derive(Debug, Error)]
pub enum OutlineError {
    #[error("Input not found: {0}")]
    InputNotFound(PathBuf),

    #[error("Unsupported input type: {0}")]
    UnsupportedInput(PathBuf),

    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),

    #[error("Cannot decode {path} as {encoding}")]
    DecodeFailed { path: PathBuf, encoding: String },

    #[error("Invalid span data: {0}")]
    InvalidSpans(String),

    #[error("PDF read failed: {0}")]
    PdfReadFailed(String),

    #[error("Serialization failed: {0}")]
    SerializeFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OutlineError>;

// ============================================================
// Heading Level
// ============================================================

/// Hierarchy level of a heading, always within 1-6
///
/// Serialized as `"H1"` .. `"H6"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    /// Top-level heading
    pub const H1: HeadingLevel = HeadingLevel(1);

    /// Create a level, rejecting values outside 1-6
    pub fn new(level: u8) -> Option<Self> {
        (1..=MAX_HEADING_LEVEL)
            .contains(&level)
            .then_some(HeadingLevel(level))
    }

    /// Create a level, clamping into 1-6
    pub fn clamped(level: usize) -> Self {
        HeadingLevel(level.clamp(1, MAX_HEADING_LEVEL as usize) as u8)
    }

    /// Numeric level
    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H{}", self.0)
    }
}

impl From<HeadingLevel> for String {
    fn from(level: HeadingLevel) -> Self {
        level.to_string()
    }
}

impl TryFrom<String> for HeadingLevel {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value
            .strip_prefix('H')
            .and_then(|digits| digits.parse::<u8>().ok())
            .and_then(HeadingLevel::new)
            .ok_or_else(|| format!("invalid heading level: {value}"))
    }
}

// ============================================================
// Core Data Structures
// ============================================================

/// One detected heading occurrence, before page resolution
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingCandidate {
    /// Hierarchy level
    pub level: HeadingLevel,

    /// Text as found in the source, markup and annotations included
    pub raw_text: String,

    /// Text with markup and annotations removed (never empty)
    pub clean_text: String,

    /// First line of an `[L<a>-<b>]` annotation
    pub line_start: Option<usize>,

    /// Last line of an `[L<a>-<b>]` annotation
    pub line_end: Option<usize>,

    /// Page from a `[page <n>]` annotation
    pub explicit_page: Option<u32>,

    /// Physical page the span came from (PDF input only)
    pub source_page_index: Option<u32>,

    /// 1-based line of the heading in the Markdown source
    pub source_line: Option<usize>,

    /// Ordinal of appearance in the document
    pub position: usize,
}

impl HeadingCandidate {
    /// Create a candidate with no page signals attached
    pub fn new(level: HeadingLevel, raw_text: impl Into<String>, clean_text: impl Into<String>, position: usize) -> Self {
        Self {
            level,
            raw_text: raw_text.into(),
            clean_text: clean_text.into(),
            line_start: None,
            line_end: None,
            explicit_page: None,
            source_page_index: None,
            source_line: None,
            position,
        }
    }
}

/// A candidate paired with its resolved page number
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedHeading {
    pub candidate: HeadingCandidate,
    pub page: u32,
}

/// A run of text from a PDF page, as supplied by a text extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    /// Span text
    pub text: String,

    /// Font size in points
    pub font_size: f32,

    /// Page the span was found on, in the extractor's numbering
    pub page_index: u32,
}

impl TextSpan {
    /// Create a new span
    pub fn new(text: impl Into<String>, font_size: f32, page_index: u32) -> Self {
        Self {
            text: text.into(),
            font_size,
            page_index,
        }
    }
}

/// Finalized, serializable heading record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    pub level: HeadingLevel,
    pub text: String,
    pub page: u32,
}

/// Extracted document outline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub outline: Vec<OutlineEntry>,
}

impl Document {
    /// Check if the outline has no entries
    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }
}

// ============================================================
// Input Format
// ============================================================

/// Source modality of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputFormat {
    /// Markdown text
    Markdown,
    /// PDF document, read through the span reader
    Pdf,
    /// JSON array of pre-extracted PDF spans
    Spans,
}

impl InputFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "md" | "markdown" | "txt" => Some(InputFormat::Markdown),
            "pdf" => Some(InputFormat::Pdf),
            "json" => Some(InputFormat::Spans),
            _ => None,
        }
    }

    /// Get the format name
    pub fn name(&self) -> &'static str {
        match self {
            InputFormat::Markdown => "markdown",
            InputFormat::Pdf => "pdf",
            InputFormat::Spans => "spans",
        }
    }
}

// ============================================================
// Options
// ============================================================

/// Options for outline extraction
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineOptions {
    /// Lines per page for page estimation (at least 1)
    pub lines_per_page: u32,

    /// Encoding label for Markdown input
    pub encoding: String,

    /// Pretty-print JSON output
    pub pretty: bool,

    /// Validate output against the outline schema before writing
    pub validate: bool,

    /// Force an input format instead of detecting it from the extension
    pub format: Option<InputFormat>,
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            lines_per_page: DEFAULT_LINES_PER_PAGE,
            encoding: DEFAULT_ENCODING.to_string(),
            pretty: false,
            validate: false,
            format: None,
        }
    }
}

impl OutlineOptions {
    /// Create a builder
    pub fn builder() -> OutlineOptionsBuilder {
        OutlineOptionsBuilder::default()
    }
}

/// Builder for OutlineOptions
#[derive(Debug, Default)]
pub struct OutlineOptionsBuilder {
    options: OutlineOptions,
}

impl OutlineOptionsBuilder {
    /// Set lines per page (clamped to at least 1)
    #[must_use]
    pub fn lines_per_page(mut self, lines: u32) -> Self {
        self.options.lines_per_page = lines.max(MIN_LINES_PER_PAGE);
        self
    }

    /// Set input encoding
    #[must_use]
    pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
        self.options.encoding = encoding.into();
        self
    }

    /// Enable pretty-printed output
    #[must_use]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.options.pretty = pretty;
        self
    }

    /// Enable schema validation
    #[must_use]
    pub fn validate(mut self, validate: bool) -> Self {
        self.options.validate = validate;
        self
    }

    /// Force input format
    #[must_use]
    pub fn format(mut self, format: Option<InputFormat>) -> Self {
        self.options.format = format;
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> OutlineOptions {
        self.options
    }
}

// ============================================================
// Tests
// ============================================================
