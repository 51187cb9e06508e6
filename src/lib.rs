//! docoutline - heading outline extraction for Markdown and PDF documents
//!
//! Produces `{"title": ..., "outline": [{"level", "text", "page"}]}` JSON from
//! Markdown text, PDF files, or pre-extracted PDF text spans.
//!
//! ```
//! use docoutline::{OutlineExtractor, OutlineOptions};
//!
//! let extractor = OutlineExtractor::with_options(OutlineOptions::builder().lines_per_page(2).build());
//! let doc = extractor.extract_markdown("#### Preface [L1-2]\n# Main Title [L3-4]");
//!
//! assert_eq!(doc.title, "Main Title");
//! assert_eq!(doc.outline[1].page, 2);
//! ```

pub mod batch;
pub mod cli;
pub mod config;
pub mod outline;
pub mod progress;
pub mod schema;

// CLI
pub use cli::{Cli, Commands, ConvertArgs, FormatArg, ValidateArgs};

// Config
pub use config::{CliOverrides, Config, ConfigError};

// Outline
pub use outline::{
    Document, HeadingCandidate, HeadingLevel, HeadingSource, InputFormat, OutlineEntry,
    OutlineError, OutlineExtractor, OutlineOptions, OutlineOptionsBuilder, PdfSpanReader,
    TextSpan,
};

// Batch
pub use batch::{collect_input_files, convert_file, BatchProcessor, BatchReport, ConvertError};

// Progress tracking
pub use progress::{OutputMode, ProcessingStage, ProgressCallback};

// Schema
pub use schema::{IssueSeverity, SchemaValidator, ValidationIssue, ValidationResult};

/// Process exit codes
pub mod exit_codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// General error
    pub const GENERAL_ERROR: i32 = 1;
    /// Input file or directory not found, or nothing to process
    pub const INPUT_NOT_FOUND: i32 = 2;
    /// Output failed schema validation
    pub const VALIDATION_FAILED: i32 = 3;
}
