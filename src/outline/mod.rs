//! Outline Extraction module
//!
//! Turns Markdown text or PDF text spans into a `{title, outline}` document.
//!
//! Each input modality implements [`HeadingSource`] and produces ordered
//! heading candidates. Candidates then go through the shared tail of the
//! pipeline:
//!
//! - page resolution ([`PageResolver`])
//! - outline assembly and title derivation ([`OutlineBuilder`])
//! - JSON rendering ([`OutlineExtractor::render_json`])

mod builder;
mod extractor;
mod markdown_scan;
mod page_resolver;
mod pdf_classify;
mod pdf_reader;
mod source;
mod types;

pub mod text_clean;

// Re-export public API
pub use builder::OutlineBuilder;
pub use extractor::OutlineExtractor;
pub use markdown_scan::MarkdownHeadingScanner;
pub use page_resolver::PageResolver;
pub use pdf_classify::PdfSpanClassifier;
pub use pdf_reader::PdfSpanReader;
pub use source::HeadingSource;
pub use text_clean::{clean_heading_text, Annotations, CleanedHeading};
pub use types::{
    Document, HeadingCandidate, HeadingLevel, InputFormat, OutlineEntry, OutlineError,
    OutlineOptions, OutlineOptionsBuilder, ResolvedHeading, Result, TextSpan,
    DEFAULT_ENCODING, DEFAULT_LINES_PER_PAGE, MAX_HEADING_LEVEL, MAX_PDF_HEADING_LEVEL,
    MIN_LINES_PER_PAGE,
};
