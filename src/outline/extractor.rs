//! Outline Extractor
//!
//! Front door of the outline pipeline: reads an input, runs the matching
//! [`HeadingSource`], resolves pages, builds the [`Document`], and renders it.

use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use tracing::{debug, info};

use super::builder::OutlineBuilder;
use super::markdown_scan::MarkdownHeadingScanner;
use super::page_resolver::PageResolver;
use super::pdf_classify::PdfSpanClassifier;
use super::pdf_reader::PdfSpanReader;
use super::source::HeadingSource;
use super::types::{Document, InputFormat, OutlineError, OutlineOptions, Result, TextSpan};
use crate::progress::{NoopProgress, ProcessingStage, ProgressCallback};

/// Outline extractor
pub struct OutlineExtractor {
    options: OutlineOptions,
    resolver: PageResolver,
}

impl Default for OutlineExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl OutlineExtractor {
    /// Create an extractor with default options
    pub fn new() -> Self {
        Self::with_options(OutlineOptions::default())
    }

    /// Create an extractor with custom options
    pub fn with_options(options: OutlineOptions) -> Self {
        let resolver = PageResolver::new(options.lines_per_page);
        Self { options, resolver }
    }

    /// Get current options
    pub fn options(&self) -> &OutlineOptions {
        &self.options
    }

    /// Run any heading source through page resolution and outline building
    pub fn extract<S: HeadingSource + ?Sized>(&self, source: &S) -> Document {
        self.run(source, &NoopProgress)
    }

    /// Extract the outline of Markdown text
    pub fn extract_markdown(&self, text: &str) -> Document {
        self.extract(&MarkdownHeadingScanner::new(text))
    }

    /// Extract the outline of PDF spans given in reading order
    pub fn extract_spans(&self, spans: &[TextSpan]) -> Document {
        self.extract(&PdfSpanClassifier::new(spans))
    }

    /// Extract the outline of a file
    pub fn extract_file(&self, path: &Path) -> Result<Document> {
        self.extract_file_with_progress(path, &NoopProgress)
    }

    /// Extract the outline of a file, reporting stages to `progress`
    pub fn extract_file_with_progress(
        &self,
        path: &Path,
        progress: &dyn ProgressCallback,
    ) -> Result<Document> {
        if !path.is_file() {
            return Err(OutlineError::InputNotFound(path.to_path_buf()));
        }
        progress.on_stage_start(ProcessingStage::Initializing);
        let format = self.detect_format(path)?;
        progress.on_debug(&format!("lines per page {}", self.resolver.lines_per_page()));
        progress.on_stage_complete(
            ProcessingStage::Initializing,
            &format!("format {}, encoding {}", format.name(), self.options.encoding),
        );

        progress.on_stage_start(ProcessingStage::Reading);
        let document = match format {
            InputFormat::Markdown => {
                let text = self.read_markdown(path)?;
                progress.on_stage_complete(ProcessingStage::Reading, &format!("{} lines", text.lines().count()));
                self.run(&MarkdownHeadingScanner::new(&text), progress)
            }
            InputFormat::Pdf => {
                let spans = PdfSpanReader::read(path)?;
                progress.on_stage_complete(ProcessingStage::Reading, &format!("{} spans", spans.len()));
                self.run(&PdfSpanClassifier::new(&spans), progress)
            }
            InputFormat::Spans => {
                let spans = Self::read_spans(path)?;
                progress.on_stage_complete(ProcessingStage::Reading, &format!("{} spans", spans.len()));
                self.run(&PdfSpanClassifier::new(&spans), progress)
            }
        };

        info!(
            "{}: {} headings, title {:?}",
            path.display(),
            document.outline.len(),
            document.title
        );
        Ok(document)
    }

    fn run<S: HeadingSource + ?Sized>(&self, source: &S, progress: &dyn ProgressCallback) -> Document {
        progress.on_stage_start(ProcessingStage::Scanning);
        let candidates = source.heading_candidates();
        progress.on_stage_complete(
            ProcessingStage::Scanning,
            &format!("{} {} headings", candidates.len(), source.name()),
        );

        progress.on_stage_start(ProcessingStage::Resolving);
        let resolved = self.resolver.resolve_all(candidates);
        progress.on_stage_complete(
            ProcessingStage::Resolving,
            &format!("{} lines per page", self.resolver.lines_per_page()),
        );

        progress.on_stage_start(ProcessingStage::Building);
        let document = OutlineBuilder::build(&resolved);
        progress.on_stage_complete(ProcessingStage::Building, &format!("title {:?}", document.title));

        document
    }

    /// Input format of `path`: the forced format, else its extension
    pub fn detect_format(&self, path: &Path) -> Result<InputFormat> {
        self.options
            .format
            .or_else(|| InputFormat::from_path(path))
            .ok_or_else(|| OutlineError::UnsupportedInput(path.to_path_buf()))
    }

    /// Read and decode a Markdown file with the configured encoding
    pub fn read_markdown(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path)?;
        Self::decode_text(&bytes, &self.options.encoding, path)
    }

    /// Decode bytes with an encoding label, skipping a matching BOM
    ///
    /// Malformed input is an error rather than being replaced.
    pub fn decode_text(bytes: &[u8], label: &str, path: &Path) -> Result<String> {
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| OutlineError::UnknownEncoding(label.to_string()))?;

        let body = match Encoding::for_bom(bytes) {
            Some((bom_encoding, bom_len)) if bom_encoding == encoding => &bytes[bom_len..],
            _ => bytes,
        };

        encoding
            .decode_without_bom_handling_and_without_replacement(body)
            .map(|text| text.into_owned())
            .ok_or_else(|| OutlineError::DecodeFailed {
                path: path.to_path_buf(),
                encoding: encoding.name().to_string(),
            })
    }

    fn read_spans(path: &Path) -> Result<Vec<TextSpan>> {
        let bytes = fs::read(path)?;
        serde_json::from_slice(&bytes)
            .map_err(|e| OutlineError::InvalidSpans(format!("{}: {e}", path.display())))
    }

    /// Render a document as JSON, pretty (2-space indent) or compact
    pub fn render_json(&self, document: &Document) -> Result<String> {
        let rendered = if self.options.pretty {
            serde_json::to_string_pretty(document)
        } else {
            serde_json::to_string(document)
        };
        rendered.map_err(|e| OutlineError::SerializeFailed(e.to_string()))
    }

    /// Write a document as UTF-8 JSON, creating parent directories
    pub fn write_output(&self, document: &Document, path: &Path) -> Result<()> {
        let mut json = self.render_json(document)?;
        json.push('\n');

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, json)?;

        debug!("wrote {}", path.display());
        Ok(())
    }

    /// Output path for an input file
    ///
    /// `<stem>.json` next to the input or in `out_dir`; span inputs, which are
    /// JSON themselves, get `<stem>.outline.json`.
    pub fn output_path_for(input: &Path, out_dir: Option<&Path>) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());

        let is_json = input
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let file_name = if is_json {
            format!("{stem}.outline.json")
        } else {
            format!("{stem}.json")
        };

        let dir = out_dir
            .map(Path::to_path_buf)
            .or_else(|| input.parent().map(Path::to_path_buf))
            .unwrap_or_default();
        dir.join(file_name)
    }
}

// ============================================================
// Tests
// ============================================================
