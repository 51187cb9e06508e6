//! PDF Span Reader
//!
//! Walks each page's content stream with `lopdf` and collects the text shown
//! between line moves as [`TextSpan`]s, tagged with their effective font size.
//!
//! Text strings are decoded as UTF-16BE when they carry a byte-order mark and
//! as Windows-1252 otherwise. Fonts with custom encodings or CID maps are not
//! interpreted, so their text may come out garbled; sizes are still correct.

use std::mem;
use std::path::Path;

use encoding_rs::{UTF_16BE, WINDOWS_1252};
use lopdf::content::{Content, Operation};
use lopdf::{Document as PdfDocument, Object};
use tracing::{debug, warn};

use super::types::{OutlineError, Result, TextSpan};

/// `TJ` adjustments below this (thousandths of an em) read as a word gap
const TJ_SPACE_THRESHOLD: f32 = -250.0;

/// Reads text spans from PDF files
pub struct PdfSpanReader;

impl PdfSpanReader {
    /// Read spans from a PDF file
    pub fn read(path: &Path) -> Result<Vec<TextSpan>> {
        let doc = PdfDocument::load(path)
            .map_err(|e| OutlineError::PdfReadFailed(format!("{}: {e}", path.display())))?;
        Self::collect(&doc, &path.display().to_string())
    }

    /// Read spans from an in-memory PDF
    pub fn read_bytes(bytes: &[u8]) -> Result<Vec<TextSpan>> {
        let doc = PdfDocument::load_mem(bytes)
            .map_err(|e| OutlineError::PdfReadFailed(e.to_string()))?;
        Self::collect(&doc, "<memory>")
    }

    fn collect(doc: &PdfDocument, origin: &str) -> Result<Vec<TextSpan>> {
        if doc.is_encrypted() {
            return Err(OutlineError::PdfReadFailed(format!("{origin}: document is encrypted")));
        }

        let mut spans = Vec::new();
        for (page_number, page_id) in doc.get_pages() {
            let content = match doc.get_page_content(page_id).and_then(|raw| Content::decode(&raw)) {
                Ok(content) => content,
                Err(e) => {
                    warn!(page = page_number, "skipping unreadable page in {origin}: {e}");
                    continue;
                }
            };

            let mut collector = SpanCollector::new(page_number);
            for operation in &content.operations {
                collector.apply(operation);
            }
            spans.extend(collector.finish());
        }

        debug!(count = spans.len(), "read spans from {origin}");
        Ok(spans)
    }

    /// Decode a PDF string operand
    pub fn decode_pdf_string(bytes: &[u8]) -> String {
        match bytes.strip_prefix(&[0xFE, 0xFF]) {
            Some(utf16) => UTF_16BE.decode_without_bom_handling(utf16).0.into_owned(),
            None => WINDOWS_1252.decode_without_bom_handling(bytes).0.into_owned(),
        }
    }
}

/// Text state for one page while its operations are replayed
struct SpanCollector {
    page_index: u32,
    font_size: f32,
    vertical_scale: f32,
    current: String,
    current_size: Option<f32>,
    spans: Vec<TextSpan>,
}

impl SpanCollector {
    fn new(page_index: u32) -> Self {
        Self {
            page_index,
            font_size: 0.0,
            vertical_scale: 1.0,
            current: String::new(),
            current_size: None,
            spans: Vec::new(),
        }
    }

    fn effective_size(&self) -> f32 {
        (self.font_size * self.vertical_scale * 10.0).round() / 10.0
    }

    fn apply(&mut self, op: &Operation) {
        let operand = |i: usize| op.operands.get(i);

        match op.operator.as_str() {
            "BT" | "ET" => {
                self.flush();
                self.vertical_scale = 1.0;
            }
            "Tf" => {
                if let Some(size) = operand(1).and_then(|o| o.as_float().ok()) {
                    self.font_size = size;
                }
            }
            "Tm" => {
                self.flush();
                let c = operand(2).and_then(|o| o.as_float().ok()).unwrap_or(0.0);
                let d = operand(3).and_then(|o| o.as_float().ok()).unwrap_or(1.0);
                self.vertical_scale = c.hypot(d);
            }
            "Td" | "TD" | "T*" => self.flush(),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operand(0) {
                    self.push_text(bytes);
                }
            }
            "'" => {
                self.flush();
                if let Some(Object::String(bytes, _)) = operand(0) {
                    self.push_text(bytes);
                }
            }
            "\"" => {
                self.flush();
                if let Some(Object::String(bytes, _)) = operand(2) {
                    self.push_text(bytes);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operand(0) {
                    for item in items {
                        match item {
                            Object::String(bytes, _) => self.push_text(bytes),
                            other => {
                                if other.as_float().is_ok_and(|adj| adj < TJ_SPACE_THRESHOLD) {
                                    self.push_gap();
                                }
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn push_text(&mut self, bytes: &[u8]) {
        let size = self.effective_size();
        if self.current_size.is_some_and(|current| current != size) {
            self.flush();
        }
        self.current_size = Some(size);
        self.current.push_str(&PdfSpanReader::decode_pdf_string(bytes));
    }

    fn push_gap(&mut self) {
        if !self.current.is_empty() && !self.current.ends_with(char::is_whitespace) {
            self.current.push(' ');
        }
    }

    fn flush(&mut self) {
        let text = mem::take(&mut self.current);
        let Some(size) = self.current_size.take() else {
            return;
        };
        let text = text.trim();
        if !text.is_empty() {
            self.spans.push(TextSpan::new(text, size, self.page_index));
        }
    }

    fn finish(mut self) -> Vec<TextSpan> {
        self.flush();
        self.spans
    }
}

// ============================================================
// Tests
// ============================================================
