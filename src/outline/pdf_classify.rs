//! PDF Span Classifier
//!
//! Assigns heading levels to PDF text spans from the document's font-size
//! distribution. The most frequent size is body text; distinct larger sizes are
//! ranked and mapped to H1-H3.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::source::HeadingSource;
use super::types::{HeadingCandidate, HeadingLevel, TextSpan, MAX_PDF_HEADING_LEVEL};

/// Exact font size used as a histogram and ranking key
///
/// Bit patterns of finite positive `f32`s order the same way as the values.
type SizeKey = u32;

/// Heading classifier over a document's spans, in reading order
pub struct PdfSpanClassifier<'a> {
    spans: &'a [TextSpan],
}

impl<'a> PdfSpanClassifier<'a> {
    /// Create a classifier for the given spans
    pub fn new(spans: &'a [TextSpan]) -> Self {
        Self { spans }
    }

    /// Key for a font size; unusable sizes give `None`
    fn size_key(font_size: f32) -> Option<SizeKey> {
        if !font_size.is_finite() || font_size <= 0.0 {
            return None;
        }
        Some(font_size.to_bits())
    }

    fn key_to_size(key: SizeKey) -> f32 {
        f32::from_bits(key)
    }

    /// Most frequent font size across all spans
    ///
    /// When several sizes tie for the highest count, the smallest wins.
    pub fn body_font_size(spans: &[TextSpan]) -> Option<f32> {
        let mut histogram: BTreeMap<SizeKey, usize> = BTreeMap::new();
        for key in spans.iter().filter_map(|s| Self::size_key(s.font_size)) {
            *histogram.entry(key).or_default() += 1;
        }

        let mut best: Option<(SizeKey, usize)> = None;
        for (&key, &count) in &histogram {
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((key, count));
            }
        }

        best.map(|(key, _)| Self::key_to_size(key))
    }

    /// Map each heading-sized font size to its level
    ///
    /// Only sizes strictly above `body` on spans with visible text count.
    /// The largest becomes level 1; sizes ranked past level 3 get no level.
    fn level_table(spans: &[TextSpan], body: f32) -> HashMap<SizeKey, HeadingLevel> {
        let body_key = Self::size_key(body).unwrap_or(0);

        let mut sizes: Vec<SizeKey> = spans
            .iter()
            .filter(|s| !s.text.trim().is_empty())
            .filter_map(|s| Self::size_key(s.font_size))
            .filter(|&key| key > body_key)
            .collect();
        sizes.sort_unstable_by(|a, b| b.cmp(a));
        sizes.dedup();

        sizes
            .into_iter()
            .take(MAX_PDF_HEADING_LEVEL as usize)
            .enumerate()
            .map(|(rank, key)| (key, HeadingLevel::clamped(rank + 1)))
            .collect()
    }

    /// Estimate a span's heading level against a precomputed table
    fn estimate_heading_level(
        span: &TextSpan,
        table: &HashMap<SizeKey, HeadingLevel>,
    ) -> Option<HeadingLevel> {
        if span.text.trim().is_empty() {
            return None;
        }
        Self::size_key(span.font_size).and_then(|key| table.get(&key).copied())
    }
}

impl HeadingSource for PdfSpanClassifier<'_> {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn heading_candidates(&self) -> Vec<HeadingCandidate> {
        let Some(body) = Self::body_font_size(self.spans) else {
            return Vec::new();
        };
        let table = Self::level_table(self.spans, body);
        debug!(body_size = body, heading_sizes = table.len(), "font size levels computed");

        let mut candidates = Vec::new();
        for span in self.spans {
            let Some(level) = Self::estimate_heading_level(span, &table) else {
                continue;
            };

            let text = span.text.trim();
            let mut candidate = HeadingCandidate::new(level, text, text, candidates.len());
            candidate.source_page_index = Some(span.page_index);
            candidates.push(candidate);
        }

        debug!(count = candidates.len(), "pdf headings detected");
        candidates
    }
}

// ============================================================
// Tests
// ============================================================
