//! Page Resolver
//!
//! Picks one page number per heading candidate. Signals are tried from most to
//! least reliable:
//!
//! 1. explicit `[page <n>]` annotation
//! 2. `[L<a>-<b>]` annotation, estimated from its first line
//! 3. PDF source page
//! 4. the heading's own line in the source, estimated the same way

use super::types::{HeadingCandidate, ResolvedHeading, DEFAULT_LINES_PER_PAGE, MIN_LINES_PER_PAGE};

/// Resolves candidate pages from annotations, PDF metadata, or line counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageResolver {
    lines_per_page: u32,
}

impl Default for PageResolver {
    fn default() -> Self {
        Self::new(DEFAULT_LINES_PER_PAGE)
    }
}

impl PageResolver {
    /// Create a resolver; `lines_per_page` is clamped to at least 1
    pub fn new(lines_per_page: u32) -> Self {
        Self {
            lines_per_page: lines_per_page.max(MIN_LINES_PER_PAGE),
        }
    }

    /// Configured lines per page
    pub fn lines_per_page(&self) -> u32 {
        self.lines_per_page
    }

    /// Estimated page of a 1-based line: `floor((line - 1) / lines_per_page) + 1`
    pub fn page_for_line(&self, line: usize) -> u32 {
        let page = line.saturating_sub(1) / self.lines_per_page as usize + 1;
        u32::try_from(page).unwrap_or(u32::MAX)
    }

    /// Resolve the page of one candidate
    ///
    /// `line_watermark` is the absolute line of the candidate in the source,
    /// used only when no better signal is present.
    pub fn resolve(&self, candidate: &HeadingCandidate, line_watermark: usize) -> u32 {
        if let Some(page) = candidate.explicit_page {
            return page;
        }
        if let Some(line_start) = candidate.line_start {
            return self.page_for_line(line_start);
        }
        if let Some(page) = candidate.source_page_index {
            return page;
        }
        self.page_for_line(line_watermark)
    }

    /// Resolve every candidate, keeping their order
    ///
    /// Candidates without a source line advance the watermark by one line.
    pub fn resolve_all(&self, candidates: Vec<HeadingCandidate>) -> Vec<ResolvedHeading> {
        let mut watermark = 0usize;
        candidates
            .into_iter()
            .map(|candidate| {
                watermark = candidate.source_line.unwrap_or(watermark + 1);
                let page = self.resolve(&candidate, watermark);
                ResolvedHeading { candidate, page }
            })
            .collect()
    }
}

// ============================================================
// Tests
// ============================================================
