//! Markdown Heading Scanner
//!
//! Line-oriented detection of ATX (`#`) headings. Setext headings are not
//! recognized, and there is no fenced-code or blockquote tracking: a `#` line
//! inside a code fence is still reported as a heading.

use tracing::debug;

use super::source::HeadingSource;
use super::text_clean::clean_heading_text;
use super::types::{HeadingCandidate, HeadingLevel, MAX_HEADING_LEVEL};

/// Heading scanner over an in-memory Markdown document
pub struct MarkdownHeadingScanner<'a> {
    text: &'a str,
}

impl<'a> MarkdownHeadingScanner<'a> {
    /// Create a scanner for the given document text
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    /// Split a line into its heading level and raw text
    ///
    /// A heading line is optional leading whitespace, 1-6 `#`, then at least
    /// one whitespace character. The raw text is the remainder, trimmed.
    pub fn parse_heading_line(line: &str) -> Option<(HeadingLevel, &str)> {
        let trimmed = line.trim_start();
        let hashes = trimmed.bytes().take_while(|&b| b == b'#').count();
        if hashes == 0 || hashes > MAX_HEADING_LEVEL as usize {
            return None;
        }

        let rest = &trimmed[hashes..];
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }

        Some((HeadingLevel::clamped(hashes), rest.trim()))
    }
}

impl HeadingSource for MarkdownHeadingScanner<'_> {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn heading_candidates(&self) -> Vec<HeadingCandidate> {
        let mut candidates = Vec::new();

        for (index, line) in self.text.lines().enumerate() {
            let Some((level, raw_text)) = Self::parse_heading_line(line) else {
                continue;
            };

            let cleaned = clean_heading_text(raw_text);
            if cleaned.text.is_empty() {
                debug!(line = index + 1, "discarding heading with empty text");
                continue;
            }

            let mut candidate =
                HeadingCandidate::new(level, raw_text, cleaned.text, candidates.len());
            if let Some((start, end)) = cleaned.annotations.line_range {
                candidate.line_start = Some(start);
                candidate.line_end = Some(end);
            }
            candidate.explicit_page = cleaned.annotations.page;
            candidate.source_line = Some(index + 1);

            candidates.push(candidate);
        }

        debug!(count = candidates.len(), "markdown headings detected");
        candidates
    }
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str) -> Vec<HeadingCandidate> {
        MarkdownHeadingScanner::new(text).heading_candidates()
    }

    #[test]
    fn test_parse_heading_line() {
        let (level, text) = MarkdownHeadingScanner::parse_heading_line("# Heading 1").unwrap();
        assert_eq!(level.get(), 1);
        assert_eq!(text, "Heading 1");

        let (level, text) =
            MarkdownHeadingScanner::parse_heading_line("   ###\tTabbed   ").unwrap();
        assert_eq!(level.get(), 3);
        assert_eq!(text, "Tabbed");

        let (level, _) = MarkdownHeadingScanner::parse_heading_line("###### Six").unwrap();
        assert_eq!(level.get(), 6);
    }

    #[test]
    fn test_parse_heading_line_rejects() {
        assert!(MarkdownHeadingScanner::parse_heading_line("####### Too deep").is_none());
        assert!(MarkdownHeadingScanner::parse_heading_line("#NoSpace").is_none());
        assert!(MarkdownHeadingScanner::parse_heading_line("#").is_none());
        assert!(MarkdownHeadingScanner::parse_heading_line("Not a heading").is_none());
        assert!(MarkdownHeadingScanner::parse_heading_line("").is_none());
        assert!(MarkdownHeadingScanner::parse_heading_line("Title\n===").is_none());
    }

    #[test]
    fn test_level_matches_hash_count() {
        let text = "# one\n## two\n### three\n#### four\n##### five\n###### six";
        let candidates = scan(text);
        assert_eq!(candidates.len(), 6);
        for (i, c) in candidates.iter().enumerate() {
            assert_eq!(c.level.get() as usize, i + 1);
            assert_eq!(c.position, i);
        }
    }

    #[test]
    fn test_candidate_fields() {
        let candidates = scan("intro\n\n# **RFP: Request for Proposal** [L3-4]\n");
        assert_eq!(candidates.len(), 1);

        let c = &candidates[0];
        assert_eq!(c.raw_text, "**RFP: Request for Proposal** [L3-4]");
        assert_eq!(c.clean_text, "RFP: Request for Proposal");
        assert_eq!(c.line_start, Some(3));
        assert_eq!(c.line_end, Some(4));
        assert_eq!(c.explicit_page, None);
        assert_eq!(c.source_page_index, None);
        assert_eq!(c.source_line, Some(3));
    }

    #[test]
    fn test_page_annotation_captured() {
        let candidates = scan("## Budget [page 12]");
        assert_eq!(candidates[0].clean_text, "Budget");
        assert_eq!(candidates[0].explicit_page, Some(12));
        assert_eq!(candidates[0].line_start, None);
    }

    #[test]
    fn test_empty_headings_discarded() {
        let candidates = scan("# \n## ** **\n### [L1-2]\n#### Kept");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].clean_text, "Kept");
        assert_eq!(candidates[0].position, 0);
        assert_eq!(candidates[0].source_line, Some(4));
    }

    #[test]
    fn test_headings_inside_code_fence_are_reported() {
        let candidates = scan("```\n# inside fence\n```\n> # quoted");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].clean_text, "inside fence");
    }

    #[test]
    fn test_setext_not_recognized() {
        assert!(scan("Title\n=====\nSub\n-----").is_empty());
    }

    #[test]
    fn test_crlf_lines() {
        let candidates = scan("# One\r\n## Two\r\n");
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[1].clean_text, "Two");
        assert_eq!(candidates[1].source_line, Some(2));
    }

    #[test]
    fn test_duplicates_kept() {
        let candidates = scan("## Notes\n## Notes");
        assert_eq!(candidates.len(), 2);
    }
}
