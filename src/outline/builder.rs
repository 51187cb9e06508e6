//! Outline Builder
//!
//! Turns resolved headings into the final [`Document`]. Order is kept exactly
//! as given; entries are never sorted, grouped, or deduplicated.

use super::types::{Document, HeadingCandidate, HeadingLevel, OutlineEntry, ResolvedHeading};

/// Assembles the `{title, outline}` document
pub struct OutlineBuilder;

impl OutlineBuilder {
    /// Build a document from resolved headings
    pub fn build(headings: &[ResolvedHeading]) -> Document {
        let title = Self::derive_title(headings.iter().map(|h| &h.candidate));

        let outline = headings
            .iter()
            .map(|h| OutlineEntry {
                level: h.candidate.level,
                text: h.candidate.clean_text.clone(),
                page: h.page,
            })
            .collect();

        Document { title, outline }
    }

    /// First H1's text, else the first heading's text, else empty
    pub fn derive_title<'a>(candidates: impl Iterator<Item = &'a HeadingCandidate> + Clone) -> String {
        candidates
            .clone()
            .find(|c| c.level == HeadingLevel::H1)
            .or_else(|| candidates.clone().next())
            .map(|c| c.clean_text.clone())
            .unwrap_or_default()
    }
}

// ============================================================
// Tests
// ============================================================
