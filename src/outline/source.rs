//! Heading source abstraction
//!
//! Each input modality (Markdown text, PDF spans) implements [`HeadingSource`]
//! so page resolution and outline building stay modality-agnostic.

use super::types::HeadingCandidate;

/// A front end that detects heading candidates in one kind of input
pub trait HeadingSource {
    /// Short name of the modality, used in logs
    fn name(&self) -> &'static str;

    /// Produce heading candidates in encounter order
    ///
    /// `position` values are consecutive from 0 in the returned order.
    fn heading_candidates(&self) -> Vec<HeadingCandidate>;
}
