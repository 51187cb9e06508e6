//! Heading text cleanup
//!
//! Pure transforms that turn the raw text of a heading into its display text:
//! trailing `[L<a>-<b>]` / `[page <n>]` annotations are captured and removed,
//! and inline emphasis and code delimiters are dropped.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

static LINE_RANGE_ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[L(\d+)-(\d+)\]$").expect("valid line range regex"));

static PAGE_ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[page\s+(\d+)\]$").expect("valid page regex"));

static CODE_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("valid code span regex"));

static BOLD_STAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid bold regex"));

static BOLD_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[^\w])__(.+?)__([^\w]|$)").expect("valid bold regex"));

static ITALIC_STAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*]+)\*").expect("valid italic regex"));

static ITALIC_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[^\w])_([^_]+)_([^\w]|$)").expect("valid italic regex"));

static CODE_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\u{E000}(\\d+)\u{E001}").expect("valid placeholder regex"));

/// Fields captured from trailing heading annotations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Annotations {
    /// `(start, end)` from `[L<start>-<end>]`
    pub line_range: Option<(usize, usize)>,

    /// `n` from `[page <n>]`
    pub page: Option<u32>,
}

impl Annotations {
    /// Check if nothing was captured
    pub fn is_empty(&self) -> bool {
        self.line_range.is_none() && self.page.is_none()
    }
}

/// Raw heading text after cleanup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedHeading {
    pub text: String,
    pub annotations: Annotations,
}

/// Clean a heading's raw text: annotations first, then inline markup
pub fn clean_heading_text(raw: &str) -> CleanedHeading {
    let (rest, annotations) = strip_annotations(raw);
    let text = strip_inline_markup(&rest).trim().to_string();
    CleanedHeading { text, annotations }
}

/// Remove trailing annotations, capturing their values
///
/// Every well-formed trailing annotation is removed. When a kind appears more
/// than once, the first one in reading order supplies the value. A bracket that
/// looks like an annotation but does not parse (zero line, reversed range,
/// overflow) ends the scan and stays in the text.
pub fn strip_annotations(raw: &str) -> (String, Annotations) {
    let mut annotations = Annotations::default();
    let mut rest = raw.trim_end();

    loop {
        if let Some(caps) = LINE_RANGE_ANNOTATION.captures(rest) {
            let start = caps[1].parse::<usize>().ok();
            let end = caps[2].parse::<usize>().ok();
            match (start, end) {
                (Some(start), Some(end)) if start >= 1 && end >= start => {
                    annotations.line_range = Some((start, end));
                    rest = rest[..caps.get(0).map_or(rest.len(), |m| m.start())].trim_end();
                    continue;
                }
                _ => {
                    debug!(annotation = &caps[0], "ignoring malformed line range annotation");
                    break;
                }
            }
        }

        if let Some(caps) = PAGE_ANNOTATION.captures(rest) {
            match caps[1].parse::<u32>() {
                Ok(page) if page >= 1 => {
                    annotations.page = Some(page);
                    rest = rest[..caps.get(0).map_or(rest.len(), |m| m.start())].trim_end();
                    continue;
                }
                _ => {
                    debug!(annotation = &caps[0], "ignoring malformed page annotation");
                    break;
                }
            }
        }

        break;
    }

    (rest.to_string(), annotations)
}

/// Drop inline emphasis and code delimiters, keeping the enclosed text
///
/// Code span contents are kept verbatim; emphasis inside them is not touched.
/// Underscore emphasis only applies at word boundaries, so `snake_case` survives.
pub fn strip_inline_markup(text: &str) -> String {
    let mut code_spans: Vec<String> = Vec::new();
    let protected = CODE_SPAN.replace_all(text, |caps: &regex::Captures<'_>| {
        code_spans.push(caps[1].to_string());
        format!("\u{E000}{}\u{E001}", code_spans.len() - 1)
    });

    let mut current = protected.into_owned();
    loop {
        let next = strip_emphasis_once(&current);
        if next == current {
            break;
        }
        current = next;
    }

    CODE_PLACEHOLDER
        .replace_all(&current, |caps: &regex::Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|i| code_spans.get(i))
                .cloned()
                .unwrap_or_default()
        })
        .into_owned()
}

fn strip_emphasis_once(text: &str) -> String {
    let text = BOLD_STAR.replace_all(text, "$1");
    let text = BOLD_UNDERSCORE.replace_all(&text, "${1}${2}${3}");
    let text = ITALIC_STAR.replace_all(&text, "$1");
    let text = ITALIC_UNDERSCORE.replace_all(&text, "${1}${2}${3}");
    text.into_owned()
}

// ============================================================
// Tests
// ============================================================
