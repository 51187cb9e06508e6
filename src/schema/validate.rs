//! Outline Schema Validation
//!
//! Checks JSON against the fixed outline schema:
//!
//! ```text
//! {
//!   "title":   string                      (required)
//!   "outline": [                           (required)
//!     { "level": string  ^H[1-6]$          (required)
//!       "text":  string  minLength 1       (required)
//!       "page":  integer minimum 1 }       (required)
//!   ]
//! }
//! ```
//!
//! Every violation is collected, not just the first. Heading-structure checks
//! are advisory and only produce warnings.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::outline::Document;

static LEVEL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^H[1-6]$").expect("valid level pattern"));

// ============================================================
// Error Types
// ============================================================

/// Schema validation error types
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SchemaError>;

// ============================================================
// Types
// ============================================================

/// Severity of a validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    /// Advisory, does not fail validation
    Warning,
    /// Schema violation
    Error,
}

/// A validation issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Issue severity
    pub severity: IssueSeverity,

    /// Description of the issue
    pub description: String,

    /// Field path, e.g. `outline[3].page`
    pub location: Option<String>,

    /// Violated constraint, e.g. `minimum 1`
    pub constraint: Option<String>,
}

impl ValidationIssue {
    /// Create a new issue
    pub fn new(severity: IssueSeverity, description: impl Into<String>) -> Self {
        Self {
            severity,
            description: description.into(),
            location: None,
            constraint: None,
        }
    }

    /// Set location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set constraint
    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = Some(constraint.into());
        self
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self.severity {
            IssueSeverity::Warning => "warning",
            IssueSeverity::Error => "error",
        };
        write!(f, "{tag}")?;
        if let Some(location) = &self.location {
            write!(f, " at {location}")?;
        }
        write!(f, ": {}", self.description)?;
        if let Some(constraint) = &self.constraint {
            write!(f, " [{constraint}]")?;
        }
        Ok(())
    }
}

/// Result of validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    /// No error-severity issues were found
    pub valid: bool,

    /// Issues found, in document order
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    fn from_issues(issues: Vec<ValidationIssue>) -> Self {
        let valid = issues.iter().all(|i| i.severity != IssueSeverity::Error);
        Self { valid, issues }
    }

    /// Error-severity issues
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == IssueSeverity::Error)
    }

    /// Warning-severity issues
    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == IssueSeverity::Warning)
    }
}

// ============================================================
// Schema Validator
// ============================================================

/// Validator for outline JSON
pub struct SchemaValidator;

impl SchemaValidator {
    /// Validate a document
    pub fn validate_document(document: &Document) -> ValidationResult {
        match serde_json::to_value(document) {
            Ok(value) => Self::validate_value(&value),
            Err(e) => ValidationResult::from_issues(vec![ValidationIssue::new(
                IssueSeverity::Error,
                format!("document does not serialize: {e}"),
            )]),
        }
    }

    /// Validate an outline JSON file
    pub fn validate_file(path: &Path) -> Result<ValidationResult> {
        let content = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&content)?;
        Ok(Self::validate_value(&value))
    }

    /// Validate arbitrary JSON against the outline schema
    pub fn validate_value(value: &Value) -> ValidationResult {
        let mut issues = Vec::new();

        let Some(root) = value.as_object() else {
            issues.push(type_error("$", "object"));
            return ValidationResult::from_issues(issues);
        };

        if let Some(title) = required(root, "title", "title", &mut issues) {
            if !title.is_string() {
                issues.push(type_error("title", "string"));
            }
        }

        if let Some(outline) = required(root, "outline", "outline", &mut issues) {
            match outline.as_array() {
                Some(items) => {
                    for (index, item) in items.iter().enumerate() {
                        Self::check_entry(item, &format!("outline[{index}]"), &mut issues);
                    }
                    if issues.is_empty() {
                        Self::check_heading_structure(items, &mut issues);
                    }
                }
                None => issues.push(type_error("outline", "array")),
            }
        }

        ValidationResult::from_issues(issues)
    }

    fn check_entry(item: &Value, path: &str, issues: &mut Vec<ValidationIssue>) {
        let Some(entry) = item.as_object() else {
            issues.push(type_error(path, "object"));
            return;
        };

        let level_path = format!("{path}.level");
        if let Some(level) = required(entry, "level", &level_path, issues) {
            match level.as_str() {
                Some(s) if LEVEL_PATTERN.is_match(s) => {}
                Some(s) => issues.push(
                    ValidationIssue::new(IssueSeverity::Error, format!("invalid heading level {s:?}"))
                        .with_location(&level_path)
                        .with_constraint("pattern ^H[1-6]$"),
                ),
                None => issues.push(type_error(&level_path, "string")),
            }
        }

        let text_path = format!("{path}.text");
        if let Some(text) = required(entry, "text", &text_path, issues) {
            match text.as_str() {
                Some("") => issues.push(
                    ValidationIssue::new(IssueSeverity::Error, "heading text is empty")
                        .with_location(&text_path)
                        .with_constraint("minLength 1"),
                ),
                Some(_) => {}
                None => issues.push(type_error(&text_path, "string")),
            }
        }

        let page_path = format!("{path}.page");
        if let Some(page) = required(entry, "page", &page_path, issues) {
            match page.as_i64() {
                Some(n) if n >= 1 => {}
                Some(n) => issues.push(
                    ValidationIssue::new(IssueSeverity::Error, format!("page {n} is below 1"))
                        .with_location(&page_path)
                        .with_constraint("minimum 1"),
                ),
                None if page.is_u64() => {}
                None => issues.push(type_error(&page_path, "integer")),
            }
        }
    }

    /// Warn on skipped levels and repeated H1 headings
    fn check_heading_structure(items: &[Value], issues: &mut Vec<ValidationIssue>) {
        let mut last_level = 0u8;
        let mut has_h1 = false;

        for (index, item) in items.iter().enumerate() {
            let Some(level) = item
                .get("level")
                .and_then(Value::as_str)
                .and_then(|s| s.strip_prefix('H'))
                .and_then(|d| d.parse::<u8>().ok())
            else {
                continue;
            };
            let location = format!("outline[{index}].level");

            if level == 1 {
                if has_h1 {
                    issues.push(
                        ValidationIssue::new(IssueSeverity::Warning, "Multiple H1 headings found")
                            .with_location(&location),
                    );
                }
                has_h1 = true;
            }

            if last_level > 0 && level > last_level + 1 {
                issues.push(
                    ValidationIssue::new(
                        IssueSeverity::Warning,
                        format!("Skipped heading level (H{last_level} to H{level})"),
                    )
                    .with_location(&location),
                );
            }

            last_level = level;
        }
    }
}

fn required<'a>(
    object: &'a Map<String, Value>,
    key: &str,
    path: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Option<&'a Value> {
    let value = object.get(key);
    if value.is_none() {
        issues.push(
            ValidationIssue::new(IssueSeverity::Error, format!("missing field '{key}'"))
                .with_location(path)
                .with_constraint("required"),
        );
    }
    value
}

fn type_error(path: &str, expected: &str) -> ValidationIssue {
    ValidationIssue::new(IssueSeverity::Error, format!("expected {expected}"))
        .with_location(path)
        .with_constraint(format!("type {expected}"))
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::OutlineExtractor;
    use serde_json::json;

    fn error_at<'a>(result: &'a ValidationResult, location: &str) -> &'a ValidationIssue {
        result
            .errors()
            .find(|i| i.location.as_deref() == Some(location))
            .unwrap_or_else(|| panic!("no error at {location}: {:?}", result.issues))
    }

    #[test]
    fn test_valid_document() {
        let doc = OutlineExtractor::new().extract_markdown("# A\n## B\n### C");
        let result = SchemaValidator::validate_document(&doc);
        assert!(result.valid);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_empty_document_is_valid() {
        let result = SchemaValidator::validate_value(&json!({"title": "", "outline": []}));
        assert!(result.valid);
    }

    #[test]
    fn test_missing_root_fields() {
        let result = SchemaValidator::validate_value(&json!({}));
        assert!(!result.valid);
        assert_eq!(error_at(&result, "title").constraint.as_deref(), Some("required"));
        assert_eq!(error_at(&result, "outline").constraint.as_deref(), Some("required"));
    }

    #[test]
    fn test_root_not_object() {
        let result = SchemaValidator::validate_value(&json!([1, 2]));
        assert!(!result.valid);
        assert_eq!(error_at(&result, "$").constraint.as_deref(), Some("type object"));
    }

    #[test]
    fn test_wrong_root_types() {
        let result = SchemaValidator::validate_value(&json!({"title": 5, "outline": {}}));
        assert_eq!(error_at(&result, "title").constraint.as_deref(), Some("type string"));
        assert_eq!(error_at(&result, "outline").constraint.as_deref(), Some("type array"));
    }

    #[test]
    fn test_entry_violations_with_paths() {
        let value = json!({
            "title": "T",
            "outline": [
                {"level": "H1", "text": "ok", "page": 1},
                {"level": "H7", "text": "", "page": 0},
                {"level": 2, "text": "x"},
                "not an object"
            ]
        });
        let result = SchemaValidator::validate_value(&value);
        assert!(!result.valid);

        assert_eq!(
            error_at(&result, "outline[1].level").constraint.as_deref(),
            Some("pattern ^H[1-6]$")
        );
        assert_eq!(error_at(&result, "outline[1].text").constraint.as_deref(), Some("minLength 1"));
        assert_eq!(error_at(&result, "outline[1].page").constraint.as_deref(), Some("minimum 1"));
        assert_eq!(error_at(&result, "outline[2].level").constraint.as_deref(), Some("type string"));
        assert_eq!(error_at(&result, "outline[2].page").constraint.as_deref(), Some("required"));
        assert_eq!(error_at(&result, "outline[3]").constraint.as_deref(), Some("type object"));
        assert_eq!(result.errors().count(), 6);
    }

    #[test]
    fn test_page_must_be_integer() {
        let value = json!({"title": "T", "outline": [{"level": "H1", "text": "a", "page": 1.5}]});
        let result = SchemaValidator::validate_value(&value);
        assert_eq!(error_at(&result, "outline[0].page").constraint.as_deref(), Some("type integer"));
    }

    #[test]
    fn test_structure_warnings_keep_valid() {
        let value = json!({
            "title": "A",
            "outline": [
                {"level": "H1", "text": "A", "page": 1},
                {"level": "H3", "text": "B", "page": 1},
                {"level": "H1", "text": "C", "page": 2}
            ]
        });
        let result = SchemaValidator::validate_value(&value);
        assert!(result.valid);
        let warnings: Vec<_> = result.warnings().map(|w| w.description.as_str()).collect();
        assert_eq!(warnings, vec!["Skipped heading level (H1 to H3)", "Multiple H1 headings found"]);
    }

    #[test]
    fn test_validation_does_not_mutate() {
        let doc = OutlineExtractor::new().extract_markdown("## Only [page 2]");
        let before = doc.clone();
        let _ = SchemaValidator::validate_document(&doc);
        assert_eq!(doc, before);
    }

    #[test]
    fn test_issue_display() {
        let issue = ValidationIssue::new(IssueSeverity::Error, "page 0 is below 1")
            .with_location("outline[3].page")
            .with_constraint("minimum 1");
        assert_eq!(issue.to_string(), "error at outline[3].page: page 0 is below 1 [minimum 1]");
    }

    #[test]
    fn test_validate_file() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.json");
        std::fs::write(&good, r#"{"title":"A","outline":[{"level":"H1","text":"A","page":1}]}"#).unwrap();
        assert!(SchemaValidator::validate_file(&good).unwrap().valid);

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(SchemaValidator::validate_file(&broken), Err(SchemaError::JsonError(_))));

        let missing = dir.path().join("missing.json");
        assert!(matches!(SchemaValidator::validate_file(&missing), Err(SchemaError::IoError(_))));
    }
}
