//! Batch processing
//!
//! Converts every supported file of a directory in parallel. A failing file
//! is recorded and the rest of the batch keeps going.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use thiserror::Error;
use tracing::{info, warn};

use crate::outline::{Document, InputFormat, OutlineError, OutlineExtractor};
use crate::progress::{batch_progress_bar, BatchSummary, OutputMode};
use crate::schema::{SchemaValidator, ValidationIssue};

/// Suffix of outputs written for span inputs; never picked up as input
const OUTLINE_JSON_SUFFIX: &str = ".outline.json";

// ============================================================
// Error Types
// ============================================================

/// Failure converting one file
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Outline(#[from] OutlineError),

    #[error("Output for {} failed schema validation ({} errors)", .path.display(), .issues.len())]
    ValidationFailed {
        path: PathBuf,
        issues: Vec<ValidationIssue>,
    },

    #[error("Output {} is already written by {}", .output.display(), .other.display())]
    OutputConflict { output: PathBuf, other: PathBuf },
}

// ============================================================
// Single File
// ============================================================

/// Check a document against the schema when validation is enabled
pub fn check_document(
    extractor: &OutlineExtractor,
    input: &Path,
    document: &Document,
) -> Result<(), ConvertError> {
    if !extractor.options().validate {
        return Ok(());
    }

    let result = SchemaValidator::validate_document(document);
    for warning in result.warnings() {
        info!("{}: {}", input.display(), warning);
    }
    if result.valid {
        return Ok(());
    }

    Err(ConvertError::ValidationFailed {
        path: input.to_path_buf(),
        issues: result.errors().cloned().collect(),
    })
}

/// Extract, optionally validate, and write one file's outline
///
/// Nothing is written when validation fails.
pub fn convert_file(
    extractor: &OutlineExtractor,
    input: &Path,
    output: &Path,
) -> Result<Document, ConvertError> {
    let document = extractor.extract_file(input)?;
    check_document(extractor, input, &document)?;
    extractor.write_output(&document, output)?;
    Ok(document)
}

/// Supported files directly inside `dir`, sorted by path
///
/// Without a forced format, Markdown and PDF files are picked. A forced
/// format picks only files whose extension maps to it, so `--format spans`
/// is needed for span JSON. Outline outputs are always skipped.
pub fn collect_input_files(dir: &Path, format: Option<InputFormat>) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || is_outline_output(&path) {
            continue;
        }

        let detected = InputFormat::from_path(&path);
        let wanted = match format {
            Some(forced) => detected == Some(forced),
            None => matches!(detected, Some(InputFormat::Markdown | InputFormat::Pdf)),
        };
        if wanted {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

fn is_outline_output(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.to_ascii_lowercase().ends_with(OUTLINE_JSON_SUFFIX))
}

// ============================================================
// Batch
// ============================================================

/// One failed file in a batch
#[derive(Debug)]
pub struct BatchFailure {
    pub path: PathBuf,
    pub error: ConvertError,
}

/// Batch outcome
#[derive(Debug, Default)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: usize,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    /// Check if any file failed
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Check if every failure was a schema violation
    pub fn only_validation_failures(&self) -> bool {
        self.has_failures()
            && self
                .failures
                .iter()
                .all(|f| matches!(f.error, ConvertError::ValidationFailed { .. }))
    }

    /// Totals for printing
    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            total: self.total,
            succeeded: self.succeeded,
            failed: self.failures.len(),
        }
    }
}

/// Parallel directory converter
pub struct BatchProcessor<'a> {
    extractor: &'a OutlineExtractor,
    output_dir: PathBuf,
    mode: OutputMode,
}

impl<'a> BatchProcessor<'a> {
    /// Create a processor writing into `output_dir`
    pub fn new(extractor: &'a OutlineExtractor, output_dir: impl Into<PathBuf>, mode: OutputMode) -> Self {
        Self {
            extractor,
            output_dir: output_dir.into(),
            mode,
        }
    }

    /// Output path for each input, in input order
    ///
    /// Inputs sharing a stem keep their extension in the output name
    /// (`notes.md.json`, `notes.txt.json`). A path that still clashes is
    /// refused for every input after the first one claiming it.
    pub fn plan_outputs(&self, files: &[PathBuf]) -> Vec<Result<PathBuf, ConvertError>> {
        let dir = self.output_dir.as_path();
        let defaults: Vec<PathBuf> = files
            .iter()
            .map(|input| OutlineExtractor::output_path_for(input, Some(dir)))
            .collect();

        let mut counts: HashMap<&Path, usize> = HashMap::new();
        for output in &defaults {
            *counts.entry(output.as_path()).or_default() += 1;
        }

        let mut claimed: HashMap<PathBuf, &Path> = HashMap::new();
        let mut planned = Vec::with_capacity(files.len());
        for (input, default) in files.iter().zip(&defaults) {
            let output = if counts.get(default.as_path()).copied().unwrap_or(0) > 1 {
                let name = input.file_name().unwrap_or(input.as_os_str()).to_string_lossy();
                dir.join(format!("{name}.json"))
            } else {
                default.clone()
            };

            match claimed.get(&output) {
                Some(other) => planned.push(Err(ConvertError::OutputConflict {
                    output,
                    other: other.to_path_buf(),
                })),
                None => {
                    claimed.insert(output.clone(), input.as_path());
                    planned.push(Ok(output));
                }
            }
        }
        planned
    }

    /// Convert all files; results are reported in input order
    pub fn run(&self, files: &[PathBuf]) -> BatchReport {
        let bar = batch_progress_bar(files.len(), self.mode);
        let planned = self.plan_outputs(files);

        let results: Vec<(PathBuf, Result<Document, ConvertError>)> = files
            .par_iter()
            .zip(planned)
            .map(|(input, output)| {
                let result = output.and_then(|output| {
                    convert_file(self.extractor, input, &output).map(|doc| (doc, output))
                });

                match &result {
                    Ok((doc, output)) if self.mode.should_show(OutputMode::Verbose) => bar.println(format!(
                        "  {} -> {} ({} headings)",
                        input.display(),
                        output.display(),
                        doc.outline.len()
                    )),
                    Ok(_) => {}
                    Err(e) => warn!("{}: {}", input.display(), e),
                }
                bar.inc(1);

                (input.clone(), result.map(|(doc, _)| doc))
            })
            .collect();
        bar.finish_and_clear();

        let mut report = BatchReport {
            total: files.len(),
            ..BatchReport::default()
        };
        for (path, result) in results {
            match result {
                Ok(_) => report.succeeded += 1,
                Err(error) => report.failures.push(BatchFailure { path, error }),
            }
        }
        report
    }
}

// ============================================================
// Tests
// ============================================================
