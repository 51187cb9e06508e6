//! Progress reporting for outline extraction.
//!
//! Stage notifications for single documents go through [`ProgressCallback`];
//! directory batches use an `indicatif` bar.

use std::fmt;

use indicatif::{ProgressBar, ProgressStyle};

/// Processing stages for one document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingStage {
    /// Initializing
    #[default]
    Initializing,
    /// Reading and decoding the input
    Reading,
    /// Detecting heading candidates
    Scanning,
    /// Resolving page numbers
    Resolving,
    /// Assembling the outline
    Building,
    /// Checking output against the schema
    Validating,
    /// Writing JSON
    Writing,
    /// Completed
    Completed,
}

impl ProcessingStage {
    /// Get the name of the stage
    pub fn name(&self) -> &'static str {
        match self {
            ProcessingStage::Initializing => "Initializing",
            ProcessingStage::Reading => "Reading",
            ProcessingStage::Scanning => "Scanning",
            ProcessingStage::Resolving => "Resolving",
            ProcessingStage::Building => "Building",
            ProcessingStage::Validating => "Validating",
            ProcessingStage::Writing => "Writing",
            ProcessingStage::Completed => "Completed",
        }
    }

    /// Get a short description of the stage
    pub fn description(&self) -> &'static str {
        match self {
            ProcessingStage::Initializing => "preparing",
            ProcessingStage::Reading => "decoding input",
            ProcessingStage::Scanning => "detecting headings",
            ProcessingStage::Resolving => "resolving pages",
            ProcessingStage::Building => "assembling outline",
            ProcessingStage::Validating => "checking schema",
            ProcessingStage::Writing => "writing JSON",
            ProcessingStage::Completed => "done",
        }
    }
}

impl fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.description())
    }
}

/// Output verbosity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// No output
    Quiet,
    /// Normal output (results and summary)
    #[default]
    Normal,
    /// Verbose output (stage display)
    Verbose,
    /// Very verbose (debug details)
    VeryVerbose,
}

impl OutputMode {
    /// Create OutputMode from verbosity flags
    pub fn from_flags(verbosity: u8, quiet: bool) -> Self {
        if quiet {
            return OutputMode::Quiet;
        }
        match verbosity {
            0 => OutputMode::Normal,
            1 => OutputMode::Verbose,
            _ => OutputMode::VeryVerbose,
        }
    }

    /// Check if output should be shown at this mode
    pub fn should_show(&self, required: OutputMode) -> bool {
        use OutputMode::*;
        match (self, required) {
            (Quiet, _) => false,
            (Normal, Quiet | Normal) => true,
            (Verbose, Quiet | Normal | Verbose) => true,
            (VeryVerbose, _) => true,
            _ => false,
        }
    }
}

/// Receives stage notifications while a document is processed
pub trait ProgressCallback: Sync {
    /// A stage has started
    fn on_stage_start(&self, _stage: ProcessingStage) {}

    /// A stage has finished
    fn on_stage_complete(&self, _stage: ProcessingStage, _message: &str) {}

    /// Extra diagnostic detail
    fn on_debug(&self, _message: &str) {}
}

/// Callback that ignores every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {}

/// Progress bar for a directory batch; hidden when quiet
pub fn batch_progress_bar(total: usize, mode: OutputMode) -> ProgressBar {
    if !mode.should_show(OutputMode::Normal) {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}") {
        bar.set_style(style.progress_chars("=>-"));
    }
    bar
}

/// Batch totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    /// Render the summary block
    pub fn render(&self) -> String {
        let rule = "=".repeat(60);
        format!(
            "{rule}\nOutline Summary\n{rule}\n  Total files:  {}\n  Succeeded:    {}\n  Errors:       {}\n{rule}",
            self.total, self.succeeded, self.failed
        )
    }

    /// Print the summary block
    pub fn print(&self) {
        println!();
        println!("{}", self.render());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_processing_stage_name() {
        assert_eq!(ProcessingStage::Initializing.name(), "Initializing");
        assert_eq!(ProcessingStage::Reading.name(), "Reading");
        assert_eq!(ProcessingStage::Scanning.name(), "Scanning");
        assert_eq!(ProcessingStage::Resolving.name(), "Resolving");
        assert_eq!(ProcessingStage::Building.name(), "Building");
        assert_eq!(ProcessingStage::Validating.name(), "Validating");
        assert_eq!(ProcessingStage::Writing.name(), "Writing");
        assert_eq!(ProcessingStage::Completed.name(), "Completed");
    }

    #[test]
    fn test_processing_stage_display() {
        assert_eq!(format!("{}", ProcessingStage::Scanning), "Scanning (detecting headings)");
    }

    #[test]
    fn test_processing_stage_default() {
        let stage: ProcessingStage = Default::default();
        assert_eq!(stage, ProcessingStage::Initializing);
    }

    #[test]
    fn test_output_mode_from_flags() {
        assert_eq!(OutputMode::from_flags(0, false), OutputMode::Normal);
        assert_eq!(OutputMode::from_flags(1, false), OutputMode::Verbose);
        assert_eq!(OutputMode::from_flags(2, false), OutputMode::VeryVerbose);
        assert_eq!(OutputMode::from_flags(10, false), OutputMode::VeryVerbose);
        assert_eq!(OutputMode::from_flags(2, true), OutputMode::Quiet);
    }

    #[test]
    fn test_output_mode_quiet() {
        let mode = OutputMode::Quiet;
        assert!(!mode.should_show(OutputMode::Quiet));
        assert!(!mode.should_show(OutputMode::Normal));
        assert!(!mode.should_show(OutputMode::Verbose));
    }

    #[test]
    fn test_output_mode_normal() {
        let mode = OutputMode::Normal;
        assert!(mode.should_show(OutputMode::Quiet));
        assert!(mode.should_show(OutputMode::Normal));
        assert!(!mode.should_show(OutputMode::Verbose));
        assert!(!mode.should_show(OutputMode::VeryVerbose));
    }

    #[test]
    fn test_output_mode_verbose() {
        let mode = OutputMode::Verbose;
        assert!(mode.should_show(OutputMode::Normal));
        assert!(mode.should_show(OutputMode::Verbose));
        assert!(!mode.should_show(OutputMode::VeryVerbose));
    }

    #[test]
    fn test_callback_defaults_are_noops() {
        struct Recorder(Mutex<Vec<ProcessingStage>>);
        impl ProgressCallback for Recorder {
            fn on_stage_start(&self, stage: ProcessingStage) {
                self.0.lock().unwrap().push(stage);
            }
        }

        let recorder = Recorder(Mutex::new(Vec::new()));
        recorder.on_stage_start(ProcessingStage::Reading);
        recorder.on_stage_complete(ProcessingStage::Reading, "ok");
        recorder.on_debug("ignored");
        assert_eq!(*recorder.0.lock().unwrap(), vec![ProcessingStage::Reading]);

        NoopProgress.on_stage_start(ProcessingStage::Writing);
    }

    #[test]
    fn test_hidden_bar_when_quiet() {
        let bar = batch_progress_bar(5, OutputMode::Quiet);
        assert!(bar.is_hidden());
    }

    #[test]
    fn test_batch_summary_render() {
        let summary = BatchSummary {
            total: 4,
            succeeded: 3,
            failed: 1,
        };
        let text = summary.render();
        assert!(text.contains("Total files:  4"));
        assert!(text.contains("Succeeded:    3"));
        assert!(text.contains("Errors:       1"));
    }
}
