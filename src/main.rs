//! docoutline - heading outline extractor
//!
//! CLI entry point

use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use docoutline::{
    exit_codes,
    // Batch
    batch::check_document,
    collect_input_files, BatchProcessor, ConvertError,
    // CLI
    Cli, Commands, ConvertArgs, ValidateArgs,
    // Config
    Config,
    // Outline
    OutlineExtractor,
    // Progress tracking
    OutputMode, ProcessingStage, ProgressCallback,
    // Schema
    IssueSeverity, SchemaValidator,
};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let (verbosity, quiet) = match &cli.command {
        Commands::Convert(args) => (args.verbose, args.quiet),
        Commands::Validate(args) => (args.verbose, false),
        Commands::Info => (0, false),
    };
    init_tracing(verbosity, quiet);

    let result = match cli.command {
        Commands::Convert(args) => run_convert(&args),
        Commands::Validate(args) => run_validate(&args),
        Commands::Info => run_info(),
    };

    std::process::exit(match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            for cause in e.chain().skip(1) {
                eprintln!("  caused by: {}", cause);
            }
            exit_codes::GENERAL_ERROR
        }
    });
}

/// Log to stderr; `RUST_LOG` takes precedence over the verbosity flags
fn init_tracing(verbosity: u8, quiet: bool) {
    let default_level = match (quiet, verbosity) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

// ============ Progress Callback Implementation ============

/// Stage display for single-file conversion
struct VerboseProgress {
    mode: OutputMode,
}

impl VerboseProgress {
    fn new(mode: OutputMode) -> Self {
        Self { mode }
    }
}

impl ProgressCallback for VerboseProgress {
    fn on_stage_start(&self, stage: ProcessingStage) {
        if self.mode.should_show(OutputMode::VeryVerbose) {
            eprintln!("  {}", stage);
        }
    }

    fn on_stage_complete(&self, stage: ProcessingStage, message: &str) {
        if self.mode.should_show(OutputMode::Verbose) {
            eprintln!("    {}: {}", stage.name(), message);
        }
    }

    fn on_debug(&self, message: &str) {
        if self.mode.should_show(OutputMode::VeryVerbose) {
            eprintln!("    [DEBUG] {}", message);
        }
    }
}

// ============ Convert Command ============

fn run_convert(args: &ConvertArgs) -> Result<i32> {
    let start_time = Instant::now();

    if !args.input.exists() {
        eprintln!("Error: Input path does not exist: {}", args.input.display());
        return Ok(exit_codes::INPUT_NOT_FOUND);
    }

    // Explicit config file must load; the implicit lookup falls back to defaults
    let file_config = match &args.config {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => Config::load().unwrap_or_else(|e| {
            warn!("Ignoring config file: {}", e);
            Config::default()
        }),
    };

    // CLI takes precedence over the config file
    let options = file_config.merge_with_cli(&args.overrides());
    debug!(?options, "effective options");
    let extractor = OutlineExtractor::with_options(options);
    let mode = OutputMode::from_flags(args.verbose, args.quiet);

    if args.input.is_dir() {
        return run_convert_dir(args, &extractor, mode, start_time);
    }

    let progress = VerboseProgress::new(mode);
    let document = extractor.extract_file_with_progress(&args.input, &progress)?;

    progress.on_stage_start(ProcessingStage::Validating);
    match check_document(&extractor, &args.input, &document) {
        Ok(()) => {
            let outcome = if extractor.options().validate { "schema valid" } else { "skipped" };
            progress.on_stage_complete(ProcessingStage::Validating, outcome);
        }
        Err(ConvertError::ValidationFailed { path, issues }) => {
            eprintln!("Error: Output for {} does not match the outline schema", path.display());
            for issue in &issues {
                eprintln!("  {}", issue);
            }
            return Ok(exit_codes::VALIDATION_FAILED);
        }
        Err(e) => return Err(e.into()),
    }

    progress.on_stage_start(ProcessingStage::Writing);
    if args.stdout {
        println!("{}", extractor.render_json(&document)?);
        progress.on_stage_complete(ProcessingStage::Writing, "stdout");
    } else {
        let output = args
            .output
            .clone()
            .unwrap_or_else(|| OutlineExtractor::output_path_for(&args.input, None));
        extractor.write_output(&document, &output)?;
        progress.on_stage_complete(ProcessingStage::Writing, &output.display().to_string());

        if mode.should_show(OutputMode::Normal) {
            println!(
                "{} -> {} ({} headings)",
                args.input.display(),
                output.display(),
                document.outline.len()
            );
        }
    }

    progress.on_stage_complete(
        ProcessingStage::Completed,
        &format!(
            "{} headings in {:.2}s",
            document.outline.len(),
            start_time.elapsed().as_secs_f64()
        ),
    );
    Ok(exit_codes::SUCCESS)
}

fn run_convert_dir(
    args: &ConvertArgs,
    extractor: &OutlineExtractor,
    mode: OutputMode,
    start_time: Instant,
) -> Result<i32> {
    if args.stdout {
        bail!("--stdout needs a single input file, not a directory");
    }

    let files = collect_input_files(&args.input, extractor.options().format)
        .with_context(|| format!("Cannot list {}", args.input.display()))?;
    if files.is_empty() {
        eprintln!("Error: No supported files found in {}", args.input.display());
        return Ok(exit_codes::INPUT_NOT_FOUND);
    }

    let output_dir = args.output.clone().unwrap_or_else(|| args.input.clone());
    if mode.should_show(OutputMode::Verbose) {
        println!("Processing {} files into {}", files.len(), output_dir.display());
    }

    let report = BatchProcessor::new(extractor, output_dir, mode).run(&files);

    for failure in &report.failures {
        eprintln!("Error processing {}: {}", failure.path.display(), failure.error);
    }

    if mode.should_show(OutputMode::Normal) {
        report.summary().print();
        println!("Total time: {:.2}s", start_time.elapsed().as_secs_f64());
    }

    Ok(if !report.has_failures() {
        exit_codes::SUCCESS
    } else if report.only_validation_failures() {
        exit_codes::VALIDATION_FAILED
    } else {
        exit_codes::GENERAL_ERROR
    })
}

// ============ Validate Command ============

fn run_validate(args: &ValidateArgs) -> Result<i32> {
    if !args.json.is_file() {
        eprintln!("Error: File does not exist: {}", args.json.display());
        return Ok(exit_codes::INPUT_NOT_FOUND);
    }

    let result = SchemaValidator::validate_file(&args.json)
        .with_context(|| format!("Cannot validate {}", args.json.display()))?;

    for issue in &result.issues {
        if issue.severity == IssueSeverity::Error || args.verbose > 0 {
            println!("  {}", issue);
        }
    }

    if result.valid {
        println!("{}: valid", args.json.display());
        Ok(exit_codes::SUCCESS)
    } else {
        println!("{}: invalid ({} errors)", args.json.display(), result.errors().count());
        Ok(exit_codes::VALIDATION_FAILED)
    }
}

// ============ Info Command ============

fn run_info() -> Result<i32> {
    let defaults = Config::default();

    println!("docoutline v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Input Formats:");
    println!("  Markdown: .md, .markdown, .txt");
    println!("  PDF:      .pdf");
    println!("  Spans:    .json (array of {{text, font_size, page_index}})");
    println!();
    println!("Defaults:");
    println!("  Lines per page: {}", defaults.lines_per_page);
    println!("  Encoding:       {}", defaults.encoding);
    println!("  Pretty:         {}", if defaults.pretty { "YES" } else { "NO" });
    println!("  Validate:       {}", if defaults.validate { "YES" } else { "NO" });
    println!();
    println!("Config File Locations:");
    for path in Config::search_paths() {
        let state = if path.is_file() { "found" } else { "not found" };
        println!("  {} ({})", path.display(), state);
    }

    Ok(exit_codes::SUCCESS)
}
