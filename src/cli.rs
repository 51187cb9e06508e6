//! Command-line interface definitions

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::CliOverrides;
use crate::outline::InputFormat;

/// Heading outline extractor for Markdown and PDF documents
#[derive(Parser, Debug)]
#[command(name = "docoutline", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract outlines from a file or every supported file in a directory
    Convert(ConvertArgs),
    /// Check an outline JSON file against the outline schema
    Validate(ValidateArgs),
    /// Show version, defaults, and config file locations
    Info,
}

#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Input file (.md, .markdown, .txt, .pdf, spans .json) or directory
    pub input: PathBuf,

    /// Output file, or output directory when INPUT is a directory
    pub output: Option<PathBuf>,

    /// Lines per page for page estimation
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub lines_per_page: Option<u32>,

    /// Input text encoding label (e.g. utf-8, latin1, shift_jis)
    #[arg(short, long)]
    pub encoding: Option<String>,

    /// Input format, instead of detecting it from the file extension
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Pretty-print JSON output
    #[arg(short, long)]
    pub pretty: bool,

    /// Print JSON to stdout instead of writing a file (single file only)
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,

    /// Validate output against the outline schema before writing
    #[arg(long)]
    pub validate: bool,

    /// Config file (default: ./docoutline.toml, then the user config)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress and summary output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl ConvertArgs {
    /// Values the user set explicitly
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            lines_per_page: self.lines_per_page,
            encoding: self.encoding.clone(),
            pretty: self.pretty.then_some(true),
            validate: self.validate.then_some(true),
            format: self.format.map(InputFormat::from),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Outline JSON file
    pub json: PathBuf,

    /// Also list warnings
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum FormatArg {
    Markdown,
    Pdf,
    Spans,
}

impl From<FormatArg> for InputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Markdown => InputFormat::Markdown,
            FormatArg::Pdf => InputFormat::Pdf,
            FormatArg::Spans => InputFormat::Spans,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_convert_args() {
        let cli = Cli::try_parse_from([
            "docoutline", "convert", "in.md", "out.json", "-l", "30", "--pretty", "-vv",
        ])
        .unwrap();
        let Commands::Convert(args) = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(args.input, PathBuf::from("in.md"));
        assert_eq!(args.output, Some(PathBuf::from("out.json")));
        assert_eq!(args.verbose, 2);

        let overrides = args.overrides();
        assert_eq!(overrides.lines_per_page, Some(30));
        assert_eq!(overrides.pretty, Some(true));
        assert_eq!(overrides.validate, None);
        assert_eq!(overrides.encoding, None);
    }

    #[test]
    fn test_zero_lines_per_page_rejected() {
        assert!(Cli::try_parse_from(["docoutline", "convert", "in.md", "-l", "0"]).is_err());
    }

    #[test]
    fn test_format_arg() {
        let cli = Cli::try_parse_from(["docoutline", "convert", "notes", "--format", "markdown"]).unwrap();
        let Commands::Convert(args) = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(args.overrides().format, Some(InputFormat::Markdown));
    }

    #[test]
    fn test_stdout_conflicts_with_output() {
        assert!(Cli::try_parse_from(["docoutline", "convert", "a.md", "b.json", "--stdout"]).is_err());
    }
}
