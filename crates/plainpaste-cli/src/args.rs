//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use plainpaste::{CaseTransform, ColorMode};

/// Strip formatting from pasted HTML and report what was removed.
#[derive(Debug, Parser)]
#[command(name = "plainpaste")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Theme the paste is compared against
    #[arg(long, value_enum, default_value_t = ThemeArg::Auto, global = true)]
    pub theme: ThemeArg,

    /// YAML file overriding the baseline presentation
    #[arg(long, value_name = "FILE", global = true)]
    pub baseline: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Paste clipboard flavors and report the formatting that was removed
    Strip(StripArgs),
    /// Sanitize markup without reporting changes
    Sanitize(SanitizeArgs),
    /// Print the human-readable name of a CSS color
    Name(NameArgs),
}

#[derive(Debug, Args)]
pub struct StripArgs {
    /// File holding the text/html flavor ("-" for stdin)
    #[arg(long, value_name = "FILE")]
    pub html: Option<PathBuf>,

    /// File holding the text/plain flavor
    #[arg(long, value_name = "FILE")]
    pub text: Option<PathBuf>,

    /// Print the output text instead of the output markup
    #[arg(long)]
    pub plain: bool,

    /// Change the case of the output text (implies --plain)
    #[arg(long, value_name = "CASE", value_parser = parse_case)]
    pub case: Option<CaseTransform>,
}

#[derive(Debug, Args)]
pub struct SanitizeArgs {
    /// Markup file; reads stdin when omitted
    pub file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct NameArgs {
    /// Any CSS color, e.g. "rgb(255, 0, 0)" or "#123456"
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    /// Follow the operating system appearance
    Auto,
    Light,
    Dark,
}

impl ThemeArg {
    /// Resolves `auto` through the installed theme detector.
    pub fn color_mode(self) -> ColorMode {
        match self {
            ThemeArg::Auto => plainpaste::detect_color_mode(),
            ThemeArg::Light => ColorMode::Light,
            ThemeArg::Dark => ColorMode::Dark,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

fn parse_case(s: &str) -> Result<CaseTransform, String> {
    s.parse()
}
