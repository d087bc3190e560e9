//! Subcommand handlers.

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use plainpaste::{color, Baseline, BaselineConfig, ClipboardPayload, PasteSession};
use tracing::{debug, info};

use crate::args::{Cli, Commands, NameArgs, OutputFormat, SanitizeArgs, StripArgs};
use crate::report::{write_json, NameReport, Renderer, SanitizeReport, StripReport};

/// Runs the parsed command line against the given streams.
pub fn run(cli: &Cli, stdin: &mut dyn Read, out: &mut dyn Write, styled: bool) -> Result<()> {
    match &cli.command {
        Commands::Strip(args) => strip(cli, args, stdin, out, styled),
        Commands::Sanitize(args) => sanitize(cli, args, stdin, out),
        Commands::Name(args) => name(cli, args, out, styled),
    }
}

fn strip(
    cli: &Cli,
    args: &StripArgs,
    stdin: &mut dyn Read,
    out: &mut dyn Write,
    styled: bool,
) -> Result<()> {
    if args.html.as_deref().is_some_and(is_stdin) && args.text.as_deref().is_some_and(is_stdin) {
        bail!("--html and --text cannot both read stdin");
    }
    let html = match (&args.html, &args.text) {
        (Some(path), _) => Some(read_source(Some(path.as_path()), stdin)?),
        (None, None) => Some(read_source(None, stdin)?),
        (None, Some(_)) => None,
    };
    let text = match &args.text {
        Some(path) => Some(read_source(Some(path.as_path()), stdin)?),
        None => None,
    };

    let mut session = PasteSession::new(load_baseline(cli)?);
    let mut outcome = session.paste(&ClipboardPayload::new(html, text));
    if let Some(case) = args.case {
        outcome.output_text = case.apply(&outcome.output_text);
    }
    info!(changes = outcome.changes.len(), "stripped paste");

    match cli.format {
        OutputFormat::Text => {
            let shown = if args.plain || args.case.is_some() {
                &outcome.output_text
            } else {
                &outcome.output_markup
            };
            let rendered = Renderer::new(styled)?
                .strip(shown, &outcome)
                .context("rendering strip report")?;
            out.write_all(rendered.as_bytes())?;
        }
        OutputFormat::Json => {
            write_json(out, &StripReport::new(session.baseline().mode, &outcome))?;
        }
    }
    Ok(())
}

fn sanitize(cli: &Cli, args: &SanitizeArgs, stdin: &mut dyn Read, out: &mut dyn Write) -> Result<()> {
    let markup = read_source(args.file.as_deref(), stdin)?;
    let session = PasteSession::new(load_baseline(cli)?);
    let cleaned = session.edit(&markup);
    debug!(input_len = markup.len(), output_len = cleaned.len(), "sanitized");

    match cli.format {
        OutputFormat::Text => writeln!(out, "{}", cleaned)?,
        OutputFormat::Json => write_json(out, &SanitizeReport { markup: cleaned })?,
    }
    Ok(())
}

fn name(cli: &Cli, args: &NameArgs, out: &mut dyn Write, styled: bool) -> Result<()> {
    let name = color::name(&args.color);
    match cli.format {
        OutputFormat::Text => {
            let rendered = Renderer::new(styled)?
                .name(&name)
                .context("rendering color name")?;
            out.write_all(rendered.as_bytes())?;
        }
        OutputFormat::Json => write_json(
            out,
            &NameReport {
                input: &args.color,
                name,
            },
        )?,
    }
    Ok(())
}

fn load_baseline(cli: &Cli) -> Result<Baseline> {
    let mode = cli.theme.color_mode();
    debug!(%mode, "color mode");
    let Some(path) = &cli.baseline else {
        return Ok(Baseline::for_mode(mode));
    };
    let config = BaselineConfig::from_file(path)
        .with_context(|| format!("loading baseline {}", path.display()))?;
    config
        .resolve(mode)
        .with_context(|| format!("resolving {} baseline from {}", mode, path.display()))
}

fn is_stdin(path: &Path) -> bool {
    path == Path::new("-")
}

/// Reads a file, or stdin for `None` and `-`.
fn read_source(path: Option<&Path>, stdin: &mut dyn Read) -> Result<String> {
    match path {
        Some(path) if !is_stdin(path) => fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display())),
        _ => {
            let mut buf = String::new();
            stdin
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}
