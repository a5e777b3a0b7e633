//! CLI for building request specifications from data tables.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use fixture_core::{
    parse_table, render_trace, BuilderOptions, DescriptorKey, RequestBuilder, TraceSink,
    TraceStyle,
};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "fixreq")]
#[command(about = "Build HTTP request specifications from behavior-driven data tables", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Build a request specification from a `| key | value |` data table.
    Build {
        /// Table file. Reads stdin when omitted or `-`.
        file: Option<PathBuf>,

        /// What to print on stdout.
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Trace layout: verbose, compact or off. Overrides FIXTURE_TRACE.
        #[arg(long, value_name = "STYLE")]
        trace_style: Option<TraceStyle>,
    },

    /// List the descriptor keys a table may use.
    Keys,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The specification as pretty-printed JSON; the trace goes to the log.
    Json,
    /// Only the human-readable trace.
    Trace,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        cli.command.run()
    }
}

impl CliCommand {
    pub fn run(self) -> Result<()> {
        match self {
            CliCommand::Build {
                file,
                format,
                trace_style,
            } => {
                let table = read_table(file.as_deref())?;
                let mut options = BuilderOptions::from_env();
                if let Some(style) = trace_style {
                    options.style = style;
                }
                print!("{}", render_output(&table, format, options)?);
                Ok(())
            }
            CliCommand::Keys => {
                print!("{}", list_keys());
                Ok(())
            }
        }
    }
}

fn read_table(file: Option<&Path>) -> Result<String> {
    match file {
        None => read_stdin(),
        Some(path) if path == Path::new("-") => read_stdin(),
        Some(path) => {
            tracing::debug!(path = %path.display(), "reading table");
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read table from {}", path.display()))
        }
    }
}

fn read_stdin() -> Result<String> {
    tracing::debug!("reading table from stdin");
    let mut table = String::new();
    std::io::stdin()
        .read_to_string(&mut table)
        .context("failed to read table from stdin")?;
    Ok(table)
}

/// Build from `table` and render what `format` asks for.
fn render_output(table: &str, format: OutputFormat, options: BuilderOptions) -> Result<String> {
    let descriptor = parse_table(table).context("failed to parse data table")?;
    tracing::debug!(keys = descriptor.len(), ?format, "parsed data table");
    match format {
        OutputFormat::Json => {
            // stdout carries the JSON, so the trace can only go to the log.
            let builder = RequestBuilder::with_options(BuilderOptions {
                sink: TraceSink::Log,
                ..options
            });
            let spec = builder
                .build(&descriptor)
                .context("failed to build request")?;
            tracing::info!(
                url = %spec.path_url(),
                headers = spec.headers().len(),
                query_params = spec.query_params().len(),
                "built request specification"
            );
            let mut json = serde_json::to_string_pretty(&spec)?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Trace => {
            let spec = RequestBuilder::with_options(BuilderOptions::silent())
                .build(&descriptor)
                .context("failed to build request")?;
            let style = match options.style {
                TraceStyle::Off => TraceStyle::Verbose,
                style => style,
            };
            Ok(render_trace(&descriptor, &spec, style))
        }
    }
}

fn list_keys() -> String {
    DescriptorKey::ALL
        .into_iter()
        .map(|key| {
            let required = if key.is_required() { "required" } else { "optional" };
            format!("{:<14}{:<10}{}\n", key.as_str(), required, key.format_hint())
        })
        .collect()
}
