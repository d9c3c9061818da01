// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Logomark — logo-to-favicon command-line tool.
//
// Entry point. Initialises logging, parses arguments, runs the pipeline once
// and maps any failure to a human-readable message and a non-zero exit code.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use logomark_core::error::{LogomarkError, Result};
use logomark_core::human_errors::humanize_error;
use logomark_core::PipelineConfig;
use logomark_image::process_logo;

/// Output path used when `--output` is not given.
const DEFAULT_OUTPUT: &str = "public/favicon.png";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Turn a captioned logo on a dark background into a square, transparent PNG favicon"
)]
struct Args {
    /// Input image path (png/jpg/etc)
    input: PathBuf,

    /// Where to write the square PNG
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Print the processing report as JSON instead of a confirmation line
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    tracing::debug!(?args, "Logomark starting");

    match run(&args) {
        Ok(message) => {
            println!("{message}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", describe_error(&err));
            ExitCode::FAILURE
        }
    }
}

/// Process one logo and return the text to print on success.
fn run(args: &Args) -> Result<String> {
    let report = process_logo(&args.input, &args.output, &PipelineConfig::default())?;

    if args.json {
        Ok(serde_json::to_string_pretty(&report)?)
    } else {
        Ok(format!(
            "Wrote favicon to {} ({}x{})",
            report.output.display(),
            report.side,
            report.side
        ))
    }
}

/// Severity, plain-English message, suggestion and the technical cause.
fn describe_error(err: &LogomarkError) -> String {
    let human = humanize_error(err);
    let mut text = format!(
        "Error ({}): {}\n  {}",
        human.severity.label(),
        human.message,
        human.suggestion
    );
    if human.retriable {
        text.push_str("\n  Running the same command again may succeed.");
    }
    text.push_str(&format!("\n  ({err})"));
    text
}
