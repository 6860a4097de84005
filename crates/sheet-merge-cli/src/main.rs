//! sxm - three-way merge of xlsx workbooks

use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use sheet_merge::prelude::*;
use tracing::Level;

mod cli;

use cli::Cli;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let from_json = match &cli.json {
        Some(arg) => MergeConfig::from_arg(arg)?,
        None => MergeConfig::default(),
    };
    let explicit = MergeConfig {
        base: cli.base,
        file1: cli.file1,
        file2: cli.file2,
        ranges: Vec::new(),
    };
    let job = from_json.merged_with(explicit).into_job(cli.out)?;

    let outcome = match cli.on_conflict.fixed() {
        Some(resolution) => job.run(&mut FixedSource::new(resolution))?,
        None => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            let mut source = LineSource::new(stdin.lock(), stdout.lock());
            job.run(&mut source)?
        }
    };

    tracing::debug!(
        "Report: {}",
        serde_json::to_string(&outcome.report).context("Failed to serialize report")?
    );
    print_summary(&outcome);
    Ok(())
}

fn print_summary(outcome: &MergeOutcome) {
    let report = &outcome.report;
    println!("Merged into {}", outcome.output.display());
    println!("  cells evaluated: {}", report.cells_evaluated);
    println!("  unchanged:       {}", report.unchanged);
    println!("  auto-merged:     {}", report.auto_merged);
    println!(
        "  conflicts:       {} (file1: {}, file2: {}, base: {})",
        report.conflicts, report.resolved_side1, report.resolved_side2, report.kept_base
    );
    if !report.skipped_sheets.is_empty() {
        println!("  skipped sheets:  {}", report.skipped_sheets.join(", "));
    }
}
