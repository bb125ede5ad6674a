//! CLI binary for syncheck: answer batched synonym queries from a phase-framed file.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use syncheck_core::config::{OutputFormat, SyncheckConfig};
use syncheck_core::engine::Verdict;
use syncheck_core::input::InputLines;
use syncheck_core::phase::{PhaseReport, RunSummary, run_phases};

#[derive(Parser)]
#[command(
    name = "syncheck",
    version,
    about = "Answer batched synonym queries against per-phase synonym lists"
)]
struct Cli {
    /// Input file: a phase count, then a synonym block and a query block per phase
    input: PathBuf,

    /// Config file (defaults to .syncheck/config.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format: text, jsonl
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Evaluate query blocks of at least this many queries in parallel (0 = never)
    #[arg(long)]
    parallel_threshold: Option<usize>,

    /// Print run totals to stderr when done
    #[arg(long)]
    summary: bool,

    /// Log phase progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// One query verdict as a JSON line.
#[derive(Serialize)]
struct JsonVerdict<'a> {
    phase: usize,
    line: usize,
    word1: &'a str,
    word2: &'a str,
    verdict: Verdict,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cwd = std::env::current_dir().context("failed to get current directory")?;
    let mut config = SyncheckConfig::load(&cwd, cli.config.as_deref())?;
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if let Some(threshold) = cli.parallel_threshold {
        config.evaluation.parallel_threshold = threshold;
    }

    let summary = cmd_run(&cli.input, &config)?;
    if cli.summary {
        print_summary(&summary);
    }
    Ok(())
}

/// Evaluate every phase in `input`, streaming verdicts to stdout phase by phase.
fn cmd_run(input: &Path, config: &SyncheckConfig) -> Result<RunSummary> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read input {}", input.display()))?;
    let lines = InputLines::parse(&text);
    tracing::debug!(lines = lines.len(), path = %input.display(), "input loaded");

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let format = config.output.format;

    let summary = run_phases(&lines, &config.evaluation, |report| -> Result<()> {
        write_report(&mut out, report, format)?;
        out.flush().context("failed to flush stdout")
    })
    .with_context(|| format!("failed to process {}", input.display()))?;

    Ok(summary)
}

fn write_report(out: &mut impl Write, report: &PhaseReport, format: OutputFormat) -> Result<()> {
    for query in &report.verdicts {
        match format {
            OutputFormat::Text => writeln!(out, "{}", query.verdict)?,
            OutputFormat::Jsonl => {
                let record = JsonVerdict {
                    phase: report.index,
                    line: query.line,
                    word1: &query.pair.first,
                    word2: &query.pair.second,
                    verdict: query.verdict,
                };
                serde_json::to_writer(&mut *out, &record)?;
                writeln!(out)?;
            }
        }
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    eprintln!("Phases: {}", summary.phases);
    eprintln!("Synonym pairs: {}", summary.synonym_pairs);
    eprintln!("Queries: {}", summary.queries);
    eprintln!("  synonyms: {}", summary.synonyms);
    eprintln!("  different: {}", summary.different);
}
