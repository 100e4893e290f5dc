//! reclaim - find and safely remove build artifacts and caches.
//!
//! Usage:
//!   reclaim [ROOT]                     Dry-run: print what would be deleted
//!   reclaim [ROOT] --apply             Print, confirm on stdin, delete
//!   reclaim [ROOT] --apply --yes       Print and delete without prompting
//!   reclaim delete --report <FILE>     Delete the artifacts of a saved report
//!   reclaim --help                     Show help

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tracing_subscriber::EnvFilter;

use reclaim_core::{Mode, ScanConfig, parse_report};
use reclaim_ops::{
    AutoConfirm, Confirm, DeletionSummary, ReportFormat, RunOutcome, StdinConfirm, apply_report,
    run_with_format,
};
use reclaim_scan::SizeMode;

#[derive(Parser)]
#[command(
    name = "reclaim",
    version,
    about = "Find and safely remove build artifacts and caches",
    long_about = "reclaim scans a project root for build output and caches \
                  (node_modules, target, __pycache__, DerivedData, ...) and reports \
                  what it would delete.\n\n\
                  Nothing is removed unless you pass --apply and confirm. Deletion \
                  never leaves the root and never touches .git."
)]
struct Cli {
    /// Project root to scan (defaults to current directory)
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Delete the reported artifacts after confirmation
    #[arg(long)]
    apply: bool,

    /// Answer yes to the confirmation prompt
    #[arg(short = 'y', long, requires = "apply")]
    yes: bool,

    /// Output format for the report
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Measure byte lengths instead of allocated disk blocks
    #[arg(long)]
    apparent_size: bool,

    /// Extra directory name to report as a generic folder (repeatable)
    #[arg(long = "extra-dir", value_name = "NAME")]
    extra_dirs: Vec<String>,

    /// Name or `prefix*`/`*suffix` pattern to skip entirely (repeatable)
    #[arg(long = "ignore", value_name = "PATTERN")]
    ignore: Vec<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Delete the artifacts listed in a previously printed text report
    Delete {
        /// Report file
        #[arg(short, long)]
        report: PathBuf,

        /// Answer yes to the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,

        /// Measure freed space with byte lengths instead of disk blocks
        #[arg(long)]
        apparent_size: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => ReportFormat::Text,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Some(Command::Delete {
            report,
            yes,
            apparent_size,
        }) => run_delete(report, *yes, *apparent_size),
        None => run_clean(&cli),
    }
}

/// Logs go to stderr so stdout carries only the report.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn confirmer(yes: bool) -> Box<dyn Confirm> {
    if yes {
        Box::new(AutoConfirm)
    } else {
        Box::new(StdinConfirm)
    }
}

/// Scan the root, print the report, and in apply mode confirm and delete.
fn run_clean(cli: &Cli) -> Result<()> {
    let config = ScanConfig::builder()
        .root(cli.root.clone())
        .apparent_size(cli.apparent_size)
        .extra_dir_patterns(cli.extra_dirs.clone())
        .ignore_patterns(cli.ignore.clone())
        .build()
        .context("Invalid configuration")?;
    let mode = if cli.apply { Mode::Apply } else { Mode::DryRun };

    let mut confirm = confirmer(cli.yes);
    let outcome = {
        let mut stdout = io::stdout().lock();
        run_with_format(&config, mode, cli.format.into(), confirm.as_mut(), &mut stdout)
            .context("Cleanup failed")?
    };

    match outcome {
        RunOutcome::DryRun(_) => {}
        RunOutcome::Cancelled(_) => eprintln!("Cancelled. Nothing was deleted."),
        RunOutcome::Applied { summary, .. } => match cli.format {
            OutputFormat::Text => print_summary(&summary),
            // Keep stdout valid JSON
            OutputFormat::Json => eprint!("{summary}"),
        },
    }

    Ok(())
}

/// Re-validate and delete the artifacts of a saved text report.
fn run_delete(report_path: &Path, yes: bool, apparent_size: bool) -> Result<()> {
    let text = fs::read_to_string(report_path)
        .with_context(|| format!("Failed to read report {}", report_path.display()))?;
    let report = parse_report(&text)
        .with_context(|| format!("Malformed report {}", report_path.display()))?;

    print!("{report}");

    let mut confirm = confirmer(yes);
    let summary = apply_report(&report, SizeMode::from_apparent(apparent_size), confirm.as_mut())
        .context("Delete failed")?;

    match summary {
        Some(summary) => print_summary(&summary),
        None if report.is_empty() => println!("\nNothing to delete."),
        None => eprintln!("Cancelled. Nothing was deleted."),
    }

    Ok(())
}

fn print_summary(summary: &DeletionSummary) {
    print!("\n{summary}");
}
