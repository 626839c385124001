//! Cortex Splice - replace a line range in a file from the command line.

mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cortex_splice::{LineRange, MAX_FILE_SIZE, RangePolicy, SpliceOptions, splice_file};

use crate::output::Outcome;

/// Replace lines START..=END of TARGET with the full contents of CONTENT.
#[derive(Parser, Debug)]
#[command(name = "cortex-splice")]
#[command(about = "Replace a range of lines in a file with the contents of another file")]
#[command(version)]
#[command(allow_negative_numbers = true)]
struct Args {
    /// File whose lines are replaced
    target: PathBuf,

    /// First line to replace (1-based)
    start: i64,

    /// Last line to replace (1-based, inclusive)
    end: i64,

    /// File holding the replacement text
    content: PathBuf,

    /// Range handling: strict, clamp (end past the file is clamped) or
    /// legacy (never rejects, slice semantics)
    #[arg(long, default_value_t = RangePolicy::Clamp)]
    policy: RangePolicy,

    /// Print a unified diff instead of writing the file
    #[arg(long)]
    dry_run: bool,

    /// Print the outcome as a JSON object
    #[arg(long)]
    json: bool,

    /// Refuse files larger than this many bytes (0 disables the limit)
    #[arg(long, default_value_t = MAX_FILE_SIZE)]
    max_file_size: u64,

    /// Log level, used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    fn options(&self) -> SpliceOptions {
        SpliceOptions {
            policy: self.policy,
            dry_run: self.dry_run,
            max_file_size: self.max_file_size,
        }
    }
}

/// Logs go to stderr; stdout carries only the outcome.
fn setup_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        subscriber
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    setup_logging(&args.log_level, args.json_logs);
    debug!(?args, "parsed arguments");

    let range = LineRange::new(args.start, args.end);
    let result = splice_file(&args.target, range, &args.content, &args.options());

    if let Err(e) = &result {
        error!(kind = %e.kind(), "splice failed: {}", e);
    }

    let outcome = Outcome::from_result(&result);
    let mut stdout = std::io::stdout().lock();
    if let Err(e) = outcome.render(&mut stdout, args.json) {
        eprintln!("Failed to write output: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::from(outcome.exit_status())
}
