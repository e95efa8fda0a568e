//! Binary entry point for the tugzip CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Record the edits a script requests over a tree
//! tugzip record --tree tree.json --script rules.json
//!
//! # Same pass with siblings visited in parallel
//! tugzip record --tree tree.json --script rules.json --mode parallel
//! ```

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use tugzip::cli::run_record;
use tugzip::context::TraversalMode;
use tugzip::error::{OutputErrorCode, TugzipError};
use tugzip::output::{emit_response, emit_response_compact, ErrorResponse};
use tugzip::session::SessionOptions;

// ============================================================================
// CLI Structure
// ============================================================================

/// Record structural edits requested while walking a tree.
///
/// All output is JSON on stdout; logs go to stderr.
#[derive(Parser, Debug)]
#[command(name = "tugzip", version, about = "Record tree rewrites")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Log level for tracing output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Emit single-line JSON.
    #[arg(long, global = true)]
    compact: bool,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Traversal mode for the record command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    /// One thread, source order; repeated changes overwrite.
    #[default]
    Sequential,
    /// Siblings visited concurrently; a second change to a node is an error.
    Parallel,
}

impl From<ModeArg> for TraversalMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Sequential => TraversalMode::Sequential,
            ModeArg::Parallel => TraversalMode::Parallel,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Walk a tree with a rewrite script and print the recorded edits.
    Record {
        /// JSON tree file.
        #[arg(long)]
        tree: PathBuf,
        /// JSON rewrite script file.
        #[arg(long)]
        script: PathBuf,
        /// Traversal mode.
        #[arg(long, value_enum, default_value = "sequential")]
        mode: ModeArg,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level);

    let compact = cli.global.compact;
    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Errors go to stdout as JSON, like successful responses.
            let error_code = OutputErrorCode::from(&err);
            let response = ErrorResponse::from_error(&err);
            let mut stdout = io::stdout();
            let _ = if compact {
                emit_response_compact(&response, &mut stdout)
            } else {
                emit_response(&response, &mut stdout)
            };
            let _ = stdout.flush();

            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber. `RUST_LOG` overrides `--log-level`.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<(), TugzipError> {
    match cli.command {
        Command::Record { tree, script, mode } => {
            execute_record(&cli.global, &tree, &script, mode)
        }
    }
}

fn execute_record(
    global: &GlobalArgs,
    tree: &Path,
    script: &Path,
    mode: ModeArg,
) -> Result<(), TugzipError> {
    let response = run_record(tree, script, SessionOptions::new(mode.into()))?;

    let mut stdout = io::stdout();
    if global.compact {
        emit_response_compact(&response, &mut stdout)
    } else {
        emit_response(&response, &mut stdout)
    }
    .map_err(|e| TugzipError::internal(e.to_string()))?;
    Ok(())
}
