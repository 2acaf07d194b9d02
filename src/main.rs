//! Binary entry point for the tugsniff CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Check every indexed file in the current directory
//! tugsniff check
//!
//! # Check specific files or directories, human-readable output
//! tugsniff check src/Model/Child.php app/ --format text
//!
//! # Check another workspace with an explicit config file
//! tugsniff --workspace ../shop --config ci/tugsniff.toml check
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use tugsniff::cli::{load_config, run_check};
use tugsniff::session::SniffSession;
use tugsniff_core::error::{OutputErrorCode, SniffError};
use tugsniff_core::output::{emit_response, emit_text, ErrorResponse};

// ============================================================================
// CLI Structure
// ============================================================================

/// Cross-file return type checks for PHP codebases.
#[derive(Parser, Debug)]
#[command(
    name = "tugsniff",
    version,
    about = "Cross-file return type checks for PHP codebases"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Workspace root directory (default: current directory).
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,

    /// Config file (default: .tugsniff/config.toml in the workspace).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level for tracing output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,
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

/// Output format for the check command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum CheckFormat {
    /// Full JSON response (default).
    #[default]
    Json,
    /// One `path:line:col: warning [Code] message` line per diagnostic.
    Text,
}

/// CLI subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Check method return types against ancestor declarations.
    ///
    /// With no paths, every indexed file in the workspace is checked.
    Check {
        /// Files or directories to check, relative to the workspace.
        paths: Vec<PathBuf>,
        /// Output format.
        #[arg(long, value_enum, default_value = "json")]
        format: CheckFormat,
    },
}

// ============================================================================
// Main
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.global.log_level);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            let response = ErrorResponse::from_error(&err);

            // Errors go to stdout as JSON, like every other response
            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();

            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<(), SniffError> {
    match cli.command {
        Command::Check { paths, format } => execute_check(&cli.global, &paths, format),
    }
}

fn execute_check(global: &GlobalArgs, paths: &[PathBuf], format: CheckFormat) -> Result<(), SniffError> {
    let workspace_root = match &global.workspace {
        Some(path) => path.clone(),
        None => std::env::current_dir()
            .map_err(|e| SniffError::internal(format!("cannot read current directory: {}", e)))?,
    };
    if !workspace_root.is_dir() {
        return Err(SniffError::invalid_args(format!(
            "workspace is not a directory: {}",
            workspace_root.display()
        )));
    }

    let config = load_config(&workspace_root, global.config.as_deref())?;
    let mut session = SniffSession::open(&workspace_root, config.sniff)?;
    let response = run_check(&mut session, paths)?;
    session.clear();

    let mut stdout = io::stdout();
    match format {
        CheckFormat::Json => emit_response(&response, &mut stdout),
        CheckFormat::Text => emit_text(&response, &mut stdout),
    }
    .map_err(|e| SniffError::internal(format!("failed to write output: {}", e)))?;
    let _ = stdout.flush();
    Ok(())
}
