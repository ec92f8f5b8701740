//! # appc CLI entry point
//!
//! Parses command-line arguments, builds the configuration, and dispatches
//! to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use appc_cli::clean::{run_clean, CleanArgs};
use appc_cli::compile::{run_compile, CompileArgs};
use appc_cli::validate::{run_validate, ValidateArgs};
use appc_compiler::Compiler;

/// Application descriptor compiler.
///
/// Renders `src/<app>.app.src` templates into `ebin/<app>.app` descriptors,
/// filling in the compiled module list, the version, and `registered`, and
/// validates the result.
#[derive(Parser, Debug)]
#[command(name = "appc", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Vars file merged into every template (overrides the configuration).
    #[arg(long, global = true)]
    vars_file: Option<PathBuf>,

    /// Do not check modules against the compiled beams.
    #[arg(long, global = true)]
    skip_module_validation: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render, write, and validate application descriptors.
    Compile(CompileArgs),

    /// Validate existing descriptors without rendering them.
    Validate(ValidateArgs),

    /// Remove descriptors generated from templates.
    Clean(CleanArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "appc starting");

    let state = match appc_cli::build_state(
        cli.config.as_deref(),
        cli.vars_file.as_deref(),
        cli.skip_module_validation,
    ) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(1);
        }
    };
    let compiler = Compiler::new();

    let result = match cli.command {
        Commands::Compile(args) => run_compile(&args, state, &compiler),
        Commands::Validate(args) => run_validate(&args, &state, &compiler),
        Commands::Clean(args) => run_clean(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
