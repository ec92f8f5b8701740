//! # Validate Subcommand
//!
//! Checks existing descriptors without rendering: the declared name must
//! match the filename and, unless disabled, the modules must be compliant.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use appc_compiler::{AppInfo, BuildState, Compiler};

/// Arguments for the `appc validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Application directories. Defaults to the current directory.
    #[arg(value_name = "APP_DIR")]
    pub dirs: Vec<PathBuf>,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when every descriptor is valid, 1 otherwise.
pub fn run_validate(args: &ValidateArgs, state: &BuildState, compiler: &Compiler) -> Result<u8> {
    let mut had_failures = false;

    for dir in crate::app_dirs(&args.dirs) {
        let result = AppInfo::discover(&dir).and_then(|app| compiler.validate(state, app));
        match result {
            Ok(app) => {
                let vsn = app.vsn().unwrap_or("-");
                println!("OK: {} ({vsn})", app.descriptor().display());
            }
            Err(e) => {
                tracing::error!(dir = %dir.display(), "{e}");
                println!("FAIL: {}: {e}", dir.display());
                had_failures = true;
            }
        }
    }

    Ok(if had_failures { 1 } else { 0 })
}
