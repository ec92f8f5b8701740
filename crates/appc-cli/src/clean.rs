//! # Clean Subcommand
//!
//! Removes descriptors generated from templates. Each argument is either a
//! template file or an application directory, whose template is located
//! the same way `compile` locates it. Anything else is left alone.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use appc_compiler::clean::clean;
use appc_compiler::AppInfo;

/// Arguments for the `appc clean` subcommand.
#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Template files or application directories. Defaults to the current
    /// directory.
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,
}

/// Execute the clean subcommand.
///
/// Returns exit code: 0 when every target is clean, 1 otherwise.
pub fn run_clean(args: &CleanArgs) -> Result<u8> {
    let mut had_failures = false;

    for path in crate::app_dirs(&args.paths) {
        match clean_path(&path) {
            Ok(()) => println!("OK: cleaned {}", path.display()),
            Err(e) => {
                tracing::error!("{e:#}");
                println!("FAIL: {}: {e:#}", path.display());
                had_failures = true;
            }
        }
    }

    Ok(if had_failures { 1 } else { 0 })
}

fn clean_path(path: &Path) -> Result<()> {
    if !path.is_dir() {
        return clean(path).with_context(|| format!("failed to clean {}", path.display()));
    }
    let app = AppInfo::discover(path)
        .with_context(|| format!("no application in {}", path.display()))?;
    match app.template() {
        Some(template) => {
            clean(template).with_context(|| format!("failed to clean {}", template.display()))
        }
        None => {
            tracing::debug!(dir = %path.display(), "no template; nothing to clean");
            Ok(())
        }
    }
}
