//! # appc-cli — Descriptor Compiler CLI
//!
//! Provides the `appc` command-line interface over `appc-compiler`.
//!
//! ## Subcommands
//!
//! - `appc compile` — Render, write, and validate descriptors.
//! - `appc validate` — Validate existing descriptors without rendering.
//! - `appc clean` — Remove descriptors generated from templates.
//!
//! ```bash
//! appc compile apps/foo apps/bar
//! appc compile apps/foo --check --json
//! appc --config appc.yaml --skip-module-validation validate apps/foo
//! appc clean apps/foo/src/foo.app.src
//! ```
//!
//! Every subcommand returns exit code 0 when all applications succeed and 1
//! otherwise. Applications are processed in order and a failure does not
//! stop the remaining ones.

pub mod clean;
pub mod compile;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

use appc_compiler::BuildState;

/// Build the configuration from `--config`, then apply flag overrides.
pub fn build_state(
    config: Option<&Path>,
    vars_file: Option<&Path>,
    skip_module_validation: bool,
) -> Result<BuildState> {
    let mut state = match config {
        Some(path) => BuildState::load(path)
            .with_context(|| format!("failed to load configuration: {}", path.display()))?,
        None => BuildState::new(),
    };
    if let Some(vars) = vars_file {
        state = state.with_app_vars_file(vars);
    }
    if skip_module_validation {
        state = state.with_validate_app_modules(false);
    }
    Ok(state)
}

/// The directories to operate on; the current directory when none given.
pub fn app_dirs(dirs: &[PathBuf]) -> Vec<PathBuf> {
    if dirs.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        dirs.to_vec()
    }
}

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_hex_known_vector() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn app_dirs_defaults_to_cwd() {
        assert_eq!(app_dirs(&[]), vec![PathBuf::from(".")]);
        let given = vec![PathBuf::from("a"), PathBuf::from("b")];
        assert_eq!(app_dirs(&given), given);
    }

    #[test]
    fn flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("appc.yaml");
        std::fs::write(&config, "validate_app_modules: true\napp_vars_file: a.vars\n").unwrap();

        let state = build_state(Some(&config), Some(Path::new("/b.vars")), true).unwrap();
        assert!(!state.validate_app_modules());
        assert_eq!(state.app_vars_file(), Some(Path::new("/b.vars")));
    }

    #[test]
    fn bad_config_is_reported_with_path() {
        let err = build_state(Some(Path::new("/nonexistent/appc.yaml")), None, false).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/appc.yaml"));
    }
}
