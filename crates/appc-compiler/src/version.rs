//! # Version Resolution
//!
//! A template's `vsn` is either a literal string or an instruction for
//! computing one:
//!
//! | `vsn` value        | Version                                        |
//! |--------------------|------------------------------------------------|
//! | `"1.2.3"`          | the string itself                              |
//! | `git`              | `git describe --tags --always` in the app dir  |
//! | `{cmd, "script"}`  | stdout of `sh -c script` in the app dir        |
//!
//! Command output is trimmed. Computed versions are memoized in the
//! returned [`BuildState`], keyed by template path and `vsn` term, so one
//! build runs each command at most once per application. Editing the
//! `vsn` property invalidates the memo.

use std::path::Path;
use std::process::Command;

use appc_core::{PropertySet, Term};

use crate::error::{AppError, AppResult};
use crate::layout;
use crate::state::BuildState;

/// Runs external commands on behalf of the resolver.
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` in `cwd`, returning its stdout. A non-zero
    /// exit status is an error.
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> std::io::Result<String>;
}

/// [`CommandRunner`] backed by [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> std::io::Result<String> {
        let output = Command::new(program).args(args).current_dir(cwd).output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(std::io::Error::other(format!(
                "{program} exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Compute the concrete version for `template` from its `vsn` property.
pub fn resolve_version(
    state: BuildState,
    template: &Path,
    properties: &PropertySet,
    runner: &dyn CommandRunner,
) -> AppResult<(BuildState, String)> {
    let fail = |reason: String| AppError::VersionResolution {
        path: template.to_path_buf(),
        reason,
    };

    let vsn = properties
        .get("vsn")
        .ok_or_else(|| fail("no vsn property".to_string()))?;

    if let Some(literal) = vsn.as_string() {
        return Ok((state, literal.to_string()));
    }

    if let Some(cached) = state.cached_version(template, vsn) {
        tracing::debug!(template = %template.display(), vsn = cached, "version from cache");
        let cached = cached.to_string();
        return Ok((state, cached));
    }

    let cwd = layout::app_dir_for_template(template);
    let output = match vsn {
        Term::Atom(vcs) if vcs == "git" => runner
            .run("git", &["describe", "--tags", "--always"], &cwd)
            .map_err(|e| fail(format!("git describe failed: {e}")))?,
        Term::Tuple(items) => match items.as_slice() {
            [tag, Term::String(cmd)] if tag.is_atom("cmd") => runner
                .run("sh", &["-c", cmd.as_str()], &cwd)
                .map_err(|e| fail(format!("command `{cmd}` failed: {e}")))?,
            _ => return Err(fail(format!("unsupported vsn {vsn}"))),
        },
        other => return Err(fail(format!("unsupported vsn {other}"))),
    };

    let resolved = output.trim().to_string();
    if resolved.is_empty() {
        return Err(fail(format!("{vsn} produced an empty version")));
    }
    tracing::debug!(template = %template.display(), vsn = %resolved, "resolved version");
    let state = state.with_cached_version(template, vsn, resolved.clone());
    Ok((state, resolved))
}
