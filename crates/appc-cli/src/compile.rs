//! # Compile Subcommand
//!
//! Renders each application's template into its descriptor, writes it when
//! the content changed, and validates the result.
//!
//! With `--check` nothing is written: the rendered descriptor is compared
//! byte-for-byte against the one on disk and the SHA-256 digests of both
//! are reported, so CI can fail on stale descriptors.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use appc_compiler::{loader, AppError, AppInfo, AppResult, BuildState, Compiler, WriteOutcome};
use appc_core::PropertySet;

/// Arguments for the `appc compile` subcommand.
#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Application directories. Defaults to the current directory.
    #[arg(value_name = "APP_DIR")]
    pub dirs: Vec<PathBuf>,

    /// Verify descriptors are up to date instead of writing them.
    #[arg(long)]
    pub check: bool,

    /// Print a JSON report instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Result for one application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Ok,
    Stale,
    Failed,
}

/// Per-application entry of the report.
#[derive(Debug, Clone, Serialize)]
pub struct AppReport {
    pub dir: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descriptor: Option<PathBuf>,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vsn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<WriteOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_sha256: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_sha256: Option<String>,
    /// Properties whose value differs from the descriptor on disk.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub changed: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AppReport {
    fn new(dir: &Path, app: Option<&AppInfo>, status: Status) -> Self {
        Self {
            dir: dir.to_path_buf(),
            descriptor: app.map(|a| a.descriptor().to_path_buf()),
            status,
            vsn: app.and_then(|a| a.vsn()).map(str::to_string),
            outcome: None,
            expected_sha256: None,
            existing_sha256: None,
            changed: Vec::new(),
            error: None,
        }
    }

    fn failed(dir: &Path, app: Option<&AppInfo>, error: &AppError) -> Self {
        tracing::error!(dir = %dir.display(), "{error}");
        Self {
            error: Some(error.to_string()),
            ..Self::new(dir, app, Status::Failed)
        }
    }
}

/// Execute the compile subcommand.
///
/// Returns exit code: 0 when every application is compiled (or up to date
/// under `--check`), 1 otherwise.
pub fn run_compile(args: &CompileArgs, state: BuildState, compiler: &Compiler) -> Result<u8> {
    let mut state = state;
    let reports: Vec<AppReport> = crate::app_dirs(&args.dirs)
        .iter()
        .map(|dir| {
            if args.check {
                check_app(compiler, &state, dir)
            } else {
                compile_app(compiler, &mut state, dir)
            }
        })
        .collect();

    if args.json {
        let json = serde_json::to_string_pretty(&reports).context("failed to serialize report")?;
        println!("{json}");
    } else {
        for report in &reports {
            print_report(report);
        }
    }

    let all_ok = reports.iter().all(|r| r.status == Status::Ok);
    Ok(if all_ok { 0 } else { 1 })
}

/// Compile one application, threading the returned state into `state`.
fn compile_app(compiler: &Compiler, state: &mut BuildState, dir: &Path) -> AppReport {
    let app = match AppInfo::discover(dir) {
        Ok(app) => app,
        Err(e) => return AppReport::failed(dir, None, &e),
    };
    match compiler.compile(state.clone(), &app) {
        Ok(compiled) => {
            *state = compiled.state;
            AppReport {
                outcome: compiled.outcome,
                ..AppReport::new(dir, Some(&compiled.app), Status::Ok)
            }
        }
        Err(e) => AppReport::failed(dir, Some(&app), &e),
    }
}

/// Render without writing and compare against the descriptor on disk.
fn check_app(compiler: &Compiler, state: &BuildState, dir: &Path) -> AppReport {
    let app = match AppInfo::discover(dir) {
        Ok(app) => app,
        Err(e) => return AppReport::failed(dir, None, &e),
    };
    let rendered = match compiler.render(state.clone(), &app) {
        Ok(Some(rendered)) => rendered,
        // Nothing to render; the descriptor only has to be valid.
        Ok(None) => return validated(compiler, state, dir, app),
        Err(e) => return AppReport::failed(dir, Some(&app), &e),
    };

    let existing = match existing_descriptor(app.descriptor()) {
        Ok(existing) => existing,
        Err(e) => return AppReport::failed(dir, Some(&app), &e),
    };
    let expected_sha256 = crate::sha256_hex(rendered.text.as_bytes());
    let existing_sha256 = existing.as_deref().map(crate::sha256_hex);

    if existing.as_deref() == Some(rendered.text.as_bytes()) {
        let report = validated(compiler, state, dir, rendered.app);
        return AppReport {
            expected_sha256: Some(expected_sha256),
            existing_sha256,
            ..report
        };
    }

    tracing::warn!(descriptor = %app.descriptor().display(), "descriptor is stale");
    AppReport {
        expected_sha256: Some(expected_sha256),
        existing_sha256,
        changed: changed_properties(&rendered.descriptor.properties, app.descriptor()),
        ..AppReport::new(dir, Some(&rendered.app), Status::Stale)
    }
}

/// Bytes of the descriptor on disk; `None` only when it does not exist.
fn existing_descriptor(path: &Path) -> AppResult<Option<Vec<u8>>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(AppError::FileRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

fn validated(compiler: &Compiler, state: &BuildState, dir: &Path, app: AppInfo) -> AppReport {
    match compiler.validate(state, app.clone()) {
        Ok(app) => AppReport::new(dir, Some(&app), Status::Ok),
        Err(e) => AppReport::failed(dir, Some(&app), &e),
    }
}

/// Keys whose value differs between `expected` and the descriptor at
/// `path`, in expected order followed by keys only on disk. An unreadable
/// descriptor yields no keys.
fn changed_properties(expected: &PropertySet, path: &Path) -> Vec<String> {
    let Ok(existing) = loader::load(path) else {
        return Vec::new();
    };
    let existing = existing.properties;
    let mut changed: Vec<String> = expected
        .iter()
        .filter(|(key, value)| existing.get(key.as_str()) != Some(*value))
        .map(|(key, _)| key.to_string())
        .collect();
    changed.extend(
        existing
            .keys()
            .filter(|key| !expected.contains_key(key.as_str()))
            .map(|key| key.to_string()),
    );
    changed
}

fn print_report(report: &AppReport) {
    let target = report
        .descriptor
        .as_deref()
        .unwrap_or(report.dir.as_path())
        .display();
    match report.status {
        Status::Ok => {
            let vsn = report.vsn.as_deref().unwrap_or("-");
            match report.outcome {
                Some(WriteOutcome::Written) => println!("OK: wrote {target} ({vsn})"),
                Some(WriteOutcome::Unchanged) => println!("OK: {target} unchanged ({vsn})"),
                None => println!("OK: {target} ({vsn})"),
            }
        }
        Status::Stale => {
            println!("FAIL: {target} is outdated or missing");
            if let Some(expected) = &report.expected_sha256 {
                println!("  Expected digest: {expected}");
            }
            println!(
                "  Existing digest: {}",
                report.existing_sha256.as_deref().unwrap_or("(none)")
            );
            if !report.changed.is_empty() {
                println!("  Changed: {}", report.changed.join(", "));
            }
        }
        Status::Failed => {
            let error = report.error.as_deref().unwrap_or("unknown error");
            println!("FAIL: {target}: {error}");
        }
    }
}
