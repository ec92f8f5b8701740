//! Descriptor serialization and change-only persistence.
//!
//! Rewriting an unchanged descriptor would bump its timestamp and trigger
//! needless rebuilds downstream, so [`write_if_differs`] compares bytes
//! first and leaves identical files alone.

use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

use appc_core::{Atom, Descriptor, PropertySet};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::runtime::RuntimeEnv;

/// What [`write_if_differs`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOutcome {
    Written,
    Unchanged,
}

/// File contents for `{application, name, properties}.`
pub fn serialize(name: &Atom, properties: &PropertySet) -> String {
    Descriptor::new(name.clone(), properties.clone()).render()
}

/// Write `text` to `path` unless the file already holds exactly `text`.
///
/// Missing parent directories are created. On success the parent
/// directory is registered with `runtime`, whether or not bytes were
/// written.
pub fn write_if_differs(
    path: &Path,
    text: &str,
    runtime: &dyn RuntimeEnv,
) -> AppResult<WriteOutcome> {
    let outcome = if existing_contents(path)?.as_deref() == Some(text.as_bytes()) {
        tracing::debug!(file = %path.display(), "descriptor unchanged; not writing");
        WriteOutcome::Unchanged
    } else {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| AppError::write(parent, e))?;
        }
        let mut file = File::create(path).map_err(|e| AppError::write(path, e))?;
        file.write_all(text.as_bytes())
            .map_err(|e| AppError::write(path, e))?;
        tracing::info!(file = %path.display(), bytes = text.len(), "wrote descriptor");
        WriteOutcome::Written
    };

    let dir = path.parent().unwrap_or(Path::new("."));
    runtime.add_code_path(dir);
    Ok(outcome)
}

fn existing_contents(path: &Path) -> AppResult<Option<Vec<u8>>> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(AppError::write(path, e)),
    };
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| AppError::write(path, e))?;
    Ok(Some(bytes))
}
