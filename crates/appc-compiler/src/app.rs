//! Application handle.
//!
//! [`AppInfo`] is owned by the caller. The pipeline only reads it, except
//! to hand back a copy with the resolved version attached.

use std::path::{Path, PathBuf};

use appc_core::name::{DESCRIPTOR_EXT, TEMPLATE_EXT};
use appc_core::AppName;

use crate::error::{AppError, AppResult};
use crate::layout::{self, EBIN_DIR, SRC_DIR};

/// Paths and version of one application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    dir: PathBuf,
    template: Option<PathBuf>,
    descriptor: PathBuf,
    vsn: Option<String>,
}

impl AppInfo {
    /// An application with an already-rendered descriptor and no template.
    pub fn new(dir: impl Into<PathBuf>, descriptor: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            template: None,
            descriptor: descriptor.into(),
            vsn: None,
        }
    }

    /// An application rendered from `template`; the descriptor path and
    /// application directory are derived from it.
    pub fn from_template(template: impl Into<PathBuf>) -> Self {
        let template = template.into();
        Self {
            dir: layout::app_dir_for_template(&template),
            descriptor: layout::descriptor_path_for(&template),
            template: Some(template),
            vsn: None,
        }
    }

    /// Locate the application in `dir`: a `src/*.app.src` template if one
    /// exists, otherwise an `ebin/*.app` descriptor.
    pub fn discover(dir: &Path) -> AppResult<Self> {
        if let Some(template) = single_match(&dir.join(SRC_DIR), TEMPLATE_EXT)? {
            return Ok(Self::from_template(template));
        }
        if let Some(descriptor) = single_match(&dir.join(EBIN_DIR), DESCRIPTOR_EXT)? {
            return Ok(Self::new(dir, descriptor));
        }
        Err(AppError::read(
            dir,
            format!("no {SRC_DIR}/*{TEMPLATE_EXT} or {EBIN_DIR}/*{DESCRIPTOR_EXT} found"),
        ))
    }

    /// A copy carrying `vsn`.
    pub fn with_vsn(mut self, vsn: impl Into<String>) -> Self {
        self.vsn = Some(vsn.into());
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn template(&self) -> Option<&Path> {
        self.template.as_deref()
    }

    pub fn descriptor(&self) -> &Path {
        &self.descriptor
    }

    /// The version override before a compile, the resolved version after.
    pub fn vsn(&self) -> Option<&str> {
        self.vsn.as_deref()
    }

    /// The name the descriptor must declare.
    pub fn name(&self) -> Option<AppName> {
        AppName::from_path(&self.descriptor)
    }
}

/// The one file in `dir` ending in `suffix`. A missing directory is `None`;
/// several candidates are ambiguous and rejected.
fn single_match(dir: &Path, suffix: &str) -> AppResult<Option<PathBuf>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(AppError::read(dir, e)),
    };
    let mut found: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|p| {
            p.is_file()
                && p.file_name()
                    .and_then(|f| f.to_str())
                    .is_some_and(|f| f.ends_with(suffix) && f.len() > suffix.len())
        })
        .collect();
    found.sort();
    match found.len() {
        0 => Ok(None),
        1 => Ok(found.pop()),
        _ => Err(AppError::read(
            dir,
            format!(
                "multiple *{suffix} files: {}",
                found
                    .iter()
                    .filter_map(|p| p.file_name()?.to_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        )),
    }
}
