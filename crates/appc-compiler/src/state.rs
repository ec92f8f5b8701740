//! # Build State
//!
//! [`BuildState`] is the process-wide configuration threaded through every
//! compile. It follows functional-update semantics: operations that need to
//! record something take the state by value and hand back a new copy, so
//! two compiles never observe each other's changes unless the caller
//! passes the returned state along.
//!
//! ## Configuration File
//!
//! ```yaml
//! validate_app_modules: true      # default: true
//! app_vars_file: config/app.vars  # relative to this file
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use appc_core::Term;
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Build configuration and per-build memo.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildState {
    validate_app_modules: Option<bool>,
    app_vars_file: Option<PathBuf>,
    #[serde(skip)]
    resolved_versions: BTreeMap<PathBuf, (Term, String)>,
}

impl BuildState {
    /// Default configuration: module validation on, no vars file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a YAML file. A relative `app_vars_file` is
    /// resolved against the file's directory.
    pub fn load(path: &Path) -> AppResult<Self> {
        let config_error = |reason: String| AppError::Config {
            path: path.to_path_buf(),
            reason,
        };
        let content = std::fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        let mut state: BuildState =
            serde_yaml::from_str(&content).map_err(|e| config_error(e.to_string()))?;
        if let Some(vars) = state.app_vars_file.take() {
            let base = path.parent().unwrap_or(Path::new(""));
            state.app_vars_file = Some(if vars.is_absolute() {
                vars
            } else {
                base.join(vars)
            });
        }
        tracing::debug!(config = %path.display(), "loaded build configuration");
        Ok(state)
    }

    /// Whether compiled applications are checked for module compliance.
    pub fn validate_app_modules(&self) -> bool {
        self.validate_app_modules.unwrap_or(true)
    }

    /// The vars file merged into every template, if configured.
    pub fn app_vars_file(&self) -> Option<&Path> {
        self.app_vars_file.as_deref()
    }

    /// A copy with module validation switched on or off.
    pub fn with_validate_app_modules(mut self, enabled: bool) -> Self {
        self.validate_app_modules = Some(enabled);
        self
    }

    /// A copy using `path` as the vars file.
    pub fn with_app_vars_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.app_vars_file = Some(path.into());
        self
    }

    /// A version previously resolved for `template` in this state lineage,
    /// provided its `vsn` property is still `vsn`.
    pub fn cached_version(&self, template: &Path, vsn: &Term) -> Option<&str> {
        self.resolved_versions
            .get(template)
            .filter(|(memo, _)| memo == vsn)
            .map(|(_, resolved)| resolved.as_str())
    }

    /// A copy remembering `resolved` as the version `vsn` produced for
    /// `template`.
    pub fn with_cached_version(
        mut self,
        template: &Path,
        vsn: &Term,
        resolved: impl Into<String>,
    ) -> Self {
        self.resolved_versions
            .insert(template.to_path_buf(), (vsn.clone(), resolved.into()));
        self
    }
}
