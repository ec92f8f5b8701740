//! Name and module validation of a rendered descriptor.

use std::path::Path;

use appc_core::{AppName, Atom, PropertySet};

use crate::app::AppInfo;
use crate::compliance::ComplianceChecker;
use crate::error::{AppError, AppResult};
use crate::state::BuildState;

/// Check that the declared `name` equals the name derived from `file`.
/// The comparison is exact and case-sensitive.
pub fn validate_name(name: &Atom, file: &Path) -> AppResult<()> {
    match AppName::from_path(file) {
        Some(expected) if expected.as_atom() == name => Ok(()),
        _ => Err(AppError::InvalidName {
            file: file.to_path_buf(),
            name: name.to_string(),
        }),
    }
}

/// Run the compliance checker unless `validate_app_modules` is off.
///
/// Either way the returned app carries a version: the one already attached,
/// or the descriptor's `vsn` string.
pub fn validate_modules(
    state: &BuildState,
    app: AppInfo,
    properties: &PropertySet,
    checker: &dyn ComplianceChecker,
) -> AppResult<AppInfo> {
    let app = match (app.vsn(), properties.get("vsn").and_then(|v| v.as_string())) {
        (None, Some(vsn)) => {
            let vsn = vsn.to_string();
            app.with_vsn(vsn)
        }
        _ => app,
    };

    if !state.validate_app_modules() {
        tracing::debug!(descriptor = %app.descriptor().display(), "module validation disabled");
        return Ok(app);
    }
    checker.check(&app, properties)?;
    Ok(app)
}
