//! # Module Compliance
//!
//! The pipeline treats compliance checking as a black box: a
//! [`ComplianceChecker`] receives the application and its final properties
//! and either passes or returns a [`ComplianceFailure`] that is propagated
//! unchanged.
//!
//! [`OtpModuleChecker`] is the default rule set. It compares the `modules`
//! property against the compiled modules in `ebin`:
//!
//! - `modules` must be a list of atoms, each listed once;
//! - every listed module must have a compiled `ebin/<module>.beam`;
//! - every compiled module must be listed.

use std::collections::BTreeSet;

use appc_core::{Atom, PropertySet, Term};
use thiserror::Error;

use crate::app::AppInfo;
use crate::modules::compiled_modules;

/// A rejected application, with the checker's reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("module validation failed for {app}: {reason}")]
pub struct ComplianceFailure {
    /// The application that failed.
    pub app: String,
    /// Why it failed.
    pub reason: String,
}

impl ComplianceFailure {
    pub fn new(app: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            reason: reason.into(),
        }
    }
}

/// Module/application compliance rules.
pub trait ComplianceChecker: Send + Sync {
    fn check(&self, app: &AppInfo, properties: &PropertySet) -> Result<(), ComplianceFailure>;
}

/// Checks the `modules` property against the compiled modules on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct OtpModuleChecker;

impl ComplianceChecker for OtpModuleChecker {
    fn check(&self, app: &AppInfo, properties: &PropertySet) -> Result<(), ComplianceFailure> {
        let name = app
            .name()
            .map(|n| n.as_str().to_string())
            .unwrap_or_else(|| app.descriptor().display().to_string());
        let fail = |reason: String| ComplianceFailure::new(name.clone(), reason);

        let declared = match properties.get("modules") {
            Some(Term::List(items)) => items,
            Some(other) => return Err(fail(format!("modules is not a list: {other}"))),
            None => return Err(fail("no modules property".to_string())),
        };

        let mut listed = BTreeSet::new();
        let mut duplicates = BTreeSet::new();
        for item in declared {
            let Some(module) = item.as_atom() else {
                return Err(fail(format!("module {item} is not an atom")));
            };
            if !listed.insert(module.clone()) {
                duplicates.insert(module.clone());
            }
        }
        if !duplicates.is_empty() {
            return Err(fail(format!("duplicate modules: {}", list(&duplicates))));
        }

        let compiled: BTreeSet<Atom> = compiled_modules(app.dir())
            .map_err(|e| fail(e.to_string()))?
            .into_iter()
            .collect();

        let missing: BTreeSet<Atom> = listed.difference(&compiled).cloned().collect();
        if !missing.is_empty() {
            return Err(fail(format!(
                "modules listed but not compiled: {}",
                list(&missing)
            )));
        }
        let extra: BTreeSet<Atom> = compiled.difference(&listed).cloned().collect();
        if !extra.is_empty() {
            return Err(fail(format!(
                "compiled modules missing from the modules list: {}",
                list(&extra)
            )));
        }

        tracing::debug!(app = %name, modules = listed.len(), "modules compliant");
        Ok(())
    }
}

fn list(modules: &BTreeSet<Atom>) -> String {
    let names: Vec<String> = modules.iter().map(Atom::to_string).collect();
    format!("[{}]", names.join(","))
}
