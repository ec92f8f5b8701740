//! # Variable Substitution
//!
//! Overrides are `{Key, Value}` pairs applied to a template's properties in
//! order, each with upsert semantics. The compiler appends the computed
//! `modules` entry after the vars-file entries, so the module list always
//! reflects what is actually compiled, whatever the vars file says.

use appc_core::{Atom, PropertySet, Term};

use crate::error::{AppError, AppResult};
use crate::loader;
use crate::state::BuildState;

/// Ordered override pairs.
pub type Vars = Vec<(Atom, Term)>;

/// Read the configured vars file. No file configured means no overrides.
pub fn load_vars(state: &BuildState) -> AppResult<Vars> {
    let Some(path) = state.app_vars_file() else {
        tracing::debug!("no app_vars_file configured");
        return Ok(Vars::new());
    };
    tracing::info!(file = %path.display(), "loading app vars");

    loader::consult(path)?
        .into_iter()
        .enumerate()
        .map(|(index, term)| match term.as_tuple() {
            Some([Term::Atom(key), value]) => Ok((key.clone(), value.clone())),
            _ => Err(AppError::read(
                path,
                format!("entry {} is not a {{Key, Value}} tuple: {term}", index + 1),
            )),
        })
        .collect()
}

/// Apply `vars` to `properties` in order.
pub fn apply_vars(vars: Vars, mut properties: PropertySet) -> PropertySet {
    for (key, value) in vars {
        properties.upsert(key, value);
    }
    properties
}
