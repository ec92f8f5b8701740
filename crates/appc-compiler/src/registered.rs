//! Guarantees the `registered` property upgrade tooling relies on.

use appc_core::{PropertySet, Term};

/// Key of the registered-process list.
pub const REGISTERED: &str = "registered";

/// Prepend `{registered, []}` unless the key is already present.
///
/// An existing value is kept as-is whatever its shape; a value that is not
/// a list is only reported.
pub fn ensure_registered(mut properties: PropertySet) -> PropertySet {
    match properties.get(REGISTERED) {
        None => {
            properties.prepend(REGISTERED, Term::List(Vec::new()));
        }
        Some(value) if value.as_list().is_none() => {
            tracing::warn!(value = %value, "registered is not a list; keeping it unchanged");
        }
        Some(_) => {}
    }
    properties
}
