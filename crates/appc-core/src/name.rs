//! # Application Names
//!
//! An application is named twice: by the atom declared inside its
//! descriptor and by the descriptor's filename. [`AppName`] is the single
//! canonical form both are reduced to before they are compared.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::atom::Atom;

/// Extension of a rendered descriptor.
pub const DESCRIPTOR_EXT: &str = ".app";

/// Extension of a descriptor template.
pub const TEMPLATE_EXT: &str = ".app.src";

/// Canonical application name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppName(Atom);

impl AppName {
    /// Wrap a declared name.
    pub fn new(atom: Atom) -> Self {
        Self(atom)
    }

    /// Derive the name a descriptor or template at `path` must declare:
    /// its basename with `.app.src` or `.app` removed. A basename with
    /// neither suffix is used whole.
    pub fn from_path(path: &Path) -> Option<Self> {
        let base = path.file_name()?.to_str()?;
        let stem = base
            .strip_suffix(TEMPLATE_EXT)
            .or_else(|| base.strip_suffix(DESCRIPTOR_EXT))
            .unwrap_or(base);
        Some(Self(Atom::new(stem)))
    }

    /// The name as an atom.
    pub fn as_atom(&self) -> &Atom {
        &self.0
    }

    /// The unquoted name text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Atom> for AppName {
    fn from(atom: Atom) -> Self {
        Self(atom)
    }
}

impl fmt::Display for AppName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
