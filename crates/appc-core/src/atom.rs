//! # Atoms
//!
//! [`Atom`] is the identifier type of the term syntax: application names,
//! property keys, and module names are all atoms. The inner text is stored
//! unquoted; quoting is a property of printing, not of the value.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Words that cannot appear as bare atoms and are therefore always quoted.
const RESERVED: &[&str] = &[
    "after", "and", "andalso", "band", "begin", "bnot", "bor", "bsl", "bsr", "bxor", "case",
    "catch", "cond", "div", "else", "end", "fun", "if", "let", "maybe", "not", "of", "or",
    "orelse", "receive", "rem", "try", "when", "xor",
];

/// An atom, stored as its unquoted text.
///
/// Equality is exact and case-sensitive: `Foo` and `foo` are different atoms.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Atom(String);

impl Atom {
    /// Create an atom from its unquoted text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The unquoted text of the atom.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the atom must be written inside single quotes.
    pub fn needs_quotes(&self) -> bool {
        needs_quotes(&self.0)
    }
}

impl From<&str> for Atom {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Atom {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl PartialEq<str> for Atom {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Atom {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.needs_quotes() {
            return f.write_str(&self.0);
        }
        f.write_str("'")?;
        for c in self.0.chars() {
            match c {
                '\'' => f.write_str("\\'")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\t' => f.write_str("\\t")?,
                '\r' => f.write_str("\\r")?,
                c if c.is_control() => write!(f, "\\x{{{:X}}}", c as u32)?,
                c => write!(f, "{c}")?,
            }
        }
        f.write_str("'")
    }
}

/// A bare atom starts with a lowercase letter and continues with
/// alphanumerics, `_` or `@`.
fn needs_quotes(text: &str) -> bool {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return true;
    };
    if !first.is_ascii_lowercase() {
        return true;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '@') {
        return true;
    }
    RESERVED.contains(&text)
}
