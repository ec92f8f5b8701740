//! # Error Types
//!
//! Errors raised while turning source text into terms ([`ParseError`]) and
//! terms into property sets or descriptors ([`PropertyError`]). Both carry
//! enough context to be shown to a user verbatim.

use thiserror::Error;

/// A syntax error in literal-term source text, with its 1-based location.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}, column {column}: {message}")]
pub struct ParseError {
    /// What went wrong.
    pub message: String,
    /// Line of the offending character.
    pub line: usize,
    /// Column of the offending character.
    pub column: usize,
}

impl ParseError {
    /// Create a parse error at the given location.
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }

    /// An `expected X, found Y` error.
    pub fn unexpected(expected: &str, found: &str, line: usize, column: usize) -> Self {
        Self::new(format!("expected {expected}, found {found}"), line, column)
    }
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// A well-formed term that does not have the shape of a property list or
/// application descriptor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PropertyError {
    /// The property list is not a list.
    #[error("property list must be a list, got {found}")]
    NotAList {
        /// Printed form of the offending term.
        found: String,
    },

    /// A list entry is not a `{Key, Value}` tuple with an atom key.
    #[error("property at position {index} must be a {{Key, Value}} tuple with an atom key, got {found}")]
    MalformedEntry {
        /// Zero-based position in the list.
        index: usize,
        /// Printed form of the offending entry.
        found: String,
    },

    /// The same key appears more than once.
    #[error("duplicate property key '{key}'")]
    DuplicateKey {
        /// The repeated key.
        key: String,
    },

    /// The term is not `{application, Name, Properties}`.
    #[error("expected {{application, Name, Properties}}, got {found}")]
    NotADescriptor {
        /// Printed form of the offending term.
        found: String,
    },
}
