#![deny(missing_docs)]

//! # appc-core — Foundational Types for the Descriptor Compiler
//!
//! This crate defines the value model every other crate in the workspace
//! operates on. It has no internal crate dependencies and performs no I/O:
//! reading and writing files is the job of `appc-compiler`.
//!
//! ## Design Principles
//!
//! 1. **One term model.** Templates, vars files, and descriptors are all
//!    sequences of literal [`Term`]s. They are parsed by [`parse_term`] /
//!    [`parse_terms`] and rendered by [`pretty`]; there is no second syntax.
//!
//! 2. **Ordered properties.** [`PropertySet`] keeps insertion order and
//!    replaces values in place on upsert, so the rendered descriptor is
//!    stable across builds.
//!
//! 3. **Canonical names.** An application's declared name and its filename
//!    are compared through [`AppName`], never as ad-hoc strings.
//!
//! 4. **Structured errors.** [`ParseError`] and [`PropertyError`] are built
//!    with `thiserror`; no panics outside tests.

pub mod atom;
pub mod descriptor;
pub mod error;
pub mod lexer;
pub mod name;
pub mod parser;
pub mod printer;
pub mod property;
pub mod term;

// Re-export primary types at crate root for ergonomic imports.
pub use atom::Atom;
pub use descriptor::Descriptor;
pub use error::{ParseError, ParseResult, PropertyError};
pub use name::AppName;
pub use parser::{parse_term, parse_terms};
pub use printer::pretty;
pub use property::PropertySet;
pub use term::Term;
