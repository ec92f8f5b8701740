//! # appc-compiler — Descriptor Pipeline
//!
//! Turns an application's `src/<name>.app.src` template into its
//! `ebin/<name>.app` descriptor and validates the result:
//!
//! ```text
//! template? ──yes──▶ load ─▶ substitute vars + modules ─▶ resolve vsn
//!     │                 ─▶ ensure registered ─▶ write if changed ──┐
//!     no                                                           │
//!     └──────────────▶ load descriptor ─▶ check name ─▶ check modules
//! ```
//!
//! [`Compiler`] sequences the steps; each step is also exposed on its own
//! module so callers (and tests) can run it in isolation.
//!
//! ## Collaborators
//!
//! Three effects leave the pipeline and are injected as traits:
//!
//! - [`RuntimeEnv`]: the code search path a written descriptor's directory
//!   is registered with.
//! - [`ComplianceChecker`]: module/application compliance rules.
//! - [`CommandRunner`]: external commands used to derive a version.
//!
//! ## Crate Policy
//!
//! - Every failure is an [`AppError`]; nothing panics outside tests.
//! - [`BuildState`] is never mutated behind a caller's back: steps that
//!   change it take it by value and return the new copy.

pub mod app;
pub mod clean;
pub mod compiler;
pub mod compliance;
pub mod error;
pub mod layout;
pub mod loader;
pub mod modules;
pub mod registered;
pub mod runtime;
pub mod state;
pub mod validate;
pub mod vars;
pub mod version;
pub mod writer;

// Re-export primary types.
pub use app::AppInfo;
pub use compiler::{Compiled, Compiler, Rendered, Stage};
pub use compliance::{ComplianceChecker, ComplianceFailure, OtpModuleChecker};
pub use error::{AppError, AppResult};
pub use runtime::{CodePathRegistry, RuntimeEnv};
pub use state::BuildState;
pub use version::{CommandRunner, SystemCommandRunner};
pub use writer::WriteOutcome;
