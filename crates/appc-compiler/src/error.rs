//! Compiler error types.
//!
//! One enum covers every way compiling, validating, or cleaning an
//! application can fail. Each variant is fatal for the application it
//! concerns; whether sibling applications continue is the caller's choice.
//! The `Display` texts of [`AppError::FileRead`] and [`AppError::InvalidName`]
//! are user-facing and kept stable.

use std::path::PathBuf;

use thiserror::Error;

use crate::compliance::ComplianceFailure;

/// Errors raised by the descriptor pipeline.
#[derive(Debug, Error)]
pub enum AppError {
    /// A template, descriptor, or vars file could not be read or parsed.
    #[error("Failed to read {} for processing: {reason}", path.display())]
    FileRead { path: PathBuf, reason: String },

    /// The rendered descriptor could not be written.
    #[error("Failed to write {}: {reason}", path.display())]
    FileWrite { path: PathBuf, reason: String },

    /// The declared application name differs from the filename.
    #[error("Invalid {}: name of application ({name}) must match filename.", file.display())]
    InvalidName { file: PathBuf, name: String },

    /// The compliance checker rejected the application.
    #[error(transparent)]
    ModuleValidation(#[from] ComplianceFailure),

    /// No concrete version could be computed for the template.
    #[error("Failed to resolve version for {}: {reason}", path.display())]
    VersionResolution { path: PathBuf, reason: String },

    /// A generated descriptor could not be removed during clean.
    #[error("Failed to delete {}: {reason}", path.display())]
    FileDelete { path: PathBuf, reason: String },

    /// The build configuration file is unreadable or invalid.
    #[error("invalid configuration at {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },
}

impl AppError {
    pub(crate) fn read(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        AppError::FileRead {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        AppError::FileWrite {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for pipeline operations.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_read_message() {
        let err = AppError::read("src/foo.app.src", "line 1, column 2: unexpected '.'");
        assert_eq!(
            err.to_string(),
            "Failed to read src/foo.app.src for processing: line 1, column 2: unexpected '.'"
        );
    }

    #[test]
    fn invalid_name_message() {
        let err = AppError::InvalidName {
            file: PathBuf::from("ebin/foo.app"),
            name: "bar".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid ebin/foo.app: name of application (bar) must match filename."
        );
    }

    #[test]
    fn module_validation_is_transparent() {
        let failure = ComplianceFailure::new("foo", "missing modules: [foo_x]");
        let err = AppError::from(failure);
        assert!(err.to_string().contains("missing modules: [foo_x]"));
    }

    #[test]
    fn io_errors_format_as_reasons() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = AppError::write("ebin/foo.app", io);
        let msg = err.to_string();
        assert!(msg.contains("ebin/foo.app"));
        assert!(msg.contains("access denied"));
    }
}
