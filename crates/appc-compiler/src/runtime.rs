//! Runtime code-path registration.
//!
//! Writing a descriptor makes its directory loadable by the host runtime.
//! That side effect goes through [`RuntimeEnv`] so builds and tests can
//! substitute their own registry.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;

/// The host runtime's module search path.
pub trait RuntimeEnv: Send + Sync {
    /// Add `dir` to the search path. Adding a directory twice has no
    /// further effect.
    fn add_code_path(&self, dir: &Path);
}

/// In-process, append-only search path.
#[derive(Debug, Default)]
pub struct CodePathRegistry {
    paths: Mutex<Vec<PathBuf>>,
}

impl CodePathRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered directories in registration order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.paths.lock().clone()
    }

    pub fn contains(&self, dir: &Path) -> bool {
        self.paths.lock().iter().any(|p| p == dir)
    }
}

impl RuntimeEnv for CodePathRegistry {
    fn add_code_path(&self, dir: &Path) {
        let mut paths = self.paths.lock();
        if paths.iter().any(|p| p == dir) {
            return;
        }
        tracing::debug!(dir = %dir.display(), "added code path");
        paths.push(dir.to_path_buf());
    }
}
