//! Compiled module enumeration.

use std::collections::BTreeSet;
use std::path::Path;

use appc_core::Atom;

use crate::error::{AppError, AppResult};
use crate::layout::{BEAM_EXT, EBIN_DIR};

/// Module names of every `*.beam` file in `dir/ebin`, sorted.
///
/// A missing `ebin` directory yields an empty list. Subdirectories and
/// files with other extensions are ignored.
pub fn compiled_modules(dir: &Path) -> AppResult<Vec<Atom>> {
    let ebin = dir.join(EBIN_DIR);
    let entries = match std::fs::read_dir(&ebin) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(ebin = %ebin.display(), "no ebin directory; no modules");
            return Ok(Vec::new());
        }
        Err(e) => return Err(AppError::read(&ebin, e)),
    };

    let mut names = BTreeSet::new();
    for entry in entries {
        let path = entry.map_err(|e| AppError::read(&ebin, e))?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(BEAM_EXT) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            names.insert(stem.to_string());
        }
    }
    Ok(names.into_iter().map(Atom::new).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"").unwrap();
    }

    #[test]
    fn lists_beams_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["foo_b.beam", "foo_a.beam", "foo.beam"] {
            touch(&dir.path().join("ebin").join(name));
        }
        let modules = compiled_modules(dir.path()).unwrap();
        let names: Vec<&str> = modules.iter().map(Atom::as_str).collect();
        assert_eq!(names, vec!["foo", "foo_a", "foo_b"]);
    }

    #[test]
    fn ignores_other_files_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("ebin/foo.app"));
        touch(&dir.path().join("ebin/foo.beam"));
        touch(&dir.path().join("ebin/nested/inner.beam"));
        touch(&dir.path().join("src/foo.beam"));
        let modules = compiled_modules(dir.path()).unwrap();
        assert_eq!(modules, vec![Atom::new("foo")]);
    }

    #[test]
    fn missing_or_empty_ebin_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(compiled_modules(dir.path()).unwrap().is_empty());
        std::fs::create_dir(dir.path().join("ebin")).unwrap();
        assert!(compiled_modules(dir.path()).unwrap().is_empty());
    }
}
