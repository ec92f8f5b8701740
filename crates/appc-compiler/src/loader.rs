//! Descriptor and term-file loading.
//!
//! All reads go through [`read_source`], so every I/O or syntax failure is
//! reported as [`AppError::FileRead`] naming the file.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use appc_core::{parse_term, parse_terms, Descriptor, Term};

use crate::error::{AppError, AppResult};

/// Load a template or descriptor: exactly one `{application, Name, Props}.`
/// term.
pub fn load(path: &Path) -> AppResult<Descriptor> {
    let source = read_source(path)?;
    let term = parse_term(&source).map_err(|e| AppError::read(path, e))?;
    let descriptor = Descriptor::from_term(&term).map_err(|e| AppError::read(path, e))?;
    tracing::debug!(
        file = %path.display(),
        app = %descriptor.name,
        properties = descriptor.properties.len(),
        "loaded descriptor"
    );
    Ok(descriptor)
}

/// Read every `.`-terminated term in a file.
pub fn consult(path: &Path) -> AppResult<Vec<Term>> {
    let source = read_source(path)?;
    parse_terms(&source).map_err(|e| AppError::read(path, e))
}

fn read_source(path: &Path) -> AppResult<String> {
    let mut file = File::open(path).map_err(|e| AppError::read(path, e))?;
    let mut source = String::new();
    file.read_to_string(&mut source)
        .map_err(|e| AppError::read(path, e))?;
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("foo.app.src");
        std::fs::write(
            &path,
            "{application, foo, [{description, \"x\"}, {vsn, \"0.1.0\"}]}.\n",
        )
        .unwrap();
        let desc = load(&path).unwrap();
        assert_eq!(desc.name, "foo");
        assert_eq!(desc.properties.len(), 2);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = load(Path::new("/nonexistent/foo.app.src")).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to read /nonexistent/foo.app.src for processing: "));
    }

    #[test]
    fn malformed_content_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let cases = [
            ("syntax.app.src", "{application, foo, [}."),
            ("shape.app.src", "{library, foo, []}."),
            ("entry.app.src", "{application, foo, [vsn]}."),
            ("extra.app.src", "{application, foo, []}.\n{application, bar, []}."),
        ];
        for (file, content) in cases {
            let path = dir.path().join(file);
            std::fs::write(&path, content).unwrap();
            assert!(
                matches!(load(&path), Err(AppError::FileRead { .. })),
                "{file} should fail"
            );
        }
    }

    #[test]
    fn deep_nesting_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep.app.src");
        let env = format!("{}{}", "[".repeat(5_000), "]".repeat(5_000));
        std::fs::write(&path, format!("{{application, foo, [{{env, {env}}}]}}.
")).unwrap();
        let err = load(&path).unwrap_err();
        assert!(matches!(err, AppError::FileRead { .. }));
        assert!(err.to_string().contains("nested too deeply"));
    }

    #[test]
    fn consult_reads_all_terms() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vars.config");
        std::fs::write(&path, "{a, 1}.\n{b, [x]}.\n").unwrap();
        assert_eq!(consult(&path).unwrap().len(), 2);
    }
}
