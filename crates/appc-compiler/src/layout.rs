//! Application directory layout.
//!
//! ```text
//! <app>/
//!   src/<name>.app.src    template
//!   ebin/<name>.app       rendered descriptor
//!   ebin/<module>.beam    compiled modules
//! ```

use std::path::{Path, PathBuf};

use appc_core::name::TEMPLATE_EXT;

/// Directory holding compiled artifacts and the rendered descriptor.
pub const EBIN_DIR: &str = "ebin";

/// Directory holding sources and the template.
pub const SRC_DIR: &str = "src";

/// Extension of a compiled module, without the dot.
pub const BEAM_EXT: &str = "beam";

/// Whether `path` names a descriptor template.
pub fn is_template(path: &Path) -> bool {
    path.file_name()
        .and_then(|f| f.to_str())
        .is_some_and(|f| f.len() > TEMPLATE_EXT.len() && f.ends_with(TEMPLATE_EXT))
}

/// The application directory a template belongs to: the parent of its
/// `src` directory, or the template's own directory otherwise.
pub fn app_dir_for_template(template: &Path) -> PathBuf {
    let dir = template.parent().unwrap_or(Path::new(""));
    match dir.file_name().and_then(|f| f.to_str()) {
        Some(SRC_DIR) => dir.parent().unwrap_or(Path::new("")).to_path_buf(),
        _ => dir.to_path_buf(),
    }
}

/// Where the descriptor rendered from `template` lives.
///
/// `<app>/src/foo.app.src` maps to `<app>/ebin/foo.app`. A template outside
/// a `src` directory maps to its own directory with the `.src` suffix
/// removed.
pub fn descriptor_path_for(template: &Path) -> PathBuf {
    let file = template
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or_default();
    let descriptor = file.strip_suffix(".src").unwrap_or(file);
    let dir = template.parent().unwrap_or(Path::new(""));
    match dir.file_name().and_then(|f| f.to_str()) {
        Some(SRC_DIR) => app_dir_for_template(template)
            .join(EBIN_DIR)
            .join(descriptor),
        _ => dir.join(descriptor),
    }
}
