//! Removal of generated descriptors.

use std::io::ErrorKind;
use std::path::Path;

use crate::error::{AppError, AppResult};
use crate::layout;

/// Delete the descriptor generated from `file` if `file` is a template.
///
/// Cleaning is idempotent: an already-absent descriptor is success. Any
/// other file is left alone.
pub fn clean(file: &Path) -> AppResult<()> {
    if !layout::is_template(file) {
        tracing::debug!(file = %file.display(), "not a template; nothing to clean");
        return Ok(());
    }
    let descriptor = layout::descriptor_path_for(file);
    match std::fs::remove_file(&descriptor) {
        Ok(()) => {
            tracing::info!(file = %descriptor.display(), "removed descriptor");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(file = %descriptor.display(), "descriptor already absent");
            Ok(())
        }
        Err(e) => Err(AppError::FileDelete {
            path: descriptor,
            reason: e.to_string(),
        }),
    }
}
