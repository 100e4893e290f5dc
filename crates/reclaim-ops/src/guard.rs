//! Containment guard, checked right before every removal.
//!
//! A path may be deleted only if it lies strictly below the root, has no
//! `..` segment, and no segment of its absolute form is `.git`. Its parent
//! directory must also still resolve inside the root once symlinks are
//! followed.

use std::path::{Component, Path, PathBuf};

use reclaim_core::{CleanError, Root, UnsafeReason, has_vcs_segment};

/// Check that `path` (absolute) may be removed under `root`.
pub fn validate(root: &Root, path: &Path) -> Result<(), CleanError> {
    let reject = |reason| Err(CleanError::unsafe_path(path, reason));

    if path
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return reject(UnsafeReason::ParentTraversal);
    }
    if path == root.path() {
        return reject(UnsafeReason::EqualsRoot);
    }
    if root.relative(path).is_none() {
        return reject(UnsafeReason::OutsideRoot);
    }
    // The whole path, root segments included
    if has_vcs_segment(path) {
        return reject(UnsafeReason::InsideGit);
    }

    // The entry itself is never followed, but a symlinked ancestor would
    // carry the removal somewhere else. A vanished parent is left to the
    // removal, which reports NotFound.
    if let Some(Ok(resolved)) = path.parent().map(Path::canonicalize) {
        if !resolved.starts_with(root.path()) {
            return reject(UnsafeReason::SymlinkEscape);
        }
        if has_vcs_segment(&resolved) {
            return reject(UnsafeReason::InsideGit);
        }
    }

    Ok(())
}

/// Validate a root-relative path and return its absolute location.
pub fn resolve(root: &Root, relative: &Path) -> Result<PathBuf, CleanError> {
    let absolute = root.join(relative);
    validate(root, &absolute)?;
    Ok(absolute)
}
