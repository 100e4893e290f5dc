//! The delete pass.

use std::fs;
use std::path::Path;

use reclaim_core::{Artifact, CleanError, Root, ScanWarning};
use reclaim_scan::{SizeMode, disk_usage};
use tracing::{debug, info, warn};

use crate::guard;
use crate::progress::{DeleteFailure, DeletionProgress, DeletionSummary};

/// Removes artifacts under a root, one at a time.
#[derive(Debug, Clone, Copy)]
pub struct Deleter {
    size_mode: SizeMode,
}

impl Default for Deleter {
    fn default() -> Self {
        Self::new(SizeMode::Blocks)
    }
}

impl Deleter {
    /// Create a deleter that measures the root with `size_mode`.
    pub fn new(size_mode: SizeMode) -> Self {
        Self { size_mode }
    }

    pub fn size_mode(&self) -> SizeMode {
        self.size_mode
    }

    /// Remove one absolute path after re-checking containment.
    ///
    /// Directories are removed recursively, anything else (including a
    /// symlink to a directory) is unlinked.
    pub fn delete_path(&self, root: &Root, path: &Path) -> Result<(), CleanError> {
        guard::validate(root, path)?;

        let metadata = fs::symlink_metadata(path).map_err(|e| CleanError::io(path, e))?;
        let removed = if metadata.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        };
        removed.map_err(|e| CleanError::io(path, e))
    }

    /// Remove every artifact, continuing past failures.
    ///
    /// `on_progress` is called before each artifact and once more when the
    /// pass is over.
    pub fn delete_all<F>(
        &self,
        root: &Root,
        artifacts: &[Artifact],
        mut on_progress: F,
    ) -> DeletionSummary
    where
        F: FnMut(&DeletionProgress),
    {
        let bytes_before = self.measure(root);
        let mut progress = DeletionProgress::new(artifacts.len());
        let mut summary = DeletionSummary {
            bytes_before,
            ..Default::default()
        };

        info!(root = %root.path().display(), count = artifacts.len(), "deleting artifacts");

        for artifact in artifacts {
            progress.current = Some(artifact.relative_path.clone());
            on_progress(&progress);

            match self.delete_path(root, &root.join(&artifact.relative_path)) {
                Ok(()) => {
                    debug!(path = %artifact.display_path(), "deleted");
                    progress.deleted += 1;
                    progress.bytes_reported += artifact.size_bytes;
                    summary.deleted.push(artifact.relative_path.clone());
                }
                Err(error) => {
                    warn!(path = %artifact.display_path(), %error, "delete failed");
                    progress.failed += 1;
                    summary.failures.push(DeleteFailure {
                        path: artifact.relative_path.clone(),
                        error,
                    });
                }
            }
        }

        progress.current = None;
        on_progress(&progress);

        summary.bytes_after = self.measure(root);
        summary.bytes_freed = summary.bytes_before.saturating_sub(summary.bytes_after);

        info!(
            deleted = summary.deleted_count(),
            failed = summary.failed_count(),
            freed = summary.bytes_freed,
            "delete pass complete"
        );
        summary
    }

    fn measure(&self, root: &Root) -> u64 {
        let mut warnings: Vec<ScanWarning> = Vec::new();
        let size = disk_usage(root.path(), self.size_mode, &mut warnings);
        for warning in warnings {
            debug!(path = %warning.path.display(), "{}", warning.message);
        }
        size
    }
}
