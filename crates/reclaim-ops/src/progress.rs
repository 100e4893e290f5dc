//! Progress and result types for a delete pass.

use std::fmt;
use std::path::PathBuf;

use humansize::{BINARY, format_size};
use reclaim_core::{CleanError, UnsafeReason};

/// Progress of an ongoing delete pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionProgress {
    /// Number of artifacts in the pass.
    pub total: usize,
    /// Artifacts removed so far.
    pub deleted: usize,
    /// Artifacts that could not be removed.
    pub failed: usize,
    /// Sum of the reported sizes of removed artifacts.
    pub bytes_reported: u64,
    /// Artifact about to be removed, `None` once the pass is over.
    pub current: Option<PathBuf>,
}

impl DeletionProgress {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    /// Artifacts handled so far, successfully or not.
    pub fn processed(&self) -> usize {
        self.deleted + self.failed
    }

    /// Progress as a percentage (0.0 to 100.0).
    pub fn percentage(&self) -> f64 {
        if self.total > 0 {
            (self.processed() as f64 / self.total as f64) * 100.0
        } else {
            100.0
        }
    }
}

/// One artifact that could not be removed.
#[derive(Debug)]
pub struct DeleteFailure {
    /// Root-relative path of the artifact.
    pub path: PathBuf,
    pub error: CleanError,
}

impl DeleteFailure {
    /// Short reason for the summary, `unsafe path` for guard rejections.
    pub fn reason(&self) -> String {
        match &self.error {
            CleanError::UnsafePath { reason, .. } => format!("unsafe path ({reason})"),
            CleanError::PermissionDenied { .. } => "permission denied".to_string(),
            CleanError::NotFound { .. } => "not found".to_string(),
            other => other.to_string(),
        }
    }

    /// The guard reason, if the guard refused this path.
    pub fn unsafe_reason(&self) -> Option<UnsafeReason> {
        match self.error {
            CleanError::UnsafePath { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Result of a completed delete pass.
#[derive(Debug, Default)]
pub struct DeletionSummary {
    /// Root-relative paths that were removed, in pass order.
    pub deleted: Vec<PathBuf>,
    pub failures: Vec<DeleteFailure>,
    /// Root size before the pass.
    pub bytes_before: u64,
    /// Root size after the pass.
    pub bytes_after: u64,
    /// `bytes_before - bytes_after`, never negative.
    pub bytes_freed: u64,
}

impl DeletionSummary {
    /// Check if every artifact was removed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn deleted_count(&self) -> usize {
        self.deleted.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }
}

impl fmt::Display for DeletionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Deleted {} item(s), freed {}",
            self.deleted_count(),
            format_size(self.bytes_freed, BINARY)
        )?;
        if !self.failures.is_empty() {
            writeln!(f, "Failed ({}):", self.failed_count())?;
            for failure in &self.failures {
                writeln!(f, "  {}: {}", failure.path.display(), failure.reason())?;
            }
        }
        Ok(())
    }
}
