//! Error types for scanning, report interpretation and deletion.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;

/// Errors raised by the cleanup engine.
///
/// `InvalidRoot`, `InvalidConfig`, `NotScanned` and `Parse` are fatal to the
/// operation that produced them.
/// `UnsafePath`, `PermissionDenied`, `NotFound` and `Io` are local to a single
/// artifact during a delete pass: the pass records them and moves on.
#[derive(Debug, Error)]
pub enum CleanError {
    /// Root is missing, not a directory, or inside `.git`.
    #[error("Invalid root {path}: {reason}")]
    InvalidRoot { path: PathBuf, reason: String },

    /// A path failed containment validation right before deletion.
    #[error("Unsafe path {path}: {reason}")]
    UnsafePath { path: PathBuf, reason: UnsafeReason },

    /// Invalid configuration (for example a pattern that does not compile).
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Deletion was requested without a fresh scan report.
    #[error("No fresh scan report; scan before deleting")]
    NotScanned,

    /// A report line was missing or malformed.
    #[error("Malformed report at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found (vanished before it could be handled).
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CleanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Create an invalid root error.
    pub fn invalid_root(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidRoot {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an unsafe path error.
    pub fn unsafe_path(path: impl Into<PathBuf>, reason: UnsafeReason) -> Self {
        Self::UnsafePath {
            path: path.into(),
            reason,
        }
    }

    /// Create a report parse error for a 1-based line number.
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Whether this error only affects a single item of a delete pass.
    pub fn is_local(&self) -> bool {
        !matches!(
            self,
            Self::InvalidRoot { .. }
                | Self::InvalidConfig { .. }
                | Self::NotScanned
                | Self::Parse { .. }
        )
    }
}

/// Why a path was refused by the containment guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum UnsafeReason {
    #[strum(to_string = "path is the root itself")]
    EqualsRoot,
    #[strum(to_string = "path is outside the root")]
    OutsideRoot,
    #[strum(to_string = "path is or lies inside .git")]
    InsideGit,
    #[strum(to_string = "path contains a parent (..) segment")]
    ParentTraversal,
    #[strum(to_string = "path resolves outside the root through a symlink")]
    SymlinkEscape,
}

/// Kind of scan warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Permission was denied.
    PermissionDenied,
    /// Error reading a directory.
    ReadError,
    /// Error reading metadata.
    MetadataError,
    /// Entry lives on another filesystem and was not traversed.
    CrossFilesystem,
    /// Entry name cannot be written into a report and read back intact.
    UnencodablePath,
}

/// Non-fatal warning encountered during a scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanWarning {
    /// Path where the warning occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl ScanWarning {
    /// Create a new scan warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create a read error warning, classifying permission failures.
    pub fn read_error(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        let path = path.into();
        let kind = if error.kind() == std::io::ErrorKind::PermissionDenied {
            WarningKind::PermissionDenied
        } else {
            WarningKind::ReadError
        };
        Self {
            message: format!("Read error: {error}"),
            path,
            kind,
        }
    }

    /// Create a cross-filesystem warning.
    pub fn cross_filesystem(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!("Not crossing filesystem boundary at {}", path.display()),
            path,
            kind: WarningKind::CrossFilesystem,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_error_io() {
        let err = CleanError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, CleanError::PermissionDenied { .. }));
        assert!(err.is_local());
    }

    #[test]
    fn test_fatal_kinds_are_not_local() {
        assert!(!CleanError::invalid_root("/nope", "does not exist").is_local());
        assert!(!CleanError::parse(3, "missing header").is_local());
        assert!(!CleanError::NotScanned.is_local());
    }

    #[test]
    fn test_unsafe_path_message() {
        let err = CleanError::unsafe_path("/r/.git", UnsafeReason::InsideGit);
        let msg = err.to_string();
        assert!(msg.starts_with("Unsafe path"));
        assert!(msg.contains(".git"));
    }

    #[test]
    fn test_read_error_warning_kind() {
        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let warning = ScanWarning::read_error("/x", &denied);
        assert_eq!(warning.kind, WarningKind::PermissionDenied);

        let other = std::io::Error::other("boom");
        assert_eq!(ScanWarning::read_error("/x", &other).kind, WarningKind::ReadError);
    }
}
