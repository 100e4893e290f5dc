//! Read-only artifact scanner for reclaim.
//!
//! # Overview
//!
//! `reclaim-scan` turns a project root into a [`ScanReport`]:
//!
//! - **Traversal filter** walks the tree, pruning `.git` and treating each
//!   matched directory as one atomic candidate
//! - **Classifier** maps every candidate path to an [`ArtifactKind`]
//! - **Go disambiguator** only accepts `bin`/`pkg` when they look like Go
//!   build output, otherwise records them for manual review
//! - **Pruner** removes nested overlaps
//! - **Disk usage** measures each artifact and the whole root
//!
//! The scan is single-threaded and never modifies the filesystem.
//!
//! # Example
//!
//! ```rust,no_run
//! use reclaim_scan::{ScanConfig, Scanner};
//!
//! let config = ScanConfig::new("/path/to/project");
//! let outcome = Scanner::new().scan(&config).unwrap();
//! print!("{}", outcome.report);
//! ```

mod classify;
mod go;
mod meta;
mod patterns;
mod prune;
mod scanner;
mod usage;
mod walker;

pub use classify::classify;
pub use go::{AmbiguityReason, GoVerdict, MODULE_CACHE_DIRS, SCRIPT_EXTENSIONS, is_script};
pub use patterns::{CandidateShape, DIR_PATTERNS, FILE_PATTERNS, Patterns, VCS_DIR};
pub use prune::prune_nested;
pub use scanner::{ScanOutcome, Scanner};
pub use usage::{InodeTracker, SizeMode, disk_usage};
pub use walker::{Accumulator, Candidate, collect_candidates};

/// Run the Go disambiguator on a `bin` or `pkg` directory.
pub fn check_go_candidate(path: &std::path::Path) -> GoVerdict {
    go::check(path)
}

// Re-export core types for convenience
pub use reclaim_core::{
    Artifact, ArtifactKind, CleanError, Root, ScanConfig, ScanReport, ScanWarning, WarningKind,
};
