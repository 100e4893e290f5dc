//! Exclusion & traversal filter.
//!
//! Walks the tree under the root top-down and collects candidate paths.
//! `.git` (and configured ignore names) are removed from the walk before
//! they are ever examined. A directory that matches a pattern becomes one
//! candidate and is not descended into. Symlinks are never followed nor
//! reported, and directories on another filesystem are not entered.
//! Names that would not survive the report's path encoding are left out
//! with a warning.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use jwalk::{Parallelism, WalkDir};
use reclaim_core::{Root, ScanWarning, WarningKind, round_trips};
use tracing::{debug, trace};

use crate::meta;
use crate::patterns::{CandidateShape, Patterns};

/// A path matched by a traversal pattern, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Root-relative path.
    pub relative_path: PathBuf,
    pub shape: CandidateShape,
}

impl Candidate {
    pub fn new(relative_path: impl Into<PathBuf>, shape: CandidateShape) -> Self {
        Self {
            relative_path: relative_path.into(),
            shape,
        }
    }

    /// Final path segment as text.
    pub fn name(&self) -> String {
        self.relative_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// State threaded through the scan stages.
#[derive(Debug, Default)]
pub struct Accumulator {
    /// Candidates found by traversal (or still standing after a later stage).
    pub candidates: Vec<Candidate>,
    /// Root-relative paths left for manual review.
    pub skipped: Vec<PathBuf>,
    /// Non-fatal problems.
    pub warnings: Vec<ScanWarning>,
}

/// Walk `root` and push every candidate into `acc`.
pub fn collect_candidates(root: &Root, patterns: &Patterns, acc: &mut Accumulator) {
    let root_device = match std::fs::metadata(root.path()) {
        Ok(m) => meta::device(&m),
        Err(err) => {
            acc.warnings.push(ScanWarning::read_error(root.path(), &err));
            return;
        }
    };

    let prune = Arc::new(patterns.clone());
    let walker = WalkDir::new(root.path())
        .parallelism(Parallelism::Serial)
        .skip_hidden(false)
        .follow_links(false)
        .sort(true)
        .process_read_dir(move |depth, _dir, _state, children| {
            // The root itself arrives with no depth and is always walked.
            if depth.is_none() {
                return;
            }
            children.retain(|child| match child {
                Ok(entry) => !prune.is_excluded(&entry.file_name.to_string_lossy()),
                Err(_) => true,
            });
            for entry in children.iter_mut().flatten() {
                if !entry.file_type.is_dir() {
                    continue;
                }
                let name = entry.file_name.to_string_lossy();
                if prune.is_dir_candidate(&name) || !same_device(&entry.path(), root_device) {
                    entry.read_children_path = None;
                }
            }
        });

    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                let path = err.path().map(Path::to_path_buf).unwrap_or_default();
                acc.warnings
                    .push(ScanWarning::new(path, err.to_string(), WarningKind::ReadError));
                continue;
            }
        };

        if entry.depth() == 0 {
            continue;
        }

        let file_type = entry.file_type();
        if file_type.is_symlink() {
            continue;
        }

        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();

        if file_type.is_dir() && !same_device(&path, root_device) {
            acc.warnings.push(ScanWarning::cross_filesystem(&path));
            continue;
        }

        let Some(shape) = patterns.match_entry(&name, file_type.is_dir()) else {
            trace!(path = %path.display(), "not a candidate");
            continue;
        };

        match root.relative(&path) {
            Some(relative) if !round_trips(relative) => {
                acc.warnings.push(ScanWarning::new(
                    &path,
                    "name cannot be written into a report",
                    WarningKind::UnencodablePath,
                ));
            }
            Some(relative) => {
                debug!(path = %relative.display(), ?shape, "candidate");
                acc.candidates.push(Candidate::new(relative, shape));
            }
            None => acc.warnings.push(ScanWarning::new(
                &path,
                "entry outside the root",
                WarningKind::ReadError,
            )),
        }
    }
}

fn same_device(path: &Path, root_device: u64) -> bool {
    std::fs::symlink_metadata(path)
        .map(|m| meta::device(&m) == root_device)
        .unwrap_or(true)
}
