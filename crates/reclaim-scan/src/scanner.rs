//! The scan pipeline: traverse, classify, gate, prune, measure, report.

use std::time::Instant;

use humansize::{BINARY, format_size};
use reclaim_core::{
    Artifact, ArtifactKind, CleanError, Root, ScanConfig, ScanReport, ScanWarning,
};
use tracing::{debug, info, warn};

use crate::classify::classify;
use crate::go::{self, AmbiguityReason, GoVerdict};
use crate::patterns::{Patterns, is_ambiguous_name};
use crate::prune::prune_nested;
use crate::usage::{SizeMode, disk_usage};
use crate::walker::{Accumulator, Candidate, collect_candidates};

/// A report plus the non-fatal problems met while producing it.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub report: ScanReport,
    pub warnings: Vec<ScanWarning>,
}

/// A candidate that survived classification.
#[derive(Debug, Clone)]
struct Classified {
    candidate: Candidate,
    kind: ArtifactKind,
}

/// Read-only artifact scanner.
#[derive(Debug, Default)]
pub struct Scanner;

impl Scanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        Self
    }

    /// Scan `config.root` and build a report. Never mutates the filesystem.
    ///
    /// Fails only when the root is missing, not a directory or inside
    /// `.git`, or when the configuration is invalid.
    pub fn scan(&self, config: &ScanConfig) -> Result<ScanOutcome, CleanError> {
        let start = Instant::now();
        let root = Root::open(&config.root)?;
        let patterns = Patterns::new(config)?;
        let mode = SizeMode::from_apparent(config.apparent_size);

        info!(root = %root.path().display(), "scanning");

        let mut acc = Accumulator::default();
        collect_candidates(&root, &patterns, &mut acc);
        let classified = classify_candidates(&root, &mut acc);
        let kept = prune_nested(classified, |c| &c.candidate.relative_path);

        let mut artifacts = Vec::with_capacity(kept.len());
        for item in kept {
            let size = disk_usage(
                &root.join(&item.candidate.relative_path),
                mode,
                &mut acc.warnings,
            );
            artifacts.push(Artifact::new(item.candidate.relative_path, size, item.kind)?);
        }

        let project_size = disk_usage(root.path(), mode, &mut acc.warnings);
        let report = ScanReport::new(root.path(), project_size, artifacts, acc.skipped);

        for warning in &acc.warnings {
            warn!(path = %warning.path.display(), kind = ?warning.kind, "{}", warning.message);
        }
        info!(
            artifacts = report.artifacts().len(),
            skipped = report.skipped_ambiguous().len(),
            total = %format_size(report.total_bytes(), BINARY),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "scan complete"
        );

        Ok(ScanOutcome {
            report,
            warnings: acc.warnings,
        })
    }

    /// Scan and return only the report.
    pub fn report(&self, config: &ScanConfig) -> Result<ScanReport, CleanError> {
        self.scan(config).map(|outcome| outcome.report)
    }
}

/// Tag every candidate with a kind, sending ambiguous ones to the skipped
/// list instead.
fn classify_candidates(root: &Root, acc: &mut Accumulator) -> Vec<Classified> {
    let mut classified = Vec::with_capacity(acc.candidates.len());

    for candidate in acc.candidates.drain(..) {
        let kind = classify(&candidate.relative_path);
        let gated = kind == ArtifactKind::Go || is_ambiguous_name(&candidate.name());

        if gated {
            let verdict = if is_ambiguous_name(&candidate.name()) {
                go::check(&root.join(&candidate.relative_path))
            } else {
                GoVerdict::Skip(AmbiguityReason::UnexpectedName)
            };
            if let GoVerdict::Skip(reason) = verdict {
                info!(
                    path = %candidate.relative_path.display(),
                    %reason,
                    "ambiguous, left for manual review"
                );
                acc.skipped.push(candidate.relative_path);
                continue;
            }
        }

        debug!(path = %candidate.relative_path.display(), %kind, "classified");
        classified.push(Classified { candidate, kind });
    }

    classified
}
