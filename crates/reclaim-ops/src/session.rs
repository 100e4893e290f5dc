//! One scan → confirm → delete run.
//!
//! ```text
//! Idle ──scan──▶ Scanned ──confirmed──▶ Deleting ──▶ Done
//!                   │
//!                   └──cancelled──▶ Cancelled
//! ```
//!
//! Deletion only ever starts from `Scanned`, so every delete pass works on
//! a report computed by this session.

use std::io::Write;

use reclaim_core::{Artifact, CleanError, Mode, Root, ScanConfig, ScanReport, ScanWarning};
use reclaim_scan::{Scanner, SizeMode};
use tracing::info;

use crate::confirm::{Confirm, Confirmation, DEFAULT_PROMPT};
use crate::executor::Deleter;
use crate::format::ReportFormat;
use crate::progress::{DeletionProgress, DeletionSummary};

/// Where a session stands.
#[derive(Debug, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Scanned(ScanReport),
    /// A delete pass is running.
    Deleting,
    Done {
        report: ScanReport,
        summary: DeletionSummary,
    },
    Cancelled(ScanReport),
}

impl SessionState {
    /// The report this state carries, if any.
    pub fn report(&self) -> Option<&ScanReport> {
        match self {
            Self::Scanned(report) | Self::Cancelled(report) | Self::Done { report, .. } => {
                Some(report)
            }
            Self::Idle | Self::Deleting => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Scanned(_) => "scanned",
            Self::Deleting => "deleting",
            Self::Done { .. } => "done",
            Self::Cancelled(_) => "cancelled",
        }
    }
}

/// Drives one run through the state machine.
#[derive(Debug)]
pub struct Session {
    config: ScanConfig,
    scanner: Scanner,
    deleter: Deleter,
    state: SessionState,
    warnings: Vec<ScanWarning>,
}

impl Session {
    pub fn new(config: ScanConfig) -> Self {
        let deleter = Deleter::new(SizeMode::from_apparent(config.apparent_size));
        Self {
            config,
            scanner: Scanner::new(),
            deleter,
            state: SessionState::Idle,
            warnings: Vec::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Warnings from the latest scan.
    pub fn warnings(&self) -> &[ScanWarning] {
        &self.warnings
    }

    /// Compute a fresh report, replacing whatever state came before.
    pub fn scan(&mut self) -> Result<&ScanReport, CleanError> {
        let outcome = self.scanner.scan(&self.config)?;
        self.warnings = outcome.warnings;
        self.state = SessionState::Scanned(outcome.report);
        self.state.report().ok_or(CleanError::NotScanned)
    }

    /// Act on the user's answer. A confirmation runs the delete pass over
    /// the scanned artifacts; anything else cancels without side effects.
    pub fn resolve<F>(
        &mut self,
        confirmation: Confirmation,
        on_progress: F,
    ) -> Result<&SessionState, CleanError>
    where
        F: FnMut(&DeletionProgress),
    {
        let report = match std::mem::take(&mut self.state) {
            SessionState::Scanned(report) => report,
            other => {
                self.state = other;
                return Err(CleanError::NotScanned);
            }
        };

        if !confirmation.is_confirmed() {
            info!("delete pass cancelled");
            self.state = SessionState::Cancelled(report);
            return Ok(&self.state);
        }

        let root = match Root::open(report.root()) {
            Ok(root) => root,
            Err(err) => {
                self.state = SessionState::Scanned(report);
                return Err(err);
            }
        };

        self.state = SessionState::Deleting;
        let summary = self
            .deleter
            .delete_all(&root, report.artifacts(), on_progress);
        self.state = SessionState::Done { report, summary };
        Ok(&self.state)
    }

    /// Consume the session, returning its final state.
    pub fn into_state(self) -> SessionState {
        self.state
    }
}

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// Report only, nothing touched.
    DryRun(ScanReport),
    /// The user declined; nothing touched.
    Cancelled(ScanReport),
    Applied {
        report: ScanReport,
        summary: DeletionSummary,
    },
}

impl RunOutcome {
    pub fn report(&self) -> &ScanReport {
        match self {
            Self::DryRun(report) | Self::Cancelled(report) | Self::Applied { report, .. } => {
                report
            }
        }
    }

    pub fn summary(&self) -> Option<&DeletionSummary> {
        match self {
            Self::Applied { summary, .. } => Some(summary),
            _ => None,
        }
    }
}

/// Scan, write the text report to `out`, and in apply mode confirm and
/// delete.
pub fn run<W: Write>(
    config: &ScanConfig,
    mode: Mode,
    confirm: &mut dyn Confirm,
    out: &mut W,
) -> Result<RunOutcome, CleanError> {
    run_with_format(config, mode, ReportFormat::Text, confirm, out)
}

/// [`run`] with a choice of report format.
///
/// The report is always written before any confirmation is asked for. An
/// empty report in apply mode skips the prompt and deletes nothing.
pub fn run_with_format<W: Write>(
    config: &ScanConfig,
    mode: Mode,
    format: ReportFormat,
    confirm: &mut dyn Confirm,
    out: &mut W,
) -> Result<RunOutcome, CleanError> {
    let mut session = Session::new(config.clone());
    let report = session.scan()?;

    let rendered = format.render(report)?;
    out.write_all(rendered.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|e| CleanError::io("<output>", e))?;

    if mode == Mode::DryRun {
        return into_outcome(session, RunOutcome::DryRun);
    }
    let confirmation = if report.is_empty() {
        info!("nothing to delete");
        Confirmation::Confirmed
    } else {
        confirm.confirm(DEFAULT_PROMPT)?
    };
    session.resolve(confirmation, |_| {})?;

    match session.into_state() {
        SessionState::Done { report, summary } => Ok(RunOutcome::Applied { report, summary }),
        SessionState::Cancelled(report) => Ok(RunOutcome::Cancelled(report)),
        _ => Err(CleanError::NotScanned),
    }
}

fn into_outcome(
    session: Session,
    wrap: fn(ScanReport) -> RunOutcome,
) -> Result<RunOutcome, CleanError> {
    match session.into_state() {
        SessionState::Scanned(report) => Ok(wrap(report)),
        _ => Err(CleanError::NotScanned),
    }
}

/// Delete the artifacts of a report produced elsewhere (for example one
/// parsed from another process's output). Every path is validated against
/// the report's root before removal.
pub fn apply_report(
    report: &ScanReport,
    size_mode: SizeMode,
    confirm: &mut dyn Confirm,
) -> Result<Option<DeletionSummary>, CleanError> {
    let root = Root::open(report.root())?;
    if report.is_empty() {
        return Ok(None);
    }
    if !confirm.confirm(DEFAULT_PROMPT)?.is_confirmed() {
        info!("delete pass cancelled");
        return Ok(None);
    }
    Ok(Some(delete_artifacts(&root, report.artifacts(), size_mode)))
}

/// The delete primitive for callers that run their own confirmation UI.
pub fn delete_artifacts(
    root: &Root,
    artifacts: &[Artifact],
    size_mode: SizeMode,
) -> DeletionSummary {
    Deleter::new(size_mode).delete_all(root, artifacts, |_| {})
}
