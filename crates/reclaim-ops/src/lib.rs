//! Confirmation, containment guard and deletion engine for reclaim.
//!
//! This crate turns a [`ScanReport`](reclaim_core::ScanReport) into removed
//! files. Every removal goes through [`guard::validate`] first, so nothing
//! outside the root or inside `.git` is ever touched, and per-item failures
//! are collected into a [`DeletionSummary`] instead of aborting the pass.
//!
//! - [`run`]: scan, print, confirm, delete
//! - [`Session`]: the same flow, one step at a time
//! - [`start_deletion`]: a delete pass on tokio's blocking pool with
//!   progress over a channel

mod confirm;
mod dispatch;
mod executor;
mod format;
pub mod guard;
mod progress;
mod session;

pub use confirm::{
    AutoConfirm, AutoDecline, Confirm, Confirmation, DEFAULT_PROMPT, ScriptedConfirm,
    StdinConfirm,
};
pub use dispatch::{DELETION_CHANNEL_SIZE, DeletionEvent, start_deletion, start_deletion_with};
pub use executor::Deleter;
pub use format::ReportFormat;
pub use progress::{DeleteFailure, DeletionProgress, DeletionSummary};
pub use session::{
    RunOutcome, Session, SessionState, apply_report, delete_artifacts, run, run_with_format,
};
