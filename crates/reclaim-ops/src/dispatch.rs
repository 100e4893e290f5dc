//! Background delete pass for interactive callers.
//!
//! The pass itself stays sequential; it just runs off the caller's thread
//! and streams progress over a channel so an event loop stays responsive.

use reclaim_core::{Artifact, Root};
use tokio::sync::mpsc;

use crate::executor::Deleter;
use crate::progress::{DeletionProgress, DeletionSummary};

/// Default channel buffer size for deletion events.
pub const DELETION_CHANNEL_SIZE: usize = 100;

/// Messages sent from a background delete pass.
#[derive(Debug)]
pub enum DeletionEvent {
    Progress(DeletionProgress),
    /// Always the last event.
    Complete(DeletionSummary),
}

/// Start a delete pass on tokio's blocking pool.
///
/// Must be called from within a tokio runtime. Dropping the receiver does
/// not stop the pass; it runs to the end of the list.
pub fn start_deletion(root: Root, artifacts: Vec<Artifact>) -> mpsc::Receiver<DeletionEvent> {
    start_deletion_with(Deleter::default(), root, artifacts)
}

/// [`start_deletion`] with a configured deleter.
pub fn start_deletion_with(
    deleter: Deleter,
    root: Root,
    artifacts: Vec<Artifact>,
) -> mpsc::Receiver<DeletionEvent> {
    let (tx, rx) = mpsc::channel(DELETION_CHANNEL_SIZE);

    tokio::task::spawn_blocking(move || {
        let summary = deleter.delete_all(&root, &artifacts, |progress| {
            let _ = tx.blocking_send(DeletionEvent::Progress(progress.clone()));
        });
        let _ = tx.blocking_send(DeletionEvent::Complete(summary));
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use reclaim_core::ArtifactKind;
    use reclaim_scan::SizeMode;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_streams_progress_then_complete() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("a/node_modules")).unwrap();
        fs::write(temp.path().join("a/node_modules/x"), vec![0u8; 64]).unwrap();
        fs::write(temp.path().join("a/out.log"), vec![0u8; 8]).unwrap();
        let root = Root::open(temp.path()).unwrap();

        let artifacts = vec![
            Artifact::new("a/node_modules", 64, ArtifactKind::Node).unwrap(),
            Artifact::new("a/out.log", 8, ArtifactKind::File).unwrap(),
        ];
        let mut rx = start_deletion_with(Deleter::new(SizeMode::Apparent), root, artifacts);

        let mut progress_events = 0;
        let mut summary = None;
        while let Some(event) = rx.recv().await {
            match event {
                DeletionEvent::Progress(_) => {
                    assert!(summary.is_none());
                    progress_events += 1;
                }
                DeletionEvent::Complete(s) => summary = Some(s),
            }
        }

        let summary = summary.unwrap();
        assert_eq!(progress_events, 3);
        assert_eq!(summary.deleted_count(), 2);
        assert_eq!(summary.bytes_freed, 72);
        assert!(!temp.path().join("a/node_modules").exists());
        assert!(temp.path().join("a").exists());
    }

    #[tokio::test]
    async fn test_empty_pass_completes() {
        let temp = TempDir::new().unwrap();
        let root = Root::open(temp.path()).unwrap();

        let mut rx = start_deletion(root, Vec::new());
        let mut last = None;
        while let Some(event) = rx.recv().await {
            last = Some(event);
        }
        match last {
            Some(DeletionEvent::Complete(summary)) => {
                assert_eq!(summary.deleted_count(), 0);
                assert!(summary.is_success());
            }
            other => panic!("expected Complete, got {other:?}"),
        }
    }
}
