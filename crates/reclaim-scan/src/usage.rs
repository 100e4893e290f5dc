//! Recursive disk usage.
//!
//! Block-based by default (allocated 512-byte blocks, like `du`), or byte
//! lengths when apparent size is requested. Symlinks are not followed,
//! other filesystems are not entered, and a hard-linked inode is counted
//! once per measurement.

use std::collections::HashSet;
use std::path::Path;

use jwalk::{Parallelism, WalkDir};
use reclaim_core::{ScanWarning, WarningKind};

use crate::meta;

/// Tracks seen `(device, inode)` pairs so hard links are counted once.
#[derive(Debug, Default)]
pub struct InodeTracker {
    seen: HashSet<(u64, u64)>,
}

impl InodeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` the first time an inode is seen.
    pub fn track(&mut self, device: u64, inode: u64) -> bool {
        self.seen.insert((device, inode))
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Size accounting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeMode {
    /// Allocated blocks.
    Blocks,
    /// File lengths.
    Apparent,
}

impl SizeMode {
    pub fn from_apparent(apparent: bool) -> Self {
        if apparent { Self::Apparent } else { Self::Blocks }
    }

    fn of(self, metadata: &std::fs::Metadata) -> u64 {
        match self {
            Self::Blocks => meta::allocated_bytes(metadata),
            Self::Apparent if metadata.is_file() => metadata.len(),
            Self::Apparent => 0,
        }
    }
}

/// Disk usage of `path` in bytes. Problems are recorded as warnings and the
/// affected entries count as zero.
pub fn disk_usage(path: &Path, mode: SizeMode, warnings: &mut Vec<ScanWarning>) -> u64 {
    let top = match std::fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(err) => {
            warnings.push(ScanWarning::new(
                path,
                err.to_string(),
                WarningKind::MetadataError,
            ));
            return 0;
        }
    };
    if top.file_type().is_symlink() {
        return 0;
    }
    if !top.is_dir() {
        return mode.of(&top);
    }

    let root_device = meta::device(&top);
    let mut inodes = InodeTracker::new();
    let mut total = 0u64;

    let walker = WalkDir::new(path)
        .parallelism(Parallelism::Serial)
        .skip_hidden(false)
        .follow_links(false)
        .process_read_dir(move |depth, _dir, _state, children| {
            if depth.is_none() {
                return;
            }
            for entry in children.iter_mut().flatten() {
                if !entry.file_type.is_dir() {
                    continue;
                }
                let foreign = std::fs::symlink_metadata(entry.path())
                    .map(|m| meta::device(&m) != root_device)
                    .unwrap_or(false);
                if foreign {
                    entry.read_children_path = None;
                }
            }
        });

    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                let at = err.path().map(Path::to_path_buf).unwrap_or_default();
                warnings.push(ScanWarning::new(at, err.to_string(), WarningKind::ReadError));
                continue;
            }
        };
        if entry.file_type().is_symlink() {
            continue;
        }
        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(err) => {
                warnings.push(ScanWarning::new(
                    entry.path(),
                    err.to_string(),
                    WarningKind::MetadataError,
                ));
                continue;
            }
        };
        if meta::device(&metadata) != root_device {
            continue;
        }
        if metadata.is_file()
            && meta::link_count(&metadata) > 1
            && !inodes.track(meta::device(&metadata), meta::inode(&metadata))
        {
            continue;
        }
        total += mode.of(&metadata);
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_inode_tracker() {
        let mut tracker = InodeTracker::new();
        assert!(tracker.track(1, 42));
        assert!(!tracker.track(1, 42));
        assert!(tracker.track(2, 42));
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_apparent_size_sums_files() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("a/b")).unwrap();
        fs::write(temp.path().join("a/one"), vec![0u8; 100]).unwrap();
        fs::write(temp.path().join("a/b/two"), vec![0u8; 250]).unwrap();

        let mut warnings = Vec::new();
        let size = disk_usage(temp.path(), SizeMode::Apparent, &mut warnings);
        assert_eq!(size, 350);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_single_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("x.log");
        fs::write(&file, vec![1u8; 42]).unwrap();

        let mut warnings = Vec::new();
        assert_eq!(disk_usage(&file, SizeMode::Apparent, &mut warnings), 42);
    }

    #[test]
    fn test_missing_path_is_zero_with_warning() {
        let temp = TempDir::new().unwrap();
        let mut warnings = Vec::new();
        let size = disk_usage(&temp.path().join("gone"), SizeMode::Blocks, &mut warnings);
        assert_eq!(size, 0);
        assert_eq!(warnings.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_hardlinks_counted_once() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("data"), vec![0u8; 500]).unwrap();
        fs::hard_link(temp.path().join("data"), temp.path().join("alias")).unwrap();

        let mut warnings = Vec::new();
        assert_eq!(disk_usage(temp.path(), SizeMode::Apparent, &mut warnings), 500);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_not_followed() {
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("big"), vec![0u8; 4096]).unwrap();

        let temp = TempDir::new().unwrap();
        std::os::unix::fs::symlink(outside.path(), temp.path().join("link")).unwrap();

        let mut warnings = Vec::new();
        assert_eq!(disk_usage(temp.path(), SizeMode::Apparent, &mut warnings), 0);
    }
}
