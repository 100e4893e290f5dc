//! Cross-platform metadata helpers.

use std::fs::Metadata;

/// Whether any execute bit is set (Unix).
#[cfg(unix)]
pub(crate) fn is_executable(metadata: &Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
pub(crate) fn is_executable(_metadata: &Metadata) -> bool {
    false
}

/// Get the device ID from metadata.
#[cfg(unix)]
pub(crate) fn device(metadata: &Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    metadata.dev()
}

#[cfg(not(unix))]
pub(crate) fn device(_metadata: &Metadata) -> u64 {
    0
}

/// Get the inode number from metadata.
#[cfg(unix)]
pub(crate) fn inode(metadata: &Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    metadata.ino()
}

#[cfg(not(unix))]
pub(crate) fn inode(_metadata: &Metadata) -> u64 {
    0
}

/// Get the number of hard links from metadata.
#[cfg(unix)]
pub(crate) fn link_count(metadata: &Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    metadata.nlink()
}

#[cfg(not(unix))]
pub(crate) fn link_count(_metadata: &Metadata) -> u64 {
    1
}

/// Bytes allocated on disk (512-byte blocks).
#[cfg(unix)]
pub(crate) fn allocated_bytes(metadata: &Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    metadata.blocks() * 512
}

#[cfg(not(unix))]
pub(crate) fn allocated_bytes(metadata: &Metadata) -> u64 {
    metadata.len().div_ceil(512) * 512
}
