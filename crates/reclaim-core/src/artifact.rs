//! Artifact, kind, root and mode types.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::CleanError;

/// Classification label for a reclaimable artifact.
///
/// This is a closed set; the token form (`node`, `swift`, ...) is part of
/// the report protocol.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ArtifactKind {
    Node,
    Swift,
    Python,
    Rust,
    Go,
    Cpp,
    Codex,
    File,
    Folder,
}

/// Run mode. Dry-run never mutates the filesystem.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Mode {
    #[default]
    DryRun,
    Apply,
}

/// The canonical directory that bounds a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Root(PathBuf);

impl Root {
    /// Canonicalize `path` and check that it is an existing directory
    /// outside any `.git` directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CleanError> {
        let path = path.as_ref();
        let canonical = path
            .canonicalize()
            .map_err(|e| CleanError::invalid_root(path, e.to_string()))?;
        if !canonical.is_dir() {
            return Err(CleanError::invalid_root(canonical, "not a directory"));
        }
        if has_vcs_segment(&canonical) {
            return Err(CleanError::invalid_root(canonical, "inside a .git directory"));
        }
        Ok(Self(canonical))
    }

    /// The canonical root path.
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Absolute location of a root-relative path.
    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.0.join(relative)
    }

    /// Root-relative form of an absolute path below the root.
    pub fn relative<'a>(&self, absolute: &'a Path) -> Option<&'a Path> {
        absolute
            .strip_prefix(&self.0)
            .ok()
            .filter(|rel| !rel.as_os_str().is_empty())
    }
}

impl AsRef<Path> for Root {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

/// Whether any segment of `path` is `.git`, ignoring ASCII case.
pub fn has_vcs_segment(path: &Path) -> bool {
    path.components()
        .any(|c| c.as_os_str().eq_ignore_ascii_case(".git"))
}

/// A classified, reportable and deletable unit: a file or a whole subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Path relative to the root. Never absolute, empty, or containing `..`.
    pub relative_path: PathBuf,
    /// Disk usage in bytes.
    pub size_bytes: u64,
    /// Classification label.
    pub kind: ArtifactKind,
}

impl Artifact {
    /// Create an artifact, rejecting paths that could escape the root.
    pub fn new(
        relative_path: impl Into<PathBuf>,
        size_bytes: u64,
        kind: ArtifactKind,
    ) -> Result<Self, CleanError> {
        let relative_path = relative_path.into();
        let normalized: PathBuf = relative_path
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect();

        if normalized.as_os_str().is_empty() {
            return Err(CleanError::unsafe_path(
                relative_path,
                crate::UnsafeReason::EqualsRoot,
            ));
        }
        for component in normalized.components() {
            match component {
                Component::Normal(_) => {}
                Component::ParentDir => {
                    return Err(CleanError::unsafe_path(
                        relative_path,
                        crate::UnsafeReason::ParentTraversal,
                    ));
                }
                _ => {
                    return Err(CleanError::unsafe_path(
                        relative_path,
                        crate::UnsafeReason::OutsideRoot,
                    ));
                }
            }
        }

        Ok(Self {
            relative_path: normalized,
            size_bytes,
            kind,
        })
    }

    /// Path as written in reports, with `/` separators.
    pub fn display_path(&self) -> String {
        display_relative(&self.relative_path)
    }

    /// Whether this artifact is `other` or lies beneath it.
    pub fn is_within(&self, other: &Artifact) -> bool {
        self.relative_path.starts_with(&other.relative_path)
    }
}

/// Render a relative path with `/` separators regardless of platform.
fn display_relative(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_kind_tokens_roundtrip() {
        for kind in ArtifactKind::iter() {
            let token = kind.to_string();
            assert_eq!(token, token.to_lowercase());
            assert_eq!(token.parse::<ArtifactKind>().unwrap(), kind);
        }
        assert_eq!(ArtifactKind::Cpp.as_ref(), "cpp");
    }

    #[test]
    fn test_mode_default_and_tokens() {
        assert_eq!(Mode::default(), Mode::DryRun);
        assert_eq!(Mode::DryRun.to_string(), "dry-run");
        assert_eq!("apply".parse::<Mode>().unwrap(), Mode::Apply);
    }

    #[test]
    fn test_artifact_rejects_escape() {
        assert!(Artifact::new("../etc", 0, ArtifactKind::Folder).is_err());
        assert!(Artifact::new("a/../../b", 0, ArtifactKind::Folder).is_err());
        assert!(Artifact::new("/abs/path", 0, ArtifactKind::Folder).is_err());
        assert!(Artifact::new("", 0, ArtifactKind::Folder).is_err());
        assert!(Artifact::new(".", 0, ArtifactKind::Folder).is_err());
    }

    #[test]
    fn test_artifact_normalizes_curdir() {
        let artifact = Artifact::new("./web/./node_modules", 10, ArtifactKind::Node).unwrap();
        assert_eq!(artifact.display_path(), "web/node_modules");
    }

    #[test]
    fn test_is_within() {
        let outer = Artifact::new("a/build", 0, ArtifactKind::Folder).unwrap();
        let inner = Artifact::new("a/build/tmp", 0, ArtifactKind::Folder).unwrap();
        let sibling = Artifact::new("a/build-tools", 0, ArtifactKind::Folder).unwrap();
        assert!(inner.is_within(&outer));
        assert!(outer.is_within(&outer));
        assert!(!sibling.is_within(&outer));
    }

    #[test]
    fn test_root_open_rejects_file_and_missing() {
        let temp = tempfile::TempDir::new().unwrap();
        let file = temp.path().join("plain.txt");
        std::fs::write(&file, "x").unwrap();

        assert!(matches!(
            Root::open(&file),
            Err(CleanError::InvalidRoot { .. })
        ));
        assert!(matches!(
            Root::open(temp.path().join("missing")),
            Err(CleanError::InvalidRoot { .. })
        ));

        let root = Root::open(temp.path()).unwrap();
        assert!(root.path().is_absolute());
        assert_eq!(root.relative(root.path()), None);
        assert_eq!(
            root.relative(&root.join("x/y")),
            Some(Path::new("x/y"))
        );
    }

    #[test]
    fn test_root_open_rejects_git_directories() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join(".git/refs")).unwrap();
        std::fs::create_dir_all(temp.path().join("vendor/.GIT")).unwrap();

        for inside in [".git", ".git/refs", "vendor/.GIT"] {
            assert!(
                matches!(
                    Root::open(temp.path().join(inside)),
                    Err(CleanError::InvalidRoot { .. })
                ),
                "{inside}"
            );
        }
        assert!(has_vcs_segment(Path::new("/a/.Git/b")));
        assert!(!has_vcs_segment(Path::new("/a/.github/b")));
    }
}
