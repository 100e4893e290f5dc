//! Candidate name patterns for the traversal filter.

use std::collections::HashSet;

use globset::{Glob, GlobSet, GlobSetBuilder};
use reclaim_core::{CleanError, ScanConfig};

/// Directory names that become candidates. A matching directory is one
/// atomic candidate; its interior is never walked.
pub const DIR_PATTERNS: &[&str] = &[
    // JavaScript
    "node_modules",
    // Generic build output and caches
    "dist",
    "build",
    ".cache",
    "tmp",
    ".tmp",
    // Swift / Xcode
    ".build",
    "DerivedData",
    "xcuserdata",
    // Python
    "__pycache__",
    ".pytest_cache",
    ".mypy_cache",
    // Rust
    "target",
    // C/C++
    "CMakeFiles",
    // Agent scratch space
    ".codex",
    ".agent",
    // Go (gated, see `go`)
    "bin",
    "pkg",
];

/// File name globs that become candidates.
pub const FILE_PATTERNS: &[&str] = &[
    "*.log",
    ".DS_Store",
    "*.xcuserstate",
    "*.pyc",
    "CMakeCache.txt",
];

/// Directory that is never examined, reported or deleted.
pub const VCS_DIR: &str = ".git";

/// Directory names whose acceptance depends on the Go disambiguator.
pub const AMBIGUOUS_DIRS: &[&str] = &["bin", "pkg"];

/// What kind of entry a pattern matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateShape {
    Directory,
    File,
}

/// Compiled matcher over the fixed pattern tables plus config extras.
#[derive(Debug, Clone)]
pub struct Patterns {
    dirs: HashSet<String>,
    files: GlobSet,
    config: ScanConfig,
}

impl Patterns {
    /// Build the matcher for a scan.
    pub fn new(config: &ScanConfig) -> Result<Self, CleanError> {
        let dirs = DIR_PATTERNS
            .iter()
            .map(|p| (*p).to_string())
            .chain(config.extra_dir_patterns.iter().cloned())
            .collect();

        let mut builder = GlobSetBuilder::new();
        for pattern in FILE_PATTERNS {
            let glob = Glob::new(pattern).map_err(|e| CleanError::InvalidConfig {
                message: format!("bad file pattern {pattern:?}: {e}"),
            })?;
            builder.add(glob);
        }
        let files = builder.build().map_err(|e| CleanError::InvalidConfig {
            message: e.to_string(),
        })?;

        Ok(Self {
            dirs,
            files,
            config: config.clone(),
        })
    }

    /// Entries removed from traversal entirely: `.git` (any case) and
    /// ignore patterns.
    pub fn is_excluded(&self, name: &str) -> bool {
        name.eq_ignore_ascii_case(VCS_DIR) || self.config.should_ignore(name)
    }

    /// `bin` and `pkg` match in any case so that every path the classifier
    /// calls `go` reaches the disambiguator as a whole directory.
    pub fn is_dir_candidate(&self, name: &str) -> bool {
        self.dirs.contains(name) || is_ambiguous_name(name)
    }

    pub fn is_file_candidate(&self, name: &str) -> bool {
        self.files.is_match(name)
    }

    /// Match an entry name against the tables.
    pub fn match_entry(&self, name: &str, is_dir: bool) -> Option<CandidateShape> {
        if self.is_excluded(name) {
            return None;
        }
        if is_dir {
            self.is_dir_candidate(name).then_some(CandidateShape::Directory)
        } else {
            self.is_file_candidate(name).then_some(CandidateShape::File)
        }
    }
}

/// Whether a directory name needs the Go disambiguator before acceptance.
pub fn is_ambiguous_name(name: &str) -> bool {
    AMBIGUOUS_DIRS
        .iter()
        .any(|dir| name.eq_ignore_ascii_case(dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns() -> Patterns {
        Patterns::new(&ScanConfig::new("/r")).unwrap()
    }

    #[test]
    fn test_dir_patterns() {
        let p = patterns();
        for name in ["node_modules", "DerivedData", "target", "CMakeFiles", "bin", "pkg", ".codex"] {
            assert_eq!(p.match_entry(name, true), Some(CandidateShape::Directory), "{name}");
        }
        assert_eq!(p.match_entry("src", true), None);
        // directory names only match directories
        assert_eq!(p.match_entry("node_modules", false), None);
    }

    #[test]
    fn test_file_patterns() {
        let p = patterns();
        for name in ["server.log", ".DS_Store", "me.xcuserstate", "mod.pyc", "CMakeCache.txt"] {
            assert_eq!(p.match_entry(name, false), Some(CandidateShape::File), "{name}");
        }
        assert_eq!(p.match_entry("main.go", false), None);
        assert_eq!(p.match_entry("logs", false), None);
    }

    #[test]
    fn test_git_is_always_excluded() {
        let p = patterns();
        assert!(p.is_excluded(".git"));
        assert!(p.is_excluded(".GIT"));
        assert_eq!(p.match_entry(".git", true), None);
        assert!(!p.is_excluded(".github"));
    }

    #[test]
    fn test_config_extras_and_ignores() {
        let config = ScanConfig::builder()
            .root("/r")
            .extra_dir_patterns(vec!["out".to_string()])
            .ignore_patterns(vec!["vendor".to_string()])
            .build()
            .unwrap();
        let p = Patterns::new(&config).unwrap();
        assert!(p.is_dir_candidate("out"));
        assert!(p.is_excluded("vendor"));
    }

    #[test]
    fn test_ambiguous_names() {
        assert!(is_ambiguous_name("bin"));
        assert!(is_ambiguous_name("pkg"));
        assert!(is_ambiguous_name("Bin"));
        assert!(is_ambiguous_name("PKG"));
        assert!(!is_ambiguous_name("build"));
        assert!(!is_ambiguous_name("binaries"));

        let p = patterns();
        assert_eq!(p.match_entry("Bin", true), Some(CandidateShape::Directory));
        assert_eq!(p.match_entry("Build", true), None);
    }
}
