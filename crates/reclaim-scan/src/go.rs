//! Disambiguation of `bin` and `pkg` directories.
//!
//! Both names are common across ecosystems: compiled output in many build
//! systems, but also hand-written source (scripts in `bin/`, library code in
//! `pkg/`). A candidate is only accepted when it sits next to a `go.mod` and
//! its contents look like Go build output:
//!
//! - `bin`: no source-script files and at least one executable file.
//! - `pkg`: contains a `mod` or `sumdb` directory (module cache layout).
//!
//! Anything else, including an unreadable subtree, is skipped for manual
//! review. The heuristic is approximate and must not be tightened into
//! silent deletion or silent dropping.

use std::path::Path;

use jwalk::{Parallelism, WalkDir};
use strum::Display;
use tracing::debug;

use crate::meta;

/// Extensions of hand-written scripts that must never sit in a deletable `bin`.
pub const SCRIPT_EXTENSIONS: &[&str] = &[
    "sh", "py", "js", "ts", "rb", "pl", "zsh", "fish", "command",
];

/// Directory names that mark a Go module cache inside `pkg`.
pub const MODULE_CACHE_DIRS: &[&str] = &["mod", "sumdb"];

/// Outcome of the disambiguator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoVerdict {
    /// Looks like Go build output; safe to report as an artifact.
    Accept,
    /// Not provably build output; record for manual review.
    Skip(AmbiguityReason),
}

impl GoVerdict {
    pub fn is_accept(self) -> bool {
        self == GoVerdict::Accept
    }
}

/// Why a candidate was left for manual review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum AmbiguityReason {
    #[strum(to_string = "no go.mod next to it")]
    NoGoModule,
    #[strum(to_string = "contains script files")]
    ScriptsPresent,
    #[strum(to_string = "contains no executable files")]
    NoExecutable,
    #[strum(to_string = "does not look like a module cache")]
    NotModuleCache,
    #[strum(to_string = "name is neither bin nor pkg")]
    UnexpectedName,
    #[strum(to_string = "contents could not be read")]
    Unreadable,
}

/// Decide whether the directory at `path` is Go build output.
pub fn check(path: &Path) -> GoVerdict {
    let verdict = evaluate(path);
    debug!(path = %path.display(), ?verdict, "go disambiguation");
    verdict
}

fn evaluate(path: &Path) -> GoVerdict {
    let has_go_mod = path
        .parent()
        .map(|parent| parent.join("go.mod").is_file())
        .unwrap_or(false);
    if !has_go_mod {
        return GoVerdict::Skip(AmbiguityReason::NoGoModule);
    }

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_ascii_lowercase);
    match name.as_deref() {
        Some("bin") => check_bin(path),
        Some("pkg") => check_pkg(path),
        _ => GoVerdict::Skip(AmbiguityReason::UnexpectedName),
    }
}

fn check_bin(path: &Path) -> GoVerdict {
    let mut has_executable = false;

    for entry in walk(path) {
        let Ok(entry) = entry else {
            return GoVerdict::Skip(AmbiguityReason::Unreadable);
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if is_script(&entry.file_name().to_string_lossy()) {
            return GoVerdict::Skip(AmbiguityReason::ScriptsPresent);
        }
        match entry.metadata() {
            Ok(metadata) => has_executable |= meta::is_executable(&metadata),
            Err(_) => return GoVerdict::Skip(AmbiguityReason::Unreadable),
        }
    }

    if has_executable {
        GoVerdict::Accept
    } else {
        GoVerdict::Skip(AmbiguityReason::NoExecutable)
    }
}

fn check_pkg(path: &Path) -> GoVerdict {
    for entry in walk(path) {
        let Ok(entry) = entry else {
            return GoVerdict::Skip(AmbiguityReason::Unreadable);
        };
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if MODULE_CACHE_DIRS.contains(&name.as_ref()) {
            return GoVerdict::Accept;
        }
    }
    GoVerdict::Skip(AmbiguityReason::NotModuleCache)
}

fn walk(path: &Path) -> WalkDir {
    WalkDir::new(path)
        .parallelism(Parallelism::Serial)
        .skip_hidden(false)
        .follow_links(false)
        .sort(true)
}

/// Whether a file name ends in a source-script extension, matched the way
/// a `*.sh` glob would (so a bare `.sh` counts).
pub fn is_script(file_name: &str) -> bool {
    let name = file_name.to_ascii_lowercase();
    SCRIPT_EXTENSIONS.iter().any(|ext| {
        name.strip_suffix(ext)
            .is_some_and(|stem| stem.ends_with('.'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_script() {
        for name in ["run.sh", "tool.py", "a.JS", "b.ts", "x.rb", "y.pl", "z.zsh", "f.fish", "open.command", ".sh", ".PY"] {
            assert!(is_script(name), "{name}");
        }
        for name in ["server", "app.exe", "lib.so", "sh", "fresh", "bash"] {
            assert!(!is_script(name), "{name}");
        }
    }

    #[test]
    fn test_verdict_accept() {
        assert!(GoVerdict::Accept.is_accept());
        assert!(!GoVerdict::Skip(AmbiguityReason::NoGoModule).is_accept());
    }
}
