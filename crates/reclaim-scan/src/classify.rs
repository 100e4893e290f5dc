//! Path-to-kind classification.
//!
//! A pure function of the root-relative path string. Rules are tried in a
//! fixed order and the first match wins; every path gets exactly one kind.

use std::path::Path;

use reclaim_core::ArtifactKind;

/// One classification rule.
#[derive(Debug, Clone, Copy)]
enum Rule {
    /// Substring anywhere in the path.
    Contains(&'static str),
    /// Path suffix.
    EndsWith(&'static str),
    /// Whole path segment: `/<seg>` at the end or `/<seg>/` inside.
    Segment(&'static str),
    /// Exact final segment.
    Name(&'static str),
}

impl Rule {
    /// `path` is lowercased and prefixed with `/`.
    fn matches(self, path: &str) -> bool {
        match self {
            Rule::Contains(needle) => path.contains(needle),
            Rule::EndsWith(suffix) => path.ends_with(suffix),
            Rule::Segment(seg) => {
                let tail = format!("/{seg}");
                path.ends_with(&tail) || path.contains(&format!("{tail}/"))
            }
            Rule::Name(name) => path.rsplit('/').next() == Some(name),
        }
    }
}

const RULES: &[(ArtifactKind, &[Rule])] = &[
    (ArtifactKind::Node, &[Rule::Contains("node_modules")]),
    (
        ArtifactKind::Swift,
        &[
            Rule::Contains(".build"),
            Rule::Contains("deriveddata"),
            Rule::Contains("xcuserdata"),
            Rule::EndsWith(".xcuserstate"),
        ],
    ),
    (
        ArtifactKind::Python,
        &[
            Rule::Contains("__pycache__"),
            Rule::Contains(".pytest_cache"),
            Rule::Contains(".mypy_cache"),
            Rule::EndsWith(".pyc"),
        ],
    ),
    (ArtifactKind::Rust, &[Rule::Segment("target")]),
    (ArtifactKind::Go, &[Rule::Segment("bin"), Rule::Segment("pkg")]),
    (ArtifactKind::Cpp, &[Rule::Contains("cmake")]),
    (
        ArtifactKind::Codex,
        &[Rule::Contains(".codex"), Rule::Contains(".agent")],
    ),
    (
        ArtifactKind::File,
        &[
            Rule::EndsWith(".log"),
            Rule::Name(".ds_store"),
            Rule::EndsWith(".pyc"),
            Rule::Name("cmakecache.txt"),
        ],
    ),
];

/// Classify a root-relative candidate path.
pub fn classify(relative: &Path) -> ArtifactKind {
    let normalized = normalize(relative);
    RULES
        .iter()
        .find(|(_, rules)| rules.iter().any(|rule| rule.matches(&normalized)))
        .map(|(kind, _)| *kind)
        .unwrap_or(ArtifactKind::Folder)
}

fn normalize(relative: &Path) -> String {
    let mut out = String::new();
    for component in relative.components() {
        out.push('/');
        out.push_str(&component.as_os_str().to_string_lossy().to_lowercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(path: &str) -> ArtifactKind {
        classify(Path::new(path))
    }

    #[test]
    fn test_each_kind() {
        assert_eq!(kind("web/node_modules"), ArtifactKind::Node);
        assert_eq!(kind("App/.build"), ArtifactKind::Swift);
        assert_eq!(kind("ios/DerivedData"), ArtifactKind::Swift);
        assert_eq!(kind("App.xcodeproj/xcuserdata"), ArtifactKind::Swift);
        assert_eq!(kind("App.xcworkspace/me.xcuserstate"), ArtifactKind::Swift);
        assert_eq!(kind("pkg_a/__pycache__"), ArtifactKind::Python);
        assert_eq!(kind(".pytest_cache"), ArtifactKind::Python);
        assert_eq!(kind("svc/.mypy_cache"), ArtifactKind::Python);
        assert_eq!(kind("lib/mod.pyc"), ArtifactKind::Python);
        assert_eq!(kind("target"), ArtifactKind::Rust);
        assert_eq!(kind("crates/x/target"), ArtifactKind::Rust);
        assert_eq!(kind("bin"), ArtifactKind::Go);
        assert_eq!(kind("tools/pkg"), ArtifactKind::Go);
        assert_eq!(kind("native/CMakeFiles"), ArtifactKind::Cpp);
        assert_eq!(kind("CMakeCache.txt"), ArtifactKind::Cpp);
        assert_eq!(kind(".codex"), ArtifactKind::Codex);
        assert_eq!(kind("x/.agent"), ArtifactKind::Codex);
        assert_eq!(kind("logs/server.log"), ArtifactKind::File);
        assert_eq!(kind(".DS_Store"), ArtifactKind::File);
        assert_eq!(kind("dist"), ArtifactKind::Folder);
        assert_eq!(kind("web/build"), ArtifactKind::Folder);
        assert_eq!(kind(".cache"), ArtifactKind::Folder);
    }

    #[test]
    fn test_first_match_wins() {
        // node_modules outranks everything below it
        assert_eq!(kind("target/node_modules"), ArtifactKind::Node);
        // python outranks the generic file rule for .pyc
        assert_eq!(kind("a.pyc"), ArtifactKind::Python);
        // rust outranks go
        assert_eq!(kind("bin/target"), ArtifactKind::Rust);
    }

    #[test]
    fn test_segment_rules_need_whole_segment() {
        assert_eq!(kind("targets"), ArtifactKind::Folder);
        assert_eq!(kind("cabin/dist"), ArtifactKind::Folder);
        assert_eq!(kind("pkgs/build"), ArtifactKind::Folder);
        assert_eq!(kind("bin/dist"), ArtifactKind::Go);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(kind("Web/NODE_MODULES"), ArtifactKind::Node);
        assert_eq!(kind("Target"), ArtifactKind::Rust);
        assert_eq!(kind("Build.LOG"), ArtifactKind::File);
    }

    #[test]
    fn test_deterministic() {
        for path in ["a/b/c", "node_modules", "x/.DS_Store"] {
            assert_eq!(kind(path), kind(path));
        }
    }
}
