//! Scan report and its versioned text protocol.
//!
//! ```text
//! reclaim-report v1
//! Root: /home/me/project
//! Project size: 3.00 KiB
//!
//! Found for deletion:
//!   2.00 KiB  node  node_modules
//!   300.00 B  go  bin
//!
//! Total to delete: 2.29 KiB
//!
//! Skipped (ambiguous, review manually):
//!   tools/pkg
//! ```
//!
//! Header lines are delimiters, not display strings. An artifact line is a
//! two-space indent, the size value, one space, the unit token, two spaces,
//! the kind token, two spaces, and the rest of the line as the path. Path
//! fields are escaped (see [`encode_path`]) so a file name can never span
//! lines.

use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::artifact::{Artifact, ArtifactKind};
use crate::error::CleanError;
use crate::escape::{decode_path, encode_path};
use crate::size::HumanSize;

/// Current protocol version.
pub const REPORT_VERSION: u32 = 1;
/// First line prefix, followed by the version number.
pub const VERSION_PREFIX: &str = "reclaim-report v";
pub const ROOT_PREFIX: &str = "Root: ";
pub const PROJECT_SIZE_PREFIX: &str = "Project size: ";
pub const FOUND_HEADER: &str = "Found for deletion:";
pub const TOTAL_PREFIX: &str = "Total to delete: ";
pub const SKIPPED_HEADER: &str = "Skipped (ambiguous, review manually):";

const INDENT: &str = "  ";
const FIELD_SEP: &str = "  ";

/// The complete result of one scan. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    root: PathBuf,
    project_size_bytes: u64,
    artifacts: Vec<Artifact>,
    skipped_ambiguous: Vec<PathBuf>,
}

impl ScanReport {
    /// Build a report, putting artifacts into presentation order
    /// (descending size, then path case-insensitively) and sorting the
    /// skipped list.
    pub fn new(
        root: impl Into<PathBuf>,
        project_size_bytes: u64,
        mut artifacts: Vec<Artifact>,
        mut skipped_ambiguous: Vec<PathBuf>,
    ) -> Self {
        artifacts.sort_by(presentation_order);
        skipped_ambiguous.sort();
        skipped_ambiguous.dedup();
        Self {
            root: root.into(),
            project_size_bytes,
            artifacts,
            skipped_ambiguous,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn project_size_bytes(&self) -> u64 {
        self.project_size_bytes
    }

    /// Artifacts in presentation order.
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    /// Root-relative paths that need manual review.
    pub fn skipped_ambiguous(&self) -> &[PathBuf] {
        &self.skipped_ambiguous
    }

    /// Sum of all artifact sizes.
    pub fn total_bytes(&self) -> u64 {
        self.artifacts.iter().map(|a| a.size_bytes).sum()
    }

    /// Whether there is nothing to delete.
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Number of artifacts of a given kind.
    pub fn count_of(&self, kind: ArtifactKind) -> usize {
        self.artifacts.iter().filter(|a| a.kind == kind).count()
    }

    /// Render the text protocol form.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

fn presentation_order(a: &Artifact, b: &Artifact) -> Ordering {
    b.size_bytes
        .cmp(&a.size_bytes)
        .then_with(|| {
            a.display_path()
                .to_lowercase()
                .cmp(&b.display_path().to_lowercase())
        })
        .then_with(|| a.relative_path.cmp(&b.relative_path))
}

impl fmt::Display for ScanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{VERSION_PREFIX}{REPORT_VERSION}")?;
        writeln!(f, "{ROOT_PREFIX}{}", encode_path(&self.root))?;
        writeln!(
            f,
            "{PROJECT_SIZE_PREFIX}{}",
            HumanSize::from_bytes(self.project_size_bytes)
        )?;
        writeln!(f)?;
        writeln!(f, "{FOUND_HEADER}")?;
        for artifact in &self.artifacts {
            writeln!(
                f,
                "{INDENT}{}{FIELD_SEP}{}{FIELD_SEP}{}",
                HumanSize::from_bytes(artifact.size_bytes),
                artifact.kind,
                encode_path(&artifact.relative_path)
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{TOTAL_PREFIX}{}",
            HumanSize::from_bytes(self.total_bytes())
        )?;
        if !self.skipped_ambiguous.is_empty() {
            writeln!(f)?;
            writeln!(f, "{SKIPPED_HEADER}")?;
            for path in &self.skipped_ambiguous {
                writeln!(f, "{INDENT}{}", encode_path(path))?;
            }
        }
        Ok(())
    }
}

impl FromStr for ScanReport {
    type Err = CleanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_report(s)
    }
}

/// Line cursor that skips blank lines between sections and keeps 1-based
/// line numbers for error messages.
struct Lines<'a> {
    inner: std::iter::Peekable<std::iter::Enumerate<std::str::Lines<'a>>>,
    last: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.lines().enumerate().peekable(),
            last: 0,
        }
    }

    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        let (idx, line) = self.inner.next()?;
        self.last = idx + 1;
        Some((idx + 1, line))
    }

    fn skip_blank(&mut self) {
        while let Some((_, line)) = self.inner.peek() {
            if !line.trim().is_empty() {
                break;
            }
            self.next_line();
        }
    }

    fn peek(&mut self) -> Option<&'a str> {
        self.inner.peek().map(|(_, line)| *line)
    }

    /// Next line if it carries the item indent.
    fn next_indented(&mut self) -> Option<(usize, &'a str)> {
        match self.peek() {
            Some(line) if line.starts_with(INDENT) => self.next_line(),
            _ => None,
        }
    }

    /// Next non-blank line, which must start with `prefix`.
    fn expect_prefixed(&mut self, prefix: &str) -> Result<(usize, &'a str), CleanError> {
        self.skip_blank();
        match self.next_line() {
            Some((no, line)) => match line.strip_prefix(prefix) {
                Some(rest) => Ok((no, rest)),
                None => Err(CleanError::parse(
                    no,
                    format!("expected {:?}, found {line:?}", prefix.trim_end()),
                )),
            },
            None => Err(CleanError::parse(
                self.last + 1,
                format!("missing {:?} line", prefix.trim_end()),
            )),
        }
    }
}

/// Parse the text protocol back into a [`ScanReport`].
///
/// Sizes come back within the two-decimal rounding tolerance of their unit.
pub fn parse_report(text: &str) -> Result<ScanReport, CleanError> {
    let mut lines = Lines::new(text);

    let (no, version) = lines.expect_prefixed(VERSION_PREFIX)?;
    let version: u32 = version
        .trim()
        .parse()
        .map_err(|_| CleanError::parse(no, format!("invalid report version {version:?}")))?;
    if version != REPORT_VERSION {
        return Err(CleanError::parse(
            no,
            format!("unsupported report version {version}"),
        ));
    }

    let (no, root) = lines.expect_prefixed(ROOT_PREFIX)?;
    let root = decode_path(root).map_err(|e| CleanError::parse(no, e))?;
    if !root.is_absolute() {
        return Err(CleanError::parse(no, "root path must be absolute"));
    }

    let (no, project_size) = lines.expect_prefixed(PROJECT_SIZE_PREFIX)?;
    let project_size = parse_size(no, project_size)?;

    let (no, rest) = lines.expect_prefixed(FOUND_HEADER)?;
    if !rest.is_empty() {
        return Err(CleanError::parse(no, "unexpected text after section header"));
    }

    let mut artifacts = Vec::new();
    while let Some((no, line)) = lines.next_indented() {
        artifacts.push(parse_artifact_line(no, line)?);
    }

    let (no, total) = lines.expect_prefixed(TOTAL_PREFIX)?;
    parse_size(no, total)?;

    let mut skipped = Vec::new();
    lines.skip_blank();
    if lines.peek().is_some() {
        let (no, rest) = lines.expect_prefixed(SKIPPED_HEADER)?;
        if !rest.is_empty() {
            return Err(CleanError::parse(no, "unexpected text after section header"));
        }
        while let Some((no, line)) = lines.next_indented() {
            let path = &line[INDENT.len()..];
            if path.is_empty() {
                return Err(CleanError::parse(no, "empty skipped path"));
            }
            skipped.push(decode_path(path).map_err(|e| CleanError::parse(no, e))?);
        }
        lines.skip_blank();
        if let Some((no, line)) = lines.next_line() {
            return Err(CleanError::parse(no, format!("unexpected line {line:?}")));
        }
    }

    Ok(ScanReport::new(root, project_size, artifacts, skipped))
}

fn parse_size(line: usize, text: &str) -> Result<u64, CleanError> {
    text.parse::<HumanSize>()
        .map(|size| size.to_bytes())
        .map_err(|e| CleanError::parse(line, e.to_string()))
}

fn parse_artifact_line(no: usize, line: &str) -> Result<Artifact, CleanError> {
    let malformed = || CleanError::parse(no, format!("malformed artifact line {line:?}"));

    let body = line.strip_prefix(INDENT).ok_or_else(malformed)?;
    let (value, rest) = body.split_once(' ').ok_or_else(malformed)?;
    let (unit, rest) = rest.split_once(FIELD_SEP).ok_or_else(malformed)?;
    let (kind, path) = rest.split_once(FIELD_SEP).ok_or_else(malformed)?;

    let size = HumanSize::from_parts(value, unit).map_err(|e| CleanError::parse(no, e.to_string()))?;
    let kind: ArtifactKind = kind
        .parse()
        .map_err(|_| CleanError::parse(no, format!("unknown artifact kind {kind:?}")))?;

    let path = decode_path(path).map_err(|e| CleanError::parse(no, e))?;
    Artifact::new(path, size.to_bytes(), kind)
        .map_err(|e| CleanError::parse(no, format!("rejected artifact path: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ScanReport {
        ScanReport::new(
            "/work/project",
            3072,
            vec![
                Artifact::new("bin", 300, ArtifactKind::Go).unwrap(),
                Artifact::new("node_modules", 2048, ArtifactKind::Node).unwrap(),
            ],
            vec![PathBuf::from("tools/pkg")],
        )
    }

    #[test]
    fn test_render_layout() {
        let text = sample().render();
        let expected = "\
reclaim-report v1
Root: /work/project
Project size: 3.00 KiB

Found for deletion:
  2.00 KiB  node  node_modules
  300.00 B  go  bin

Total to delete: 2.29 KiB

Skipped (ambiguous, review manually):
  tools/pkg
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_without_skipped_section() {
        let report = ScanReport::new("/r", 0, Vec::new(), Vec::new());
        let text = report.render();
        assert!(text.ends_with("Total to delete: 0.00 B\n"));
        assert!(!text.contains(SKIPPED_HEADER));
    }

    #[test]
    fn test_ties_broken_case_insensitively() {
        let report = ScanReport::new(
            "/r",
            0,
            vec![
                Artifact::new("b/dist", 10, ArtifactKind::Folder).unwrap(),
                Artifact::new("A/dist", 10, ArtifactKind::Folder).unwrap(),
                Artifact::new("a/build", 10, ArtifactKind::Folder).unwrap(),
            ],
            Vec::new(),
        );
        let order: Vec<_> = report.artifacts().iter().map(|a| a.display_path()).collect();
        assert_eq!(order, vec!["a/build", "A/dist", "b/dist"]);
    }

    #[test]
    fn test_parse_roundtrip() {
        let report = sample();
        let parsed = parse_report(&report.render()).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_parse_keeps_spaces_in_paths() {
        let report = ScanReport::new(
            "/r",
            4096,
            vec![Artifact::new("my app/node_modules", 1024, ArtifactKind::Node).unwrap()],
            vec![PathBuf::from("odd  name/bin")],
        );
        let parsed: ScanReport = report.render().parse().unwrap();
        assert_eq!(parsed.artifacts()[0].display_path(), "my app/node_modules");
        assert_eq!(parsed.skipped_ambiguous()[0], PathBuf::from("odd  name/bin"));
    }

    #[test]
    fn test_parse_missing_size_line() {
        let text = "reclaim-report v1\nRoot: /r\n\nFound for deletion:\n";
        match parse_report(text) {
            Err(CleanError::Parse { line, .. }) => assert_eq!(line, 4),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_missing_total_line() {
        let text = "reclaim-report v1\nRoot: /r\nProject size: 1.00 KiB\n\nFound for deletion:\n  1.00 KiB  node  node_modules\n";
        assert!(matches!(parse_report(text), Err(CleanError::Parse { .. })));
    }

    #[test]
    fn test_parse_rejects_bad_tokens() {
        let base = |line: &str| {
            format!(
                "reclaim-report v1\nRoot: /r\nProject size: 1.00 KiB\n\nFound for deletion:\n{line}\n\nTotal to delete: 1.00 KiB\n"
            )
        };
        assert!(parse_report(&base("  1.00 KB  node  node_modules")).is_err());
        assert!(parse_report(&base("  1.00 KiB  java  target")).is_err());
        assert!(parse_report(&base("  1.00 KiB  node  ../escape")).is_err());
        assert!(parse_report(&base("  1.00 KiB node node_modules")).is_err());
    }

    #[test]
    fn test_parse_rejects_other_versions_and_relative_root() {
        let text = sample().render().replace("report v1", "report v2");
        assert!(matches!(
            parse_report(&text),
            Err(CleanError::Parse { line: 1, .. })
        ));
        let text = sample().render().replace("Root: /work/project", "Root: work/project");
        assert!(matches!(
            parse_report(&text),
            Err(CleanError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn test_parse_rejects_trailing_garbage() {
        let text = format!("{}\nsomething else\n", sample().render());
        assert!(parse_report(&text).is_err());
    }
}
