//! Scan configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Configuration for one scan.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Root directory to scan. Canonicalized when the scan starts.
    pub root: PathBuf,

    /// Report byte lengths instead of allocated disk blocks.
    #[builder(default = "false")]
    #[serde(default)]
    pub apparent_size: bool,

    /// Extra directory names reported as generic `folder` artifacts.
    #[builder(default)]
    #[serde(default)]
    pub extra_dir_patterns: Vec<String>,

    /// Names never descended into nor reported (`.git` is always excluded).
    #[builder(default)]
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.root {
            Some(ref root) if root.as_os_str().is_empty() => {
                Err("Root path cannot be empty".to_string())
            }
            Some(_) => Ok(()),
            None => Err("Root path is required".to_string()),
        }
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a default config for scanning a path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            apparent_size: false,
            extra_dir_patterns: Vec::new(),
            ignore_patterns: Vec::new(),
        }
    }

    /// Check if an entry name matches one of the ignore patterns.
    ///
    /// Patterns are exact names, `prefix*` or `*suffix`.
    pub fn should_ignore(&self, name: &str) -> bool {
        self.ignore_patterns.iter().any(|pattern| {
            if let Some(prefix) = pattern.strip_suffix('*') {
                name.starts_with(prefix)
            } else if let Some(suffix) = pattern.strip_prefix('*') {
                name.ends_with(suffix)
            } else {
                name == pattern
            }
        })
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
