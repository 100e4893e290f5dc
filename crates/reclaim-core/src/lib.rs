//! Core types for reclaim.
//!
//! This crate holds the data model shared by the scanner, the deletion
//! executor and any external consumer of scan reports: artifacts and their
//! kinds, the root boundary, the versioned text report protocol, size units
//! and the error types.

mod artifact;
mod config;
mod error;
mod escape;
mod report;
mod size;

pub use artifact::{Artifact, ArtifactKind, Mode, Root, has_vcs_segment};
pub use config::{ScanConfig, ScanConfigBuilder};
pub use error::{CleanError, ScanWarning, UnsafeReason, WarningKind};
pub use escape::{decode_path, encode_path, round_trips};
pub use report::{
    FOUND_HEADER, PROJECT_SIZE_PREFIX, REPORT_VERSION, ROOT_PREFIX, SKIPPED_HEADER, ScanReport,
    TOTAL_PREFIX, VERSION_PREFIX, parse_report,
};
pub use size::{HumanSize, SizeParseError, SizeUnit};
