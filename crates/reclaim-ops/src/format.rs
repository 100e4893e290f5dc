//! Output forms of a scan report.

use reclaim_core::{CleanError, ScanReport};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How a report is written to the output stream.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReportFormat {
    /// The versioned text protocol.
    #[default]
    Text,
    /// The same report as JSON.
    Json,
}

impl ReportFormat {
    /// Render `report`, always ending with a newline.
    pub fn render(self, report: &ScanReport) -> Result<String, CleanError> {
        match self {
            Self::Text => Ok(report.render()),
            Self::Json => {
                let mut json = serde_json::to_string_pretty(report)
                    .map_err(|e| CleanError::io("<report>", std::io::Error::other(e)))?;
                json.push('\n');
                Ok(json)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reclaim_core::{Artifact, ArtifactKind};

    fn report() -> ScanReport {
        ScanReport::new(
            "/work/app",
            4096,
            vec![Artifact::new("node_modules", 2048, ArtifactKind::Node).unwrap()],
            Vec::new(),
        )
    }

    #[test]
    fn test_text_is_protocol() {
        let text = ReportFormat::Text.render(&report()).unwrap();
        assert!(text.starts_with("reclaim-report v1\n"));
    }

    #[test]
    fn test_json_round_trips() {
        let json = ReportFormat::Json.render(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["artifacts"][0]["kind"], "node");
        assert_eq!(value["artifacts"][0]["size_bytes"], 2048);

        let back: ScanReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report());
    }

    #[test]
    fn test_parse_format_name() {
        assert_eq!("json".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!(ReportFormat::default().to_string(), "text");
    }
}
