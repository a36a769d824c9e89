//! Timeline documents
//!
//! A document is TOML (default) or JSON (`.json` extension) with the window,
//! the resource rows, the allocations and an optional `layout` table:
//!
//! ```toml
//! start = "2024-03-05T00:00:00"
//! end = "2024-03-06T00:00:00"
//! resources = ["gpu-0", "gpu-1"]
//!
//! [layout]
//! width = 1024
//!
//! [[allocations]]
//! name = "training"
//! owner = "alice"
//! resources = ["gpu-0", "gpu-1"]
//! begin = "2024-03-05T08:00:00"
//! end = "2024-03-05T12:00:00"
//! share_type = "exclusive"
//! ```

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use restime_core::{Allocation, LayoutResult, ResourceList, TimeRange, Timeline};
use restime_layout::LayoutConfig;
use serde::Deserialize;
use std::path::Path;

/// A parsed, not yet validated, timeline document
#[derive(Debug, Deserialize)]
pub struct TimelineDocument {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default)]
    pub allocations: Vec<Allocation>,
    #[serde(default)]
    pub layout: LayoutConfig,
}

impl TimelineDocument {
    /// Parse TOML or JSON text
    pub fn parse(input: &str, format: DocumentFormat) -> Result<Self> {
        match format {
            DocumentFormat::Toml => toml::from_str(input).context("invalid TOML timeline"),
            DocumentFormat::Json => serde_json::from_str(input).context("invalid JSON timeline"),
        }
    }

    /// Read and parse a document, picking the format from the extension
    pub fn load(path: &Path) -> Result<Self> {
        let input = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&input, DocumentFormat::from_path(path))
            .with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Build the validated timeline and its layout settings
    pub fn into_timeline(self) -> LayoutResult<(Timeline, LayoutConfig)> {
        let range = TimeRange::new(self.start, self.end)?;
        let resources = ResourceList::new(self.resources)?;
        let mut timeline = Timeline::new(range, resources);
        timeline.allocations = self.allocations;
        timeline.validate()?;
        Ok((timeline, self.layout))
    }
}

/// Supported document encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Toml,
    Json,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => DocumentFormat::Json,
            _ => DocumentFormat::Toml,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restime_core::{LayoutError, ShareType};

    const SAMPLE: &str = r#"
start = "2024-03-05T00:00:00"
end = "2024-03-06T00:00:00"
resources = ["gpu-0", "gpu-1"]

[layout]
width = 1024

[[allocations]]
name = "training"
owner = "alice"
resources = ["gpu-0", "gpu-1"]
begin = "2024-03-05T08:00:00"
end = "2024-03-05T12:00:00"

[[allocations]]
name = "eval"
resources = ["gpu-1"]
begin = "2024-03-05T13:00:00"
end = "2024-03-05T14:30:00"
share_type = "planned"
"#;

    #[test]
    fn parses_toml_document() {
        let doc = TimelineDocument::parse(SAMPLE, DocumentFormat::Toml).unwrap();
        assert_eq!(doc.layout.width, 1024.0);
        assert_eq!(doc.layout.height, 600.0);

        let (timeline, _) = doc.into_timeline().unwrap();
        assert_eq!(timeline.resources.len(), 2);
        assert_eq!(timeline.allocations.len(), 2);
        assert_eq!(timeline.allocations[0].share_type, ShareType::Exclusive);
        assert_eq!(timeline.allocations[1].share_type, ShareType::Planned);
        assert_eq!(timeline.allocations[1].owner, "");
    }

    #[test]
    fn parses_json_document() {
        let json = r#"{
            "start": "2024-03-05T00:00:00",
            "end": "2024-03-05T06:00:00",
            "resources": ["a"],
            "allocations": [
                {"name": "x", "resources": ["a"],
                 "begin": "2024-03-05T01:00:00", "end": "2024-03-05T02:00:00"}
            ]
        }"#;
        let doc = TimelineDocument::parse(json, DocumentFormat::Json).unwrap();
        let (timeline, config) = doc.into_timeline().unwrap();
        assert_eq!(timeline.allocations[0].name, "x");
        assert_eq!(config, LayoutConfig::default());
    }

    #[test]
    fn unknown_resource_fails_validation() {
        let toml = SAMPLE.replace(r#"resources = ["gpu-1"]"#, r#"resources = ["tpu-9"]"#);
        let doc = TimelineDocument::parse(&toml, DocumentFormat::Toml).unwrap();
        assert_eq!(
            doc.into_timeline().unwrap_err(),
            LayoutError::UnknownResource("tpu-9".into())
        );
    }

    #[test]
    fn reversed_window_fails_validation() {
        let toml = SAMPLE.replace(
            r#"end = "2024-03-06T00:00:00""#,
            r#"end = "2024-03-04T00:00:00""#,
        );
        let doc = TimelineDocument::parse(&toml, DocumentFormat::Toml).unwrap();
        assert!(matches!(
            doc.into_timeline(),
            Err(LayoutError::InvalidTimeRange { .. })
        ));
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("plan.json")),
            DocumentFormat::Json
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("plan.toml")),
            DocumentFormat::Toml
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("plan")),
            DocumentFormat::Toml
        );
    }
}
