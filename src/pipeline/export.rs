//! Export reading: load and decode a Scrapbox project export.
//!
//! The export is read once, up front. Anything wrong with it (missing file,
//! unreadable, not JSON, wrong shape) is fatal and stops the migration before
//! the first post is sent.
//!
//! Scrapbox offers two export flavours. The plain one stores each line as a
//! string; "export with metadata" stores each line as an object carrying its
//! text plus author and timestamps. Both decode to the same [`Page::lines`].

use crate::error::MigrateError;
use serde::{Deserialize, Deserializer};
use std::path::Path;
use tracing::{debug, info};

/// A decoded Scrapbox project export.
#[derive(Debug, Clone, Deserialize)]
pub struct Export {
    /// Project name (URL slug).
    #[serde(default)]
    pub name: String,
    /// Human-readable project name.
    #[serde(default, rename = "displayName")]
    pub display_name: String,
    /// Export time, epoch seconds.
    #[serde(default)]
    pub exported: i64,
    /// Pages in export order.
    pub pages: Vec<Page>,
}

/// One wiki page.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub title: String,
    /// Creation time, epoch seconds.
    #[serde(default)]
    pub created: i64,
    /// Last update time, epoch seconds.
    #[serde(default)]
    pub updated: i64,
    /// Raw lines in Scrapbox markup. The first one restates the title.
    #[serde(default, deserialize_with = "deserialize_lines")]
    pub lines: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLine {
    Text(String),
    WithMetadata { text: String },
}

fn deserialize_lines<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<RawLine>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|line| match line {
            RawLine::Text(text) | RawLine::WithMetadata { text } => text,
        })
        .collect())
}

/// Read and decode the export at `path`.
pub fn read_export(path: impl AsRef<Path>) -> Result<Export, MigrateError> {
    let path = path.as_ref();

    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(MigrateError::ExportNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(MigrateError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(MigrateError::ExportUnreadable {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    debug!("Read {} bytes from {}", raw.len(), path.display());

    let export = parse_export(&raw).map_err(|e| MigrateError::MalformedExport {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    info!(
        project = %export.name,
        display_name = %export.display_name,
        exported = export.exported,
        "Loaded export with {} pages",
        export.pages.len()
    );
    Ok(export)
}

/// Decode an export from a JSON string.
pub fn parse_export(json: &str) -> Result<Export, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_export() {
        let json = r#"{
            "name": "team-wiki",
            "displayName": "Team Wiki",
            "exported": 1600000000,
            "pages": [
                {"title": "Overview", "created": 1500000000, "updated": 1500000100,
                 "lines": ["Overview", " item"]}
            ]
        }"#;
        let export = parse_export(json).unwrap();
        assert_eq!(export.name, "team-wiki");
        assert_eq!(export.display_name, "Team Wiki");
        assert_eq!(export.exported, 1_600_000_000);
        assert_eq!(export.pages.len(), 1);
        let page = &export.pages[0];
        assert_eq!(page.title, "Overview");
        assert_eq!(page.created, 1_500_000_000);
        assert_eq!(page.updated, 1_500_000_100);
        assert_eq!(page.lines, vec!["Overview", " item"]);
    }

    #[test]
    fn test_parse_export_with_line_metadata() {
        let json = r#"{"pages": [{"title": "T", "lines": [
            {"text": "T", "created": 1, "updated": 2, "userId": "u1"},
            {"text": " child", "created": 3, "updated": 4, "userId": "u1"}
        ]}]}"#;
        let export = parse_export(json).unwrap();
        assert_eq!(export.pages[0].lines, vec!["T", " child"]);
    }

    #[test]
    fn test_optional_fields_default() {
        let export = parse_export(r#"{"pages": [{"title": "Empty"}]}"#).unwrap();
        assert_eq!(export.name, "");
        assert_eq!(export.pages[0].created, 0);
        assert!(export.pages[0].lines.is_empty());
    }

    #[test]
    fn test_missing_pages_is_an_error() {
        assert!(parse_export(r#"{"name": "x"}"#).is_err());
    }

    #[test]
    fn test_not_json_is_an_error() {
        assert!(parse_export("not json").is_err());
    }

    #[test]
    fn test_wrong_line_type_is_an_error() {
        assert!(parse_export(r#"{"pages": [{"title": "T", "lines": [42]}]}"#).is_err());
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_export("/definitely/not/a/real/export.json").unwrap_err();
        assert!(matches!(err, MigrateError::ExportNotFound { .. }), "got: {err:?}");
    }
}
