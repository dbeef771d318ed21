//! Index mapping and settings copies
//!
//! These are single request/response exchanges, no pagination and no workers.

use crate::client::ClusterClient;
use crate::job::JobKind;
use esdump_common::{DumpError, Result};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Settings the cluster assigns itself and refuses on PUT
const READ_ONLY_SETTINGS: &[&str] = &["uuid", "creation_date", "provided_name", "version"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataKind {
    Mapping,
    Settings,
}

impl MetadataKind {
    /// Only mapping and settings jobs have a metadata kind
    pub fn from_job(kind: JobKind) -> Option<Self> {
        match kind {
            JobKind::Data => None,
            JobKind::Mapping => Some(MetadataKind::Mapping),
            JobKind::Settings => Some(MetadataKind::Settings),
        }
    }

    /// Key under which GET nests the document
    fn envelope_key(self) -> &'static str {
        match self {
            MetadataKind::Mapping => "mappings",
            MetadataKind::Settings => "settings",
        }
    }
}

impl fmt::Display for MetadataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataKind::Mapping => f.write_str("mapping"),
            MetadataKind::Settings => f.write_str("settings"),
        }
    }
}

/// Fetch the document as the cluster returns it, envelope included
pub async fn fetch(client: &dyn ClusterClient, index: &str, kind: MetadataKind) -> Result<Value> {
    debug!(index, %kind, "Fetching index metadata");
    match kind {
        MetadataKind::Mapping => client.get_mapping(index).await,
        MetadataKind::Settings => client.get_settings(index).await,
    }
}

/// PUT a fetched (or restored) document onto `index`
pub async fn apply(client: &dyn ClusterClient, index: &str, kind: MetadataKind, document: Value) -> Result<()> {
    let mut body = unwrap_envelope(document, kind);
    if kind == MetadataKind::Settings {
        strip_read_only_settings(&mut body);
    }

    debug!(index, %kind, "Applying index metadata");
    match kind {
        MetadataKind::Mapping => client.put_mapping(index, &body).await,
        MetadataKind::Settings => client.put_settings(index, &body).await,
    }
}

/// `{"<index>": {"mappings": {...}}}` → `{...}`
///
/// A document without that shape is returned as is.
pub fn unwrap_envelope(document: Value, kind: MetadataKind) -> Value {
    let key = kind.envelope_key();
    match document {
        Value::Object(mut outer) if outer.len() == 1 => {
            let nested = outer
                .values_mut()
                .next()
                .and_then(Value::as_object_mut)
                .and_then(|inner| inner.remove(key));
            match nested {
                Some(body) => body,
                None => Value::Object(outer),
            }
        },
        other => other,
    }
}

/// Drop settings that only make sense on the index they came from
pub fn strip_read_only_settings(settings: &mut Value) {
    if let Some(index) = settings.get_mut("index").and_then(Value::as_object_mut) {
        for key in READ_ONLY_SETTINGS {
            index.remove(*key);
        }
    }
}

/// Write a metadata document as pretty JSON
pub async fn write_file(path: &Path, document: &Value) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut contents = serde_json::to_string_pretty(document)?;
    contents.push('\n');
    tokio::fs::write(path, contents).await?;
    Ok(())
}

pub async fn read_file(path: &Path) -> Result<Value> {
    let contents = tokio::fs::read_to_string(path).await?;
    serde_json::from_str(&contents).map_err(|e| {
        DumpError::config(format!("{} is not a JSON document: {}", path.display(), e))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_unwrap_mapping_envelope() {
        let fetched = json!({"logs": {"mappings": {"properties": {"msg": {"type": "text"}}}}});
        assert_eq!(
            unwrap_envelope(fetched, MetadataKind::Mapping),
            json!({"properties": {"msg": {"type": "text"}}})
        );
    }

    #[test]
    fn test_bare_document_passes_through() {
        let bare = json!({"properties": {"msg": {"type": "text"}}});
        assert_eq!(unwrap_envelope(bare.clone(), MetadataKind::Mapping), bare);

        let wrong_key = json!({"logs": {"settings": {}}});
        assert_eq!(unwrap_envelope(wrong_key.clone(), MetadataKind::Mapping), wrong_key);
    }

    #[test]
    fn test_read_only_settings_are_removed() {
        let fetched = json!({"logs": {"settings": {"index": {
            "number_of_replicas": "1",
            "uuid": "x1",
            "creation_date": "1700000000000",
            "provided_name": "logs",
            "version": {"created": "8110099"}
        }}}});

        let mut body = unwrap_envelope(fetched, MetadataKind::Settings);
        strip_read_only_settings(&mut body);

        assert_eq!(body, json!({"index": {"number_of_replicas": "1"}}));
    }

    #[tokio::test]
    async fn test_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("meta/logs.mapping.json");
        let document = json!({"logs": {"mappings": {"dynamic": false}}});

        write_file(&path, &document).await.unwrap();
        assert_eq!(read_file(&path).await.unwrap(), document);
    }

    #[tokio::test]
    async fn test_read_file_rejects_non_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(read_file(&path).await.unwrap_err(), DumpError::Config(_)));
    }
}
