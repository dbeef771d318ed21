//! Common types used across esdump

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ordered field map carried as a record's body.
pub type Source = Map<String, Value>;

/// One transferable document.
///
/// The serialized shape is the hit shape a cluster returns from `_search`
/// (`_index`, `_id`, `_source`), which is also the line format of backup files.
/// A record is never mutated once it has been read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Empty when a backup line omits it; restores write to their own index
    #[serde(rename = "_index", default)]
    pub index: String,

    /// Legacy mapping type, only present on clusters that still report one
    #[serde(rename = "_type", default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,

    #[serde(rename = "_id")]
    pub id: String,

    #[serde(rename = "_source", default)]
    pub source: Source,
}

impl Record {
    pub fn new(index: impl Into<String>, id: impl Into<String>, source: Source) -> Self {
        Self {
            index: index.into(),
            doc_type: None,
            id: id.into(),
            source,
        }
    }

    /// Compact JSON, newline-terminated
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }

    /// Parse one line of a backup file
    ///
    /// Takes raw bytes so that invalid UTF-8 is a parse error like any other.
    pub fn from_json_line(line: impl AsRef<[u8]>) -> serde_json::Result<Self> {
        serde_json::from_slice(line.as_ref().trim_ascii_end())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source(value: Value) -> Source {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_json_line_shape() {
        let record = Record::new("logs", "1", source(json!({"msg": "hi", "n": 3})));
        let line = record.to_json_line().unwrap();

        assert_eq!(
            line,
            "{\"_index\":\"logs\",\"_id\":\"1\",\"_source\":{\"msg\":\"hi\",\"n\":3}}\n"
        );
    }

    #[test]
    fn test_field_order_is_kept() {
        let record = Record::new("logs", "1", source(json!({"zeta": 1, "alpha": 2, "mid": 3})));
        let line = record.to_json_line().unwrap();

        let zeta = line.find("zeta").unwrap();
        let alpha = line.find("alpha").unwrap();
        let mid = line.find("mid").unwrap();
        assert!(zeta < alpha && alpha < mid);
    }

    #[test]
    fn test_parse_hit_with_type() {
        let line = r#"{"_index":"old","_type":"_doc","_id":"7","_source":{"nested":{"a":[1,2]}}}"#;
        let record = Record::from_json_line(line).unwrap();

        assert_eq!(record.index, "old");
        assert_eq!(record.doc_type.as_deref(), Some("_doc"));
        assert_eq!(record.id, "7");
        assert_eq!(record.source["nested"], json!({"a": [1, 2]}));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Record::from_json_line("not json").is_err());
        assert!(Record::from_json_line(r#"{"_index":"x"}"#).is_err());
        assert!(Record::from_json_line(b"{\"_id\":\"\xff\xfe\",\"_source\":{}}").is_err());
    }

    #[test]
    fn test_parse_without_index() {
        let record = Record::from_json_line(r#"{"_id":"9","_source":{"a":1}}"#).unwrap();

        assert_eq!(record.index, "");
        assert_eq!(record.id, "9");
        assert_eq!(record.source["a"], json!(1));
    }
}
