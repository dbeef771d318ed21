//! Input and output targets
//!
//! A target string is either a cluster URL (`http://host:9200/index`) or a
//! file path. The decision is made once, here, and carried as a variant.

use esdump_common::{DumpError, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use url::{Position, Url};

/// Where records come from or go to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    File(PathBuf),
    Cluster(ClusterTarget),
}

/// A cluster address with an optional index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterTarget {
    /// Scheme, credentials, host, port and any path prefix, without trailing slash
    pub base_url: String,
    /// Last non-empty path segment, if any
    pub index: Option<String>,
}

impl ClusterTarget {
    /// The index, or an error naming what was missing
    pub fn require_index(&self, role: &str) -> Result<&str> {
        self.index.as_deref().ok_or_else(|| {
            let shown = redact_password(&self.base_url);
            DumpError::invalid_target(
                shown.as_str(),
                format!("{} URL must name an index, e.g. {}/my-index", role, shown),
            )
        })
    }
}

/// `url` with any password replaced by `***`, for printing and logging
///
/// Strings that don't parse as URLs are returned unchanged.
pub fn redact_password(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) if parsed.password().is_some() => {
            if parsed.set_password(Some("***")).is_err() {
                return url.to_string();
            }
            parsed.as_str().trim_end_matches('/').to_string()
        },
        _ => url.to_string(),
    }
}

impl FromStr for Target {
    type Err = DumpError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DumpError::invalid_target(s, "target is empty"));
        }

        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Ok(Target::File(PathBuf::from(trimmed)));
        }

        let url = Url::parse(trimmed).map_err(|e| DumpError::invalid_target(s, e.to_string()))?;

        let mut segments: Vec<String> = url
            .path_segments()
            .map(|parts| {
                parts
                    .filter(|part| !part.is_empty())
                    .map(|part| {
                        urlencoding::decode(part)
                            .map(|decoded| decoded.into_owned())
                            .unwrap_or_else(|_| part.to_string())
                    })
                    .collect()
            })
            .unwrap_or_default();

        let index = segments.pop();

        let mut base_url = url[..Position::BeforePath].to_string();
        for segment in &segments {
            base_url.push('/');
            base_url.push_str(segment);
        }

        Ok(Target::Cluster(ClusterTarget { base_url, index }))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::File(path) => write!(f, "{}", path.display()),
            Target::Cluster(cluster) => {
                let base_url = redact_password(&cluster.base_url);
                match &cluster.index {
                    Some(index) => write!(f, "{}/{}", base_url, index),
                    None => write!(f, "{}", base_url),
                }
            },
        }
    }
}
