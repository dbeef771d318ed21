//! Job configuration
//!
//! Raw requests (strings and signed integers, as they arrive from a command
//! line) are validated once into immutable jobs. Every setup error surfaces
//! here, before a connection is opened or a file is created.

use crate::target::{redact_password, Target};
use esdump_common::{DumpError, Record, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

// ============================================================================
// Job Defaults
// ============================================================================

/// Documents requested per page
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Write-back workers
pub const DEFAULT_CONCURRENCY: usize = 4;

/// What a job moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobKind {
    #[default]
    Data,
    Mapping,
    Settings,
}

impl FromStr for JobKind {
    type Err = DumpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "data" => Ok(JobKind::Data),
            "mapping" | "mappings" => Ok(JobKind::Mapping),
            "settings" => Ok(JobKind::Settings),
            _ => Err(DumpError::UnsupportedType(s.to_string())),
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobKind::Data => f.write_str("data"),
            JobKind::Mapping => f.write_str("mapping"),
            JobKind::Settings => f.write_str("settings"),
        }
    }
}

/// Encoding of records written to a file
///
/// Both names produce the same framing: one compact JSON object per line.
/// `json` is kept because it is the historical default of `transfer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Ndjson,
}

impl OutputFormat {
    pub fn encode(self, record: &Record) -> serde_json::Result<String> {
        match self {
            OutputFormat::Json | OutputFormat::Ndjson => record.to_json_line(),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = DumpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "ndjson" | "jsonl" => Ok(OutputFormat::Ndjson),
            _ => Err(DumpError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Ndjson => f.write_str("ndjson"),
        }
    }
}

/// Where a transfer writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    File(PathBuf),
    Cluster { base_url: String, index: String },
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::File(path) => write!(f, "{}", path.display()),
            Destination::Cluster { base_url, index } => {
                write!(f, "{}/{}", redact_password(base_url), index)
            },
        }
    }
}

/// Unvalidated transfer parameters
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub input: String,
    pub output: String,
    pub kind: String,
    pub limit: i64,
    pub concurrency: i64,
    pub format: String,
    pub page_size: i64,
}

impl Default for TransferRequest {
    fn default() -> Self {
        Self {
            input: String::new(),
            output: String::new(),
            kind: JobKind::Data.to_string(),
            limit: 0,
            concurrency: DEFAULT_CONCURRENCY as i64,
            format: OutputFormat::Json.to_string(),
            page_size: DEFAULT_PAGE_SIZE as i64,
        }
    }
}

/// A validated cluster-to-cluster or cluster-to-file job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferJob {
    pub kind: JobKind,
    pub source_url: String,
    pub source_index: String,
    pub destination: Destination,
    pub page_size: usize,
    pub concurrency: usize,
    /// 0 = unbounded
    pub limit: u64,
    pub format: OutputFormat,
}

impl TransferJob {
    pub fn resolve(request: TransferRequest) -> Result<Self> {
        let kind: JobKind = request.kind.parse()?;
        let format: OutputFormat = request.format.parse()?;
        let concurrency = positive("concurrency", request.concurrency)?;
        let page_size = positive("scroll size", request.page_size)?;
        let limit = u64::try_from(request.limit)
            .map_err(|_| DumpError::config(format!("limit must be 0 or more, got {}", request.limit)))?;

        let source = match request.input.parse::<Target>()? {
            Target::Cluster(cluster) => cluster,
            Target::File(path) => {
                return Err(DumpError::invalid_target(
                    path.display().to_string(),
                    "input must be a cluster URL; use restore to read a file",
                ))
            },
        };
        let source_index = source.require_index("input")?.to_string();

        let destination = match request.output.parse::<Target>()? {
            Target::File(path) => Destination::File(path),
            Target::Cluster(cluster) => Destination::Cluster {
                index: cluster.index.unwrap_or_else(|| source_index.clone()),
                base_url: cluster.base_url,
            },
        };

        Ok(Self {
            kind,
            source_url: source.base_url,
            source_index,
            destination,
            page_size,
            concurrency,
            limit,
            format,
        })
    }

    /// Source index as `url/index`, safe to print
    pub fn source_label(&self) -> String {
        format!("{}/{}", redact_password(&self.source_url), self.source_index)
    }
}

/// Unvalidated restore parameters
#[derive(Debug, Clone)]
pub struct RestoreRequest {
    pub input: String,
    pub output: String,
    pub kind: String,
    pub concurrency: i64,
}

impl Default for RestoreRequest {
    fn default() -> Self {
        Self {
            input: String::new(),
            output: String::new(),
            kind: JobKind::Data.to_string(),
            concurrency: DEFAULT_CONCURRENCY as i64,
        }
    }
}

/// A validated file-to-cluster job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreJob {
    pub kind: JobKind,
    pub input: PathBuf,
    pub destination_url: String,
    pub destination_index: String,
    pub concurrency: usize,
}

impl RestoreJob {
    pub fn resolve(request: RestoreRequest) -> Result<Self> {
        let kind: JobKind = request.kind.parse()?;
        let concurrency = positive("concurrency", request.concurrency)?;

        let input = match request.input.parse::<Target>()? {
            Target::File(path) => path,
            Target::Cluster(_) => {
                return Err(DumpError::invalid_target(
                    redact_password(&request.input),
                    "restore input must be a file; use transfer to copy between clusters",
                ))
            },
        };

        let destination = match request.output.parse::<Target>()? {
            Target::Cluster(cluster) => cluster,
            Target::File(path) => {
                return Err(DumpError::invalid_target(
                    path.display().to_string(),
                    "restore output must be a cluster URL",
                ))
            },
        };
        let destination_index = destination.require_index("output")?.to_string();

        Ok(Self {
            kind,
            input,
            destination_url: destination.base_url,
            destination_index,
            concurrency,
        })
    }

    /// Destination index as `url/index`, safe to print
    pub fn destination_label(&self) -> String {
        format!("{}/{}", redact_password(&self.destination_url), self.destination_index)
    }
}

fn positive(name: &str, value: i64) -> Result<usize> {
    usize::try_from(value)
        .ok()
        .filter(|v| *v >= 1)
        .ok_or_else(|| DumpError::config(format!("{} must be at least 1, got {}", name, value)))
}
