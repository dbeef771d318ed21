//! Record destinations
//!
//! The destination is chosen once, when the job is resolved, and never
//! re-checked per record.

mod cluster;
mod file;

pub use cluster::ClusterSink;
pub use file::FileSink;

use esdump_common::{Record, Result};

/// Where workers apply records
pub enum Sink {
    File(FileSink),
    Cluster(ClusterSink),
}

impl Sink {
    /// Apply one record. Safe to call from many workers at once.
    pub async fn write(&self, record: &Record) -> Result<()> {
        match self {
            Sink::File(sink) => sink.write(record).await,
            Sink::Cluster(sink) => sink.write(record).await,
        }
    }

    /// Flush whatever is buffered. Called once, after every worker stopped.
    pub async fn close(&self) -> Result<()> {
        match self {
            Sink::File(sink) => sink.close().await,
            Sink::Cluster(_) => Ok(()),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Sink::File(sink) => sink.path().display().to_string(),
            Sink::Cluster(sink) => format!("index {}", sink.index()),
        }
    }
}

impl From<FileSink> for Sink {
    fn from(sink: FileSink) -> Self {
        Sink::File(sink)
    }
}

impl From<ClusterSink> for Sink {
    fn from(sink: ClusterSink) -> Self {
        Sink::Cluster(sink)
    }
}
