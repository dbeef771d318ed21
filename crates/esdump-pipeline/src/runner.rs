//! Job execution
//!
//! Turns a resolved job into a concrete source and sink, then either runs the
//! pipeline (data) or a single metadata exchange (mapping, settings).

use crate::client::Connector;
use crate::extractor::CursorExtractor;
use crate::job::{Destination, RestoreJob, TransferJob, DEFAULT_PAGE_SIZE};
use crate::metadata::{self, MetadataKind};
use crate::pipeline::{Pipeline, TransferReport};
use crate::progress::Progress;
use crate::restore::FileRecordSource;
use crate::sink::{ClusterSink, FileSink, Sink};
use esdump_common::Result;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// What a finished job did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Records(TransferReport),
    Metadata { kind: MetadataKind, destination: String },
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobOutcome::Records(report) => write!(f, "{}", report),
            JobOutcome::Metadata { kind, destination } => {
                write!(f, "Copied {} to {}", kind, destination)
            },
        }
    }
}

/// Runs transfer and restore jobs against clusters opened by a [`Connector`]
pub struct Runner {
    connector: Arc<dyn Connector>,
    progress: Progress,
    cancel: CancellationToken,
}

impl Runner {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self {
            connector,
            progress: Progress::new(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn progress(&self) -> Progress {
        self.progress.clone()
    }

    /// Cluster index to another index or to a file
    pub async fn transfer(&self, job: &TransferJob) -> Result<JobOutcome> {
        let source = self.connector.connect(&job.source_url)?;

        if let Some(kind) = MetadataKind::from_job(job.kind) {
            let document = metadata::fetch(source.as_ref(), &job.source_index, kind).await?;
            match &job.destination {
                Destination::File(path) => metadata::write_file(path, &document).await?,
                Destination::Cluster { base_url, index } => {
                    let destination = self.connector.connect(base_url)?;
                    metadata::apply(destination.as_ref(), index, kind, document).await?;
                },
            }
            info!(%kind, index = %job.source_index, destination = %job.destination, "Copied index metadata");
            return Ok(JobOutcome::Metadata {
                kind,
                destination: job.destination.to_string(),
            });
        }

        // Opening the destination is a setup step: fail before reading anything
        let sink = match &job.destination {
            Destination::File(path) => Sink::from(FileSink::create(path, job.format).await?),
            Destination::Cluster { base_url, index } => {
                Sink::from(ClusterSink::new(self.connector.connect(base_url)?, index.as_str()))
            },
        };

        info!(
            source = %job.source_label(),
            destination = %job.destination,
            page_size = job.page_size,
            concurrency = job.concurrency,
            limit = job.limit,
            "Starting transfer"
        );

        let extractor = CursorExtractor::new(source, job.source_index.as_str(), job.page_size);
        let report = Pipeline::new(Box::new(extractor), sink, job.concurrency, job.limit)
            .with_progress(self.progress.clone())
            .with_cancellation(self.cancel.clone())
            .run()
            .await?;

        Ok(JobOutcome::Records(report))
    }

    /// Backup file back into a cluster index
    pub async fn restore(&self, job: &RestoreJob) -> Result<JobOutcome> {
        let destination = self.connector.connect(&job.destination_url)?;
        let target = job.destination_label();

        if let Some(kind) = MetadataKind::from_job(job.kind) {
            let document = metadata::read_file(&job.input).await?;
            metadata::apply(destination.as_ref(), &job.destination_index, kind, document).await?;
            info!(%kind, file = %job.input.display(), destination = %target, "Restored index metadata");
            return Ok(JobOutcome::Metadata {
                kind,
                destination: target,
            });
        }

        let source = FileRecordSource::open(&job.input, DEFAULT_PAGE_SIZE).await?;
        let sink = ClusterSink::new(destination, job.destination_index.as_str());

        info!(
            file = %job.input.display(),
            destination = %target,
            concurrency = job.concurrency,
            "Starting restore"
        );

        let report = Pipeline::new(Box::new(source), Sink::from(sink), job.concurrency, 0)
            .with_progress(self.progress.clone())
            .with_cancellation(self.cancel.clone())
            .run()
            .await?;

        Ok(JobOutcome::Records(report))
    }
}
