//! Write-back worker pool

use crate::progress::Progress;
use crate::sink::Sink;
use async_channel::Receiver;
use esdump_common::Record;
use futures::future::join_all;
use std::ops::AddAssign;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

/// What one worker (or the whole pool) did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub written: u64,
    pub failed: u64,
}

impl AddAssign for WorkerStats {
    fn add_assign(&mut self, other: Self) {
        self.written += other.written;
        self.failed += other.failed;
    }
}

/// Fixed set of tasks draining the dispatch channel into a sink
///
/// Each worker takes records until the channel is closed and empty. A failed
/// write is logged with the record id and counted; the worker moves on.
pub struct WorkerPool {
    handles: Vec<JoinHandle<WorkerStats>>,
}

impl WorkerPool {
    pub fn spawn(
        count: usize,
        rx: Receiver<Record>,
        sink: Arc<Sink>,
        progress: Progress,
        cancel: CancellationToken,
    ) -> Self {
        let handles = (0..count.max(1))
            .map(|worker| {
                tokio::spawn(run_worker(
                    worker,
                    rx.clone(),
                    sink.clone(),
                    progress.clone(),
                    cancel.clone(),
                ))
            })
            .collect();

        Self { handles }
    }

    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Wait for every worker and sum their stats
    pub async fn join(self) -> WorkerStats {
        let mut total = WorkerStats::default();
        for (worker, result) in join_all(self.handles).await.into_iter().enumerate() {
            match result {
                Ok(stats) => total += stats,
                Err(e) => error!(worker, error = %e, "Worker task did not finish"),
            }
        }
        total
    }
}

async fn run_worker(
    worker: usize,
    rx: Receiver<Record>,
    sink: Arc<Sink>,
    progress: Progress,
    cancel: CancellationToken,
) -> WorkerStats {
    let mut stats = WorkerStats::default();

    loop {
        // A write already started is allowed to finish so file output never
        // ends in half a line.
        let record = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            received = rx.recv() => match received {
                Ok(record) => record,
                Err(_) => break,
            },
        };

        match sink.write(&record).await {
            Ok(()) => stats.written += 1,
            Err(e) => {
                stats.failed += 1;
                progress.record_failure();
                warn!(worker, id = %record.id, error = %e, "Failed to write record");
            },
        }
        progress.record_attempt();
    }

    debug!(worker, written = stats.written, failed = stats.failed, "Worker finished");
    stats
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::job::OutputFormat;
    use crate::sink::FileSink;
    use esdump_common::types::Source;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_pool_drains_until_closed() {
        let dir = TempDir::new().unwrap();
        let sink = FileSink::create(dir.path().join("out.ndjson"), OutputFormat::Ndjson)
            .await
            .unwrap();
        let sink = Arc::new(Sink::from(sink));
        let progress = Progress::new();

        let (tx, rx) = async_channel::bounded(4);
        let pool = WorkerPool::spawn(3, rx, sink.clone(), progress.clone(), CancellationToken::new());
        assert_eq!(pool.size(), 3);

        for i in 0..25 {
            tx.send(Record::new("logs", i.to_string(), Source::new())).await.unwrap();
        }
        tx.close();

        let stats = pool.join().await;
        assert_eq!(stats, WorkerStats { written: 25, failed: 0 });
        assert_eq!(progress.attempted(), 25);
    }

    #[tokio::test]
    async fn test_cancelled_pool_stops_dequeuing() {
        let dir = TempDir::new().unwrap();
        let sink = FileSink::create(dir.path().join("out.ndjson"), OutputFormat::Ndjson)
            .await
            .unwrap();
        let cancel = CancellationToken::new();

        let (tx, rx) = async_channel::bounded(4);
        let pool = WorkerPool::spawn(2, rx, Arc::new(Sink::from(sink)), Progress::new(), cancel.clone());

        cancel.cancel();
        let stats = pool.join().await;

        assert_eq!(stats.written, 0);
        // every receiver is gone once the workers stopped
        assert!(tx.send(Record::new("logs", "late", Source::new())).await.is_err());
    }
}
