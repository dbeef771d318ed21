//! Transfer coordinator
//!
//! ```text
//! idle → counting → extracting (+ writing) → draining → done | failed
//! ```
//!
//! Workers are started before extraction so the first page has somewhere to
//! go. The extractor runs as its own task and its `JoinHandle` is awaited, so
//! a read failure becomes the run's error. Per-record write failures never
//! fail the run; they only show up in the report and the log.

use crate::dispatch;
use crate::progress::Progress;
use crate::sink::Sink;
use crate::source::RecordSource;
use crate::worker::WorkerPool;
use esdump_common::{DumpError, Result};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Where a run is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Counting,
    Extracting,
    Draining,
    Done,
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::Counting => "counting",
            PipelineState::Extracting => "extracting",
            PipelineState::Draining => "draining",
            PipelineState::Done => "done",
            PipelineState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReport {
    pub state: PipelineState,
    /// Source count estimate, when the source could tell
    pub total: Option<u64>,
    pub enqueued: u64,
    /// Input the source dropped before enqueueing
    pub skipped: u64,
    pub attempted: u64,
    pub failed: u64,
    pub elapsed: Duration,
}

impl TransferReport {
    pub fn written(&self) -> u64 {
        self.attempted.saturating_sub(self.failed)
    }

    /// True when some records were attempted but not written
    pub fn is_lossy(&self) -> bool {
        self.failed > 0
    }
}

impl fmt::Display for TransferReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} record(s) written in {:.1}s",
            self.written(),
            self.enqueued,
            self.elapsed.as_secs_f64()
        )?;
        if self.failed > 0 {
            write!(f, ", {} failed", self.failed)?;
        }
        if self.skipped > 0 {
            write!(f, ", {} skipped", self.skipped)?;
        }
        Ok(())
    }
}

/// One source, one sink, `concurrency` workers
pub struct Pipeline {
    source: Box<dyn RecordSource>,
    sink: Sink,
    concurrency: usize,
    limit: u64,
    progress: Progress,
    cancel: CancellationToken,
    state: watch::Sender<PipelineState>,
}

impl Pipeline {
    /// `limit` of 0 reads the source to the end
    pub fn new(source: Box<dyn RecordSource>, sink: Sink, concurrency: usize, limit: u64) -> Self {
        let (state, _) = watch::channel(PipelineState::Idle);
        Self {
            source,
            sink,
            concurrency: concurrency.max(1),
            limit,
            progress: Progress::new(),
            cancel: CancellationToken::new(),
            state,
        }
    }

    /// Report into counters owned by the caller
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

    /// Watch state transitions
    pub fn subscribe(&self) -> watch::Receiver<PipelineState> {
        self.state.subscribe()
    }

    /// Run to completion
    ///
    /// Returns the report when extraction ended cleanly (exhaustion or limit)
    /// and every enqueued record was attempted. Returns the terminal error
    /// when counting or extraction failed or the run was cancelled; records
    /// already enqueued are still drained first.
    pub async fn run(self) -> Result<TransferReport> {
        let started = Instant::now();
        let Pipeline {
            mut source,
            sink,
            concurrency,
            limit,
            progress,
            cancel,
            state,
        } = self;

        transition(&state, PipelineState::Counting);
        let total = match source.count(limit).await {
            Ok(total) => total,
            Err(e) => {
                transition(&state, PipelineState::Failed);
                return Err(e);
            },
        };
        if let Some(total) = total {
            let expected = if limit > 0 { total.min(limit) } else { total };
            progress.set_total(expected);
        }

        transition(&state, PipelineState::Extracting);
        let sink = Arc::new(sink);
        let (tx, rx) = dispatch::channel(concurrency);
        let pool = WorkerPool::spawn(concurrency, rx, sink.clone(), progress.clone(), cancel.clone());
        info!(workers = pool.size(), sink = %sink.describe(), limit, "Workers started");

        let extractor = tokio::spawn(dispatch::pump(source, tx, limit, cancel));
        let extracted = match extractor.await {
            Ok(result) => result,
            Err(e) => Err(DumpError::Extraction {
                reason: format!("extractor task did not finish: {}", e),
                enqueued: 0,
            }),
        };

        transition(&state, PipelineState::Draining);
        let stats = pool.join().await;
        let closed = sink.close().await;

        let extracted = match extracted.and_then(|extracted| closed.map(|_| extracted)) {
            Ok(extracted) => extracted,
            Err(e) => {
                error!(
                    written = stats.written,
                    failed = stats.failed,
                    error = %e,
                    "Transfer failed"
                );
                transition(&state, PipelineState::Failed);
                return Err(e);
            },
        };

        transition(&state, PipelineState::Done);
        let report = TransferReport {
            state: PipelineState::Done,
            total,
            enqueued: extracted.enqueued,
            skipped: extracted.skipped,
            attempted: stats.written + stats.failed,
            failed: stats.failed,
            elapsed: started.elapsed(),
        };
        info!(
            enqueued = report.enqueued,
            written = report.written(),
            failed = report.failed,
            skipped = report.skipped,
            "Transfer finished"
        );

        Ok(report)
    }
}

fn transition(state: &watch::Sender<PipelineState>, next: PipelineState) {
    info!(state = %next, "Pipeline state changed");
    state.send_replace(next);
}
