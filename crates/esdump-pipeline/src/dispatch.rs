//! Bounded hand-off between the extractor and the workers
//!
//! The channel bound is the only backpressure in a run: once
//! `BUFFER_PER_WORKER × concurrency` records are queued, [`pump`] waits for a
//! worker to take one before reading further.

use crate::source::RecordSource;
use async_channel::{Receiver, Sender};
use esdump_common::{DumpError, Record, Result};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

// ============================================================================
// Dispatch Constants
// ============================================================================

/// Queued records per worker. Enough to keep every worker busy while the next
/// page is being fetched.
pub const BUFFER_PER_WORKER: usize = 2;

/// Create the dispatch channel for `concurrency` workers
pub fn channel(concurrency: usize) -> (Sender<Record>, Receiver<Record>) {
    async_channel::bounded(concurrency.max(1) * BUFFER_PER_WORKER)
}

/// What a clean extraction produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extracted {
    pub enqueued: u64,
    /// Reported by the source, e.g. unparsable backup lines
    pub skipped: u64,
}

/// Move records from `source` into `tx` until the source runs dry, the limit
/// is reached, reading fails, or `cancel` fires.
///
/// This is the only writer of the channel. It closes the channel exactly once
/// on every exit path, which is how workers learn the stream ended. The
/// source is released only after a clean end.
///
pub async fn pump(
    mut source: Box<dyn RecordSource>,
    tx: Sender<Record>,
    limit: u64,
    cancel: CancellationToken,
) -> Result<Extracted> {
    let result = fill(source.as_mut(), &tx, limit, &cancel).await;
    tx.close();

    match result {
        Ok(enqueued) => {
            let skipped = source.skipped();
            info!(enqueued, skipped, "Extraction finished");
            source.release().await;
            Ok(Extracted { enqueued, skipped })
        },
        Err(DumpError::Cancelled) => {
            info!("Extraction cancelled");
            Err(DumpError::Cancelled)
        },
        Err(e) => {
            error!(error = %e, "Extraction failed");
            Err(e)
        },
    }
}

async fn fill(
    source: &mut dyn RecordSource,
    tx: &Sender<Record>,
    limit: u64,
    cancel: &CancellationToken,
) -> Result<u64> {
    let mut enqueued: u64 = 0;

    loop {
        if limit_reached(enqueued, limit) {
            debug!(limit, "Record limit reached");
            return Ok(enqueued);
        }

        let batch = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(DumpError::Cancelled),
            batch = source.next_batch() => batch.map_err(|e| DumpError::Extraction {
                reason: e.to_string(),
                enqueued,
            })?,
        };

        if batch.is_empty() {
            return Ok(enqueued);
        }
        debug!(records = batch.len(), enqueued, "Fetched page");

        for record in batch {
            if limit_reached(enqueued, limit) {
                break;
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(DumpError::Cancelled),
                sent = tx.send(record) => {
                    if sent.is_err() {
                        return Err(DumpError::Extraction {
                            reason: "no workers left to receive records".to_string(),
                            enqueued,
                        });
                    }
                },
            }
            enqueued += 1;
        }
    }
}

fn limit_reached(enqueued: u64, limit: u64) -> bool {
    limit > 0 && enqueued >= limit
}
