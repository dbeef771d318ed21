//! Producer side of the pipeline

use async_trait::async_trait;
use esdump_common::{Record, Result};

/// Something that yields records in batches until it runs dry
///
/// # Contract
/// - `next_batch` returns an empty vec once the source is exhausted, and keeps
///   returning an empty vec after that.
/// - An `Err` from `next_batch` is fatal: the caller stops reading.
/// - `count` runs once, before the first batch. The answer is an estimate
///   used for progress sizing, never a bound on how much is read.
#[async_trait]
pub trait RecordSource: Send {
    /// Expected number of records, when the source can tell.
    ///
    /// `limit` is the run's record limit (0 = unbounded); sources may use it
    /// to size their requests.
    async fn count(&mut self, _limit: u64) -> Result<Option<u64>> {
        Ok(None)
    }

    async fn next_batch(&mut self) -> Result<Vec<Record>>;

    /// Input the source read but dropped as unusable
    fn skipped(&self) -> u64 {
        0
    }

    /// Called once after reading stopped cleanly
    async fn release(&mut self) {}
}
