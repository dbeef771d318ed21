//! Cursor-based extraction from a cluster index

use crate::client::{ClusterClient, Page};
use crate::source::RecordSource;
use async_trait::async_trait;
use esdump_common::{Record, Result};
use std::sync::Arc;
use tracing::{debug, info};

/// Reads an index page by page through a server-side cursor
///
/// The first call opens the cursor, every later call continues it. Reading
/// stops at the first empty page or at the first page shorter than the
/// requested size, so a page size above the index size costs exactly one
/// request. A failed continuation kills the cursor: there is no retry and
/// no attempt to reopen.
pub struct CursorExtractor {
    client: Arc<dyn ClusterClient>,
    index: String,
    page_size: usize,
    cursor: Option<String>,
    opened: bool,
    exhausted: bool,
}

impl CursorExtractor {
    pub fn new(client: Arc<dyn ClusterClient>, index: impl Into<String>, page_size: usize) -> Self {
        Self {
            client,
            index: index.into(),
            page_size: page_size.max(1),
            cursor: None,
            opened: false,
            exhausted: false,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    async fn open(&mut self) -> Result<Vec<Record>> {
        self.opened = true;
        debug!(index = %self.index, page_size = self.page_size, "Opening cursor");

        match self.client.search(&self.index, self.page_size).await {
            Ok(page) => Ok(self.accept(page)),
            Err(e) => {
                self.exhausted = true;
                Err(e)
            },
        }
    }

    async fn advance(&mut self) -> Result<Vec<Record>> {
        let Some(cursor) = self.cursor.take() else {
            self.exhausted = true;
            return Ok(Vec::new());
        };

        match self.client.scroll(&cursor).await {
            Ok(page) => Ok(self.accept(page)),
            Err(e) => {
                // The old cursor is dead; don't keep it for release
                self.exhausted = true;
                Err(e)
            },
        }
    }

    fn accept(&mut self, page: Page) -> Vec<Record> {
        self.cursor = Some(page.cursor);
        if page.records.len() < self.page_size {
            self.exhausted = true;
        }
        page.records
    }
}

#[async_trait]
impl RecordSource for CursorExtractor {
    async fn count(&mut self, limit: u64) -> Result<Option<u64>> {
        let total = self.client.count(&self.index).await?;
        info!(index = %self.index, total, "Counted source documents");

        // Never ask for more than will be consumed. The count is an estimate,
        // so the clamped size only shapes requests, it never ends the read.
        if limit > 0 {
            let clamped = usize::try_from(total).unwrap_or(usize::MAX).min(self.page_size).max(1);
            if clamped != self.page_size {
                debug!(from = self.page_size, to = clamped, "Clamped page size to document count");
                self.page_size = clamped;
            }
        }

        Ok(Some(total))
    }

    async fn next_batch(&mut self) -> Result<Vec<Record>> {
        if self.exhausted {
            return Ok(Vec::new());
        }
        if !self.opened {
            return self.open().await;
        }
        self.advance().await
    }

    async fn release(&mut self) {
        let Some(cursor) = self.cursor.take() else {
            return;
        };
        if let Err(e) = self.client.clear_scroll(&cursor).await {
            debug!(error = %e, "Could not release cursor; it will expire on its own");
        }
    }
}
