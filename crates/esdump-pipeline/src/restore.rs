//! Reading backup files back as records

use crate::source::RecordSource;
use async_trait::async_trait;
use esdump_common::{Record, Result};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Split};
use tracing::{info, warn};

/// Line-delimited backup file as a record source
///
/// Blank lines are ignored. A line that does not parse, including one that is
/// not valid UTF-8, is logged and skipped. A read error is fatal, but only
/// after the records parsed before it have been handed out.
pub struct FileRecordSource {
    path: PathBuf,
    lines: Split<BufReader<File>>,
    batch_size: usize,
    line_number: u64,
    skipped: u64,
    read_error: Option<io::Error>,
    done: bool,
}

impl FileRecordSource {
    pub async fn open(path: impl AsRef<Path>, batch_size: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).await?;

        Ok(Self {
            path,
            lines: BufReader::new(file).split(b'\n'),
            batch_size: batch_size.max(1),
            line_number: 0,
            skipped: 0,
            read_error: None,
            done: false,
        })
    }
}

#[async_trait]
impl RecordSource for FileRecordSource {
    async fn next_batch(&mut self) -> Result<Vec<Record>> {
        if let Some(e) = self.read_error.take() {
            return Err(e.into());
        }

        let mut batch = Vec::with_capacity(self.batch_size);

        while !self.done && batch.len() < self.batch_size {
            let line = match self.lines.next_segment().await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    self.done = true;
                    break;
                },
                Err(e) if batch.is_empty() => return Err(e.into()),
                Err(e) => {
                    self.read_error = Some(e);
                    break;
                },
            };
            self.line_number += 1;

            if line.trim_ascii().is_empty() {
                continue;
            }

            match Record::from_json_line(&line) {
                Ok(record) => batch.push(record),
                Err(e) => {
                    self.skipped += 1;
                    warn!(
                        file = %self.path.display(),
                        line = self.line_number,
                        error = %e,
                        "Skipping unparsable line"
                    );
                },
            }
        }

        Ok(batch)
    }

    fn skipped(&self) -> u64 {
        self.skipped
    }

    async fn release(&mut self) {
        info!(
            file = %self.path.display(),
            lines = self.line_number,
            skipped = self.skipped,
            "Finished reading backup"
        );
    }
}
