use crate::job::OutputFormat;
use esdump_common::{Record, Result};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::Mutex;

/// Appends encoded records to a file
///
/// Workers share one handle; the mutex keeps each line whole. Records are
/// encoded before the lock is taken so only the copy into the buffer is
/// serialized.
pub struct FileSink {
    path: PathBuf,
    format: OutputFormat,
    writer: Mutex<BufWriter<File>>,
}

impl FileSink {
    /// Create (or truncate) the output file
    pub async fn create(path: impl AsRef<Path>, format: OutputFormat) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let file = File::create(&path).await?;

        Ok(Self {
            path,
            format,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn write(&self, record: &Record) -> Result<()> {
        let line = self.format.encode(record)?;
        let mut writer = self.writer.lock().await;
        writer.write_all(line.as_bytes()).await?;
        Ok(())
    }

    pub async fn close(&self) -> Result<()> {
        let mut writer = self.writer.lock().await;
        writer.flush().await?;
        writer.get_mut().sync_all().await?;
        Ok(())
    }
}
