//! Local filesystem storage implementation.
//!
//! Writes CSV artifacts under a root directory with atomic
//! write-temp-then-rename semantics, so a crash mid-write never leaves a
//! truncated artifact behind.
//!
//! ## Layout
//!
//! ```text
//! {root}/
//! ├── {prefix}_{YYYYmmdd_HHMMSS}_partial.csv   # checkpoints
//! └── {prefix}_{YYYYmmdd_HHMMSS}.csv           # final output
//! ```

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Local;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::ListingRecord;
use crate::storage::RecordStorage;

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
    file_prefix: String,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>, file_prefix: impl Into<String>) -> Self {
        Self {
            root_dir: root_dir.into(),
            file_prefix: file_prefix.into(),
        }
    }

    /// Encode records as UTF-8 CSV with a header row.
    ///
    /// Column order follows the record's field order; `None` fields become
    /// empty cells. UTF-8 keeps every diacritic intact.
    fn encode_csv(records: &[ListingRecord]) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        writer
            .into_inner()
            .map_err(|e| AppError::config(format!("CSV buffer error: {e}")))
    }

    fn timestamp() -> String {
        Local::now().format("%Y%m%d_%H%M%S").to_string()
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.root_dir).await?;
        let path = self.root_dir.join(file_name);

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(path)
    }
}

#[async_trait]
impl RecordStorage for LocalStorage {
    async fn write_checkpoint(&self, records: &[ListingRecord]) -> Result<PathBuf> {
        let bytes = Self::encode_csv(records)?;
        let name = format!("{}_{}_partial.csv", self.file_prefix, Self::timestamp());
        self.write_bytes(&name, &bytes).await
    }

    async fn write_final(&self, records: &[ListingRecord]) -> Result<PathBuf> {
        let bytes = Self::encode_csv(records)?;
        let name = format!("{}_{}.csv", self.file_prefix, Self::timestamp());
        self.write_bytes(&name, &bytes).await
    }
}
