//! File-backed seen-set store.
//!
//! Persisted forms:
//! - `latest`: JSON object `{identity: lastUrl}`
//! - `all`: newline-delimited URL list
//!
//! Writes go through a temp-file-then-rename replace so a crash
//! mid-write never leaves a torn state file.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::SeenMode;
use crate::storage::SeenRecord;

/// Handle to the seen-set file.
pub struct SeenFile {
    path: PathBuf,
    mode: SeenMode,
}

impl SeenFile {
    pub fn new(path: impl Into<PathBuf>, mode: SeenMode) -> Self {
        Self {
            path: path.into(),
            mode,
        }
    }

    /// Load the record; a missing file is the empty state.
    pub async fn load(&self) -> Result<SeenRecord> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SeenRecord::empty(self.mode));
            }
            Err(e) => return Err(AppError::Io(e)),
        };

        match self.mode {
            SeenMode::Latest => {
                let map: HashMap<String, String> = serde_json::from_slice(&bytes)?;
                Ok(SeenRecord::Latest(map))
            }
            SeenMode::All => {
                let text = String::from_utf8_lossy(&bytes);
                let set: HashSet<String> = text
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect();
                Ok(SeenRecord::All(set))
            }
        }
    }

    /// Rewrite the whole file atomically (write to temp, then rename).
    pub async fn persist(&self, record: &SeenRecord) -> Result<()> {
        let bytes = match record {
            SeenRecord::Latest(map) => serde_json::to_vec_pretty(map)?,
            SeenRecord::All(set) => {
                let mut urls: Vec<&str> = set.iter().map(String::as_str).collect();
                urls.sort_unstable();
                let mut text = urls.join("\n");
                if !text.is_empty() {
                    text.push('\n');
                }
                text.into_bytes()
            }
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
