use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

use crate::{store::validate_key, Sink, SinkError, SinkResult};

/// Sink storing one file per key under a root directory.
///
/// Writes land in a temporary file that is renamed into place, so readers
/// see either the previous object or the complete new one.
#[derive(Debug, Clone)]
pub struct FsSink {
    root: PathBuf,
}

impl FsSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the root directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> SinkResult<Self> {
        let sink = Self::new(root);
        tokio::fs::create_dir_all(&sink.root).await?;
        Ok(sink)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> SinkResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl Sink for FsSink {
    async fn get(&self, key: &str) -> SinkResult<Bytes> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(SinkError::not_found(key)),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, bytes: Bytes) -> SinkResult<()> {
        let path = self.path_for(key)?;
        let tmp = self.root.join(format!(".{}.{}.tmp", key, Uuid::new_v4().simple()));

        let written = async {
            let mut file = tokio::fs::File::create(&tmp).await?;
            file.write_all(&bytes).await?;
            file.sync_all().await?;
            drop(file);
            tokio::fs::rename(&tmp, &path).await
        }
        .await;

        if let Err(e) = written {
            // The temp file may not exist if creation itself failed.
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        debug!(key, bytes = bytes.len(), "wrote object to {}", self.root.display());
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "fs"
    }
}
