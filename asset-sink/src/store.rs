use async_trait::async_trait;
use bytes::Bytes;

use crate::{SinkError, SinkResult};

/// Key/blob storage the pipeline reads feeds from and writes artifacts to.
///
/// Implementations must report an absent key as [`SinkError::NotFound`] and
/// an unusable key as [`SinkError::InvalidKey`]; callers retry neither, and
/// treat every other failure as transient.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Read the whole object stored under `key`.
    async fn get(&self, key: &str) -> SinkResult<Bytes>;

    /// Create or overwrite the object stored under `key`.
    async fn set(&self, key: &str, bytes: Bytes) -> SinkResult<()>;

    /// Short backend name for logs.
    fn kind(&self) -> &'static str;
}

/// Reject keys that could escape a flat namespace.
pub fn validate_key(key: &str) -> SinkResult<()> {
    if key.is_empty()
        || key == "."
        || key.contains("..")
        || key.contains('/')
        || key.contains('\\')
        || key.contains('\0')
    {
        return Err(SinkError::invalid_key(key));
    }
    Ok(())
}
