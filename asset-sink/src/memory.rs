use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::{store::validate_key, Sink, SinkError, SinkResult};

/// Process-local sink. Cloning is not supported; share it behind an `Arc`.
#[derive(Debug, Default)]
pub struct MemorySink {
    objects: RwLock<HashMap<String, Bytes>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a sink with objects, e.g. for tests.
    pub fn with_objects<I, K>(objects: I) -> Self
    where
        I: IntoIterator<Item = (K, Bytes)>,
        K: Into<String>,
    {
        Self {
            objects: RwLock::new(objects.into_iter().map(|(k, v)| (k.into(), v)).collect()),
        }
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.objects.read().await.contains_key(key)
    }
}

#[async_trait]
impl Sink for MemorySink {
    async fn get(&self, key: &str) -> SinkResult<Bytes> {
        validate_key(key)?;
        self.objects
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| SinkError::not_found(key))
    }

    async fn set(&self, key: &str, bytes: Bytes) -> SinkResult<()> {
        validate_key(key)?;
        self.objects.write().await.insert(key.to_string(), bytes);
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}
