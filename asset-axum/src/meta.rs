use std::collections::HashMap;

use asset_core::{bail_asset, AssetError, AssetResult};
use asset_pipeline::UploadReceipt;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Maps human-chosen ids to the objects stored for them.
#[async_trait]
pub trait MetaStore: Send + Sync {
    async fn set(&self, id: &str, receipt: &UploadReceipt) -> AssetResult<()>;

    async fn get(&self, id: &str) -> AssetResult<UploadReceipt>;
}

#[derive(Debug, Default)]
pub struct MemoryMetaStore {
    records: RwLock<HashMap<String, UploadReceipt>>,
}

impl MemoryMetaStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn normalize_id(id: &str) -> AssetResult<String> {
    let id = id.trim();
    if id.is_empty() {
        bail_asset!(bad_request, "Meta id must not be empty");
    }
    Ok(id.to_string())
}

#[async_trait]
impl MetaStore for MemoryMetaStore {
    async fn set(&self, id: &str, receipt: &UploadReceipt) -> AssetResult<()> {
        let id = normalize_id(id)?;
        self.records.write().await.insert(id, receipt.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> AssetResult<UploadReceipt> {
        let id = normalize_id(id)?;
        self.records
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AssetError::not_found(format!("No meta record with id '{id}'")))
    }
}
