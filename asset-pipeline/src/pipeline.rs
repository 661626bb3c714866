use asset_core::AssetResult;
use asset_sink::Sink;
use bytes::Bytes;
use tracing::{info, instrument};

use crate::{
    address_of, fetch_feeds, parse_feeds, upload, validate, AssetType, BundleOptions, BundlingAdapter,
    FeedIdList, PipelineSettings, StoredObjectName, UploadReceipt,
};

/// Stateless composition of fetch, parse, bundle, address and upload.
///
/// Runs share nothing but the sink, so identical concurrent requests each
/// run in full and converge on the same stored object.
#[derive(Clone, Default)]
pub struct Pipeline {
    bundlers: BundlingAdapter,
    settings: PipelineSettings,
}

impl Pipeline {
    pub fn new(bundlers: BundlingAdapter, settings: PipelineSettings) -> Self {
        Self { bundlers, settings }
    }

    pub fn with_settings(settings: PipelineSettings) -> Self {
        Self {
            bundlers: BundlingAdapter::default(),
            settings,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Bundle stored feeds, in `ids` order, into one content-addressed artifact.
    ///
    /// Every failure arrives already classified by the step that raised it.
    #[instrument(skip_all, fields(asset_type = %asset_type, feeds = ids.len()))]
    pub async fn bundle_and_upload(
        &self,
        sink: &dyn Sink,
        asset_type: AssetType,
        ids: &FeedIdList,
        base_uri: &str,
        options: &BundleOptions,
    ) -> AssetResult<UploadReceipt> {
        let raw = fetch_feeds(sink, ids, &self.settings.fetch).await?;
        let feeds = parse_feeds(&raw)?;
        let artifact = self.bundlers.bundle(&feeds, asset_type, options).await?;

        let name = StoredObjectName::artifact(&address_of(&artifact), asset_type);
        upload(sink, &name, artifact, &self.settings.upload).await?;

        info!(file = %name, "bundle stored");
        Ok(UploadReceipt::new(name, base_uri))
    }

    /// Validate a single feed document and store it under its content address.
    #[instrument(skip_all, fields(asset_type = %asset_type, bytes = payload.len()))]
    pub async fn upload_raw_feed(
        &self,
        sink: &dyn Sink,
        asset_type: AssetType,
        payload: Bytes,
        base_uri: &str,
    ) -> AssetResult<UploadReceipt> {
        let feed = validate::raw_feed(asset_type, &payload)?;

        let name = StoredObjectName::feed(&address_of(&payload));
        upload(sink, &name, payload, &self.settings.upload).await?;

        info!(file = %name, records = feed.records.len(), "feed stored");
        Ok(UploadReceipt::new(name, base_uri))
    }
}
