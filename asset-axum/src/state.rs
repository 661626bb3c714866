use std::sync::Arc;

use asset_pipeline::Pipeline;
use asset_sink::Sink;

use crate::MetaStore;

/// Shared by every handler. Cheap to clone.
#[derive(Clone)]
pub struct AssetState {
    pub sink: Arc<dyn Sink>,
    pub meta: Arc<dyn MetaStore>,
    pub pipeline: Arc<Pipeline>,
    public_url: Arc<str>,
}

impl AssetState {
    pub fn new<S, M>(sink: S, meta: M, pipeline: Pipeline, public_url: &str) -> Self
    where
        S: Sink + 'static,
        M: MetaStore + 'static,
    {
        Self::from_parts(Arc::new(sink), Arc::new(meta), Arc::new(pipeline), public_url)
    }

    pub fn from_parts(
        sink: Arc<dyn Sink>,
        meta: Arc<dyn MetaStore>,
        pipeline: Arc<Pipeline>,
        public_url: &str,
    ) -> Self {
        Self {
            sink,
            meta,
            pipeline,
            public_url: Arc::from(public_url.trim_end_matches('/')),
        }
    }

    pub fn public_url(&self) -> &str {
        &self.public_url
    }

    /// Prefix of the `uri` handed out for stored feeds.
    pub fn feed_base_uri(&self) -> String {
        format!("{}/feed/", self.public_url)
    }

    /// Prefix of the `uri` handed out for stored bundles.
    pub fn bundle_base_uri(&self) -> String {
        format!("{}/bundle/", self.public_url)
    }
}
