use std::time::Duration;

use asset_core::AssetConfigSnapshot;

use crate::retry::{DEFAULT_BACKOFF_BASE, DEFAULT_BACKOFF_MAX, DEFAULT_MAX_RETRIES};
use crate::{BundleOptions, RetryPolicy};

/// Typed view of the pipeline's configuration keys.
#[derive(Debug, Clone, Default)]
pub struct PipelineSettings {
    pub fetch: RetryPolicy,
    pub upload: RetryPolicy,
    pub bundle: BundleOptions,
}

impl PipelineSettings {
    /// Reads `fetch.retries`, `upload.retries`, `retry.backoff_ms`,
    /// `retry.backoff_max_ms`, `bundle.env` and `bundle.minify`.
    pub fn from_snapshot(snapshot: &AssetConfigSnapshot) -> Self {
        let base = snapshot
            .get_u64("retry.backoff_ms")
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_BACKOFF_BASE);
        let max = snapshot
            .get_u64("retry.backoff_max_ms")
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_BACKOFF_MAX);

        let policy = |key: &str| {
            RetryPolicy::new(snapshot.get_u32(key).unwrap_or(DEFAULT_MAX_RETRIES)).with_backoff(base, max)
        };

        let mut bundle = BundleOptions::new().with_minify(snapshot.get_bool("bundle.minify").unwrap_or(false));
        if let Some(env) = snapshot.get_string("bundle.env").filter(|e| !e.trim().is_empty()) {
            bundle = bundle.with_env(env);
        }

        Self {
            fetch: policy("fetch.retries"),
            upload: policy("upload.retries"),
            bundle,
        }
    }

    /// Same budgets, no sleeping between attempts.
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            fetch: RetryPolicy::immediate(max_retries),
            upload: RetryPolicy::immediate(max_retries),
            bundle: BundleOptions::default(),
        }
    }
}
