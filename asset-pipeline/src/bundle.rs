use std::collections::BTreeMap;
use std::sync::Arc;

use asset_core::{AssetError, AssetResult};
use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bundlers::{CssBundler, JsBundler};
use crate::{AssetType, ParsedFeed};

/// Options handed to a bundler untouched.
///
/// `env` and `minify` are understood by every bundler; anything else lands
/// in `extensions` and is only meaningful to bundlers that look for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BundleOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,

    #[serde(default)]
    pub minify: bool,

    #[serde(flatten)]
    pub extensions: BTreeMap<String, serde_json::Value>,
}

impl BundleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_env(mut self, env: impl Into<String>) -> Self {
        self.env = Some(env.into());
        self
    }

    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    pub fn with_extension(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extensions.insert(key.into(), value);
        self
    }

    pub fn extension(&self, key: &str) -> Option<&serde_json::Value> {
        self.extensions.get(key)
    }
}

/// Failures a bundler implementation may report.
#[derive(Error, Debug)]
pub enum BundlerError {
    #[error("no modules to bundle")]
    Empty,

    #[error("feed {feed} holds {found} module '{id}' but a {expected} bundle was requested")]
    WrongAssetType {
        feed: usize,
        id: String,
        found: AssetType,
        expected: AssetType,
    },

    #[error("{0}")]
    Rejected(String),

    #[error("bundler failed: {source}")]
    Other {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl BundlerError {
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }

    pub fn other<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Other {
            source: Box::new(error),
        }
    }
}

/// Turns ordered feeds into one artifact.
#[async_trait]
pub trait Bundler: Send + Sync {
    async fn bundle(&self, feeds: &[ParsedFeed], options: &BundleOptions) -> Result<Bytes, BundlerError>;
}

/// Routes feeds to the JS or CSS bundler and classifies their failures.
#[derive(Clone)]
pub struct BundlingAdapter {
    js: Arc<dyn Bundler>,
    css: Arc<dyn Bundler>,
}

impl Default for BundlingAdapter {
    fn default() -> Self {
        Self::new(JsBundler::new(), CssBundler::new())
    }
}

impl BundlingAdapter {
    pub fn new<J, C>(js: J, css: C) -> Self
    where
        J: Bundler + 'static,
        C: Bundler + 'static,
    {
        Self {
            js: Arc::new(js),
            css: Arc::new(css),
        }
    }

    /// CSS goes to the CSS bundler; everything else is treated as JS.
    pub fn bundler_for(&self, asset_type: AssetType) -> &dyn Bundler {
        match asset_type {
            AssetType::Css => self.css.as_ref(),
            AssetType::Js => self.js.as_ref(),
        }
    }

    pub async fn bundle(
        &self,
        feeds: &[ParsedFeed],
        asset_type: AssetType,
        options: &BundleOptions,
    ) -> AssetResult<Bytes> {
        self.bundler_for(asset_type)
            .bundle(feeds, options)
            .await
            .map_err(|e| {
                tracing::warn!(asset_type = %asset_type, error = %e, "bundler rejected feeds");
                AssetError::general_error(format!(
                    "Unable to bundle feeds as {}",
                    asset_type.as_str().to_uppercase()
                ))
                .with_source(e)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::error::Error as _;

    struct Echo;

    #[async_trait]
    impl Bundler for Echo {
        async fn bundle(&self, _feeds: &[ParsedFeed], options: &BundleOptions) -> Result<Bytes, BundlerError> {
            Ok(Bytes::from(serde_json::to_vec(options).map_err(BundlerError::other)?))
        }
    }

    struct Refuse;

    #[async_trait]
    impl Bundler for Refuse {
        async fn bundle(&self, _feeds: &[ParsedFeed], _options: &BundleOptions) -> Result<Bytes, BundlerError> {
            Err(BundlerError::rejected("syntax error in module 3"))
        }
    }

    #[tokio::test]
    async fn options_are_forwarded_verbatim() {
        let adapter = BundlingAdapter::new(Echo, Refuse);
        let options = BundleOptions::new()
            .with_env("production")
            .with_minify(true)
            .with_extension("banner", json!("/* hi */"));

        let out = adapter.bundle(&[], AssetType::Js, &options).await.unwrap();
        let seen: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(seen, json!({"env": "production", "minify": true, "banner": "/* hi */"}));
    }

    #[tokio::test]
    async fn bundler_failures_are_reclassified_with_cause() {
        let adapter = BundlingAdapter::new(Echo, Refuse);

        let err = adapter
            .bundle(&[], AssetType::Css, &BundleOptions::default())
            .await
            .unwrap_err();

        assert_eq!(err.code(), 500);
        assert_eq!(err.message, "Unable to bundle feeds as CSS");
        assert_eq!(err.source().unwrap().to_string(), "syntax error in module 3");
    }

    #[test]
    fn unknown_option_keys_deserialize_into_extensions() {
        let options: BundleOptions =
            serde_json::from_value(json!({"env": "dev", "sourceRoot": "/src"})).unwrap();

        assert_eq!(options.env.as_deref(), Some("dev"));
        assert!(!options.minify);
        assert_eq!(options.extension("sourceRoot"), Some(&json!("/src")));
    }
}
