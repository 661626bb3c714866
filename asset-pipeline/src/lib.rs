//! # asset-pipeline: feeds in, content-addressed bundles out
//!
//! ```text
//! ids ─► fetch (concurrent, retried) ─► parse ─► bundle (JS | CSS)
//!                                                   │
//!                     {file, uri} ◄─ upload ◄─ sha256 address
//! ```
//!
//! Each step classifies its own failures into an [`asset_core::AssetError`]
//! and the [`Pipeline`] passes them through untouched:
//!
//! | step   | failure                                   | kind           |
//! |--------|-------------------------------------------|----------------|
//! | fetch  | `*.json` feed absent                      | `NotFound`     |
//! | fetch  | other miss, or retries exhausted          | `GeneralError` |
//! | parse  | stored feed is not a feed document        | `GeneralError` |
//! | bundle | bundler rejected the feeds                | `GeneralError` |
//! | upload | retries exhausted                         | `GeneralError` |
//! | input  | id list or feed payload fails its schema  | `BadRequest`   |
//!
//! ```rust
//! use asset_pipeline::{validate, AssetType, BundleOptions, Pipeline, PipelineSettings};
//! use asset_sink::MemorySink;
//! use bytes::Bytes;
//!
//! # #[tokio::main]
//! # async fn main() -> asset_core::AssetResult<()> {
//! let sink = MemorySink::new();
//! let pipeline = Pipeline::with_settings(PipelineSettings::immediate(2));
//!
//! let feed = Bytes::from_static(br#"[{"id":"main","entry":true,"source":"console.log(1)","file":"main.js"}]"#);
//! let stored = pipeline.upload_raw_feed(&sink, AssetType::Js, feed, "http://localhost/feed/").await?;
//!
//! let ids = validate::feed_id_list(format!("[\"{}\"]", stored.file).as_bytes())?;
//! let bundle = pipeline
//!     .bundle_and_upload(&sink, AssetType::Js, &ids, "http://localhost/bundle/", &BundleOptions::default())
//!     .await?;
//! assert!(bundle.file.ends_with(".js"));
//! # Ok(())
//! # }
//! ```

mod address;
mod bundle;
pub mod bundlers;
mod feed;
mod fetch;
mod parse;
mod pipeline;
mod retry;
mod settings;
mod types;
mod upload;
pub mod validate;

pub use address::address_of;
pub use bundle::{BundleOptions, Bundler, BundlerError, BundlingAdapter};
pub use bundlers::{CssBundler, JsBundler};
pub use feed::{CssModule, FeedRecord, JsModule, ParsedFeed};
pub use fetch::{fetch_feed, fetch_feeds, FetchError};
pub use parse::parse_feeds;
pub use pipeline::Pipeline;
pub use retry::RetryPolicy;
pub use settings::PipelineSettings;
pub use types::{
    AssetType, ContentHash, FeedId, FeedIdList, FileName, StoredObjectName, UploadReceipt,
    MAX_FEEDS_PER_BUNDLE,
};
pub use upload::upload;
