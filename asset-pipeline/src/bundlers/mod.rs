//! Stock bundlers: a CommonJS module-map packer and a stylesheet concatenator.

mod css;
mod js;

pub use css::CssBundler;
pub use js::JsBundler;

use crate::{AssetType, BundlerError, FeedRecord, ParsedFeed};

/// Fail on the first record of the wrong asset type.
fn ensure_asset_type(feeds: &[ParsedFeed], expected: AssetType) -> Result<(), BundlerError> {
    for (feed, parsed) in feeds.iter().enumerate() {
        if let Some(record) = parsed.records.iter().find(|r| r.asset_type() != expected) {
            return Err(BundlerError::WrongAssetType {
                feed,
                id: record.id().to_string(),
                found: record.asset_type(),
                expected,
            });
        }
    }
    Ok(())
}

/// Records across all feeds in order, keeping the first of each id.
fn unique_records(feeds: &[ParsedFeed]) -> Vec<&FeedRecord> {
    let mut seen = std::collections::HashSet::new();
    feeds
        .iter()
        .flat_map(|f| f.records.iter())
        .filter(|r| {
            let first = seen.insert(r.id());
            if !first {
                tracing::debug!(id = r.id(), "skipping duplicate module");
            }
            first
        })
        .collect()
}
