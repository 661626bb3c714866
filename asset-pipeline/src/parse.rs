use asset_core::{AssetError, AssetResult};
use bytes::Bytes;

use crate::ParsedFeed;

/// Decode fetched feeds in order. The first undecodable feed fails the lot.
pub fn parse_feeds(raw: &[Bytes]) -> AssetResult<Vec<ParsedFeed>> {
    raw.iter()
        .enumerate()
        .map(|(index, bytes)| {
            serde_json::from_slice::<ParsedFeed>(bytes).map_err(|e| {
                tracing::debug!(index, error = %e, "feed failed to decode");
                AssetError::general_error("Unable to parse one or more feeds").with_source(e)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn preserves_input_order() {
        let raw = vec![
            Bytes::from_static(br#"{"id":"b","source":"","file":"b.js"}"#),
            Bytes::from_static(br#"[{"id":"a","source":"","file":"a.js"}]"#),
        ];

        let feeds = parse_feeds(&raw).unwrap();
        let ids: Vec<_> = feeds.iter().map(|f| f.records[0].id().to_string()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn any_bad_feed_fails_everything_with_cause() {
        let raw = vec![
            Bytes::from_static(br#"{"id":"a","source":"","file":"a.js"}"#),
            Bytes::from_static(b"{not json"),
        ];

        let err = parse_feeds(&raw).unwrap_err();
        assert_eq!(err.code(), 500);
        assert_eq!(err.message, "Unable to parse one or more feeds");
        assert!(err.source().is_some());
    }
}
