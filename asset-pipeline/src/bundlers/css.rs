use async_trait::async_trait;
use bytes::Bytes;

use super::{ensure_asset_type, unique_records};
use crate::{AssetType, Bundler, BundleOptions, BundlerError, FeedRecord, ParsedFeed};

/// Concatenates stylesheets in feed order, first occurrence of an id wins.
#[derive(Debug, Clone, Default)]
pub struct CssBundler;

impl CssBundler {
    pub fn new() -> Self {
        Self
    }
}

fn banner(name: &str, version: &str) -> String {
    format!("/* {}@{} */", name.replace("*/", "* /"), version.replace("*/", "* /"))
}

#[async_trait]
impl Bundler for CssBundler {
    async fn bundle(&self, feeds: &[ParsedFeed], _options: &BundleOptions) -> Result<Bytes, BundlerError> {
        ensure_asset_type(feeds, AssetType::Css)?;

        let mut out = String::new();
        for record in unique_records(feeds) {
            if let FeedRecord::Css(sheet) = record {
                out.push_str(&banner(&sheet.name, &sheet.version));
                out.push('\n');
                out.push_str(&sheet.content);
                if !sheet.content.ends_with('\n') {
                    out.push('\n');
                }
            }
        }

        if out.is_empty() {
            return Err(BundlerError::Empty);
        }
        Ok(Bytes::from(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CssModule, JsModule};

    fn sheet(id: &str, content: &str) -> FeedRecord {
        FeedRecord::Css(CssModule {
            id: id.into(),
            name: "@org/pkg".into(),
            version: "2.1.0".into(),
            file: format!("{id}.css"),
            content: content.into(),
        })
    }

    #[tokio::test]
    async fn concatenates_with_banners() {
        let feeds = vec![
            ParsedFeed::new(vec![sheet("a", ".a{color:red}")]),
            ParsedFeed::new(vec![sheet("b", ".b{color:blue}\n"), sheet("a", ".a{color:green}")]),
        ];

        let out = CssBundler::new().bundle(&feeds, &BundleOptions::default()).await.unwrap();

        assert_eq!(
            std::str::from_utf8(&out).unwrap(),
            "/* @org/pkg@2.1.0 */\n.a{color:red}\n/* @org/pkg@2.1.0 */\n.b{color:blue}\n"
        );
    }

    #[tokio::test]
    async fn rejects_js_records() {
        let feeds = vec![ParsedFeed::new(vec![FeedRecord::Js(JsModule {
            id: "m".into(),
            entry: None,
            source: String::new(),
            deps: Default::default(),
            file: "m.js".into(),
        })])];

        let err = CssBundler::new().bundle(&feeds, &BundleOptions::default()).await.unwrap_err();
        assert!(matches!(
            err,
            BundlerError::WrongAssetType { found: AssetType::Js, expected: AssetType::Css, .. }
        ));
    }

    #[tokio::test]
    async fn empty_input_is_rejected() {
        let err = CssBundler::new().bundle(&[], &BundleOptions::default()).await.unwrap_err();
        assert!(matches!(err, BundlerError::Empty));
    }
}
