use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AssetType;

/// One CommonJS module as produced by a module-graph walker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct JsModule {
    #[validate(length(min = 1, message = "id must not be empty"))]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<bool>,

    pub source: String,

    /// Request string as written in `require(...)` → id of the resolved module.
    #[serde(default)]
    pub deps: BTreeMap<String, String>,

    #[validate(length(min = 1, message = "file must not be empty"))]
    pub file: String,
}

impl JsModule {
    pub fn is_entry(&self) -> bool {
        self.entry.unwrap_or(false)
    }
}

/// One stylesheet of a published CSS package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CssModule {
    #[validate(length(min = 1, message = "id must not be empty"))]
    pub id: String,

    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,

    #[validate(length(min = 1, message = "version must not be empty"))]
    pub version: String,

    #[validate(length(min = 1, message = "file must not be empty"))]
    pub file: String,

    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeedRecord {
    Js(JsModule),
    Css(CssModule),
}

impl FeedRecord {
    pub fn asset_type(&self) -> AssetType {
        match self {
            FeedRecord::Js(_) => AssetType::Js,
            FeedRecord::Css(_) => AssetType::Css,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            FeedRecord::Js(m) => &m.id,
            FeedRecord::Css(m) => &m.id,
        }
    }

    pub fn validate(&self) -> Result<(), validator::ValidationErrors> {
        match self {
            FeedRecord::Js(m) => m.validate(),
            FeedRecord::Css(m) => m.validate(),
        }
    }
}

/// Stored feed documents are either one record or an array of records.
#[derive(Deserialize)]
#[serde(untagged)]
enum FeedDocument {
    Many(Vec<FeedRecord>),
    One(FeedRecord),
}

impl From<FeedDocument> for ParsedFeed {
    fn from(doc: FeedDocument) -> Self {
        match doc {
            FeedDocument::Many(records) => ParsedFeed { records },
            FeedDocument::One(record) => ParsedFeed {
                records: vec![record],
            },
        }
    }
}

/// Decoded feed: its module records in stored order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FeedDocument", into = "Vec<FeedRecord>")]
pub struct ParsedFeed {
    pub records: Vec<FeedRecord>,
}

impl From<ParsedFeed> for Vec<FeedRecord> {
    fn from(feed: ParsedFeed) -> Self {
        feed.records
    }
}

impl ParsedFeed {
    pub fn new(records: Vec<FeedRecord>) -> Self {
        Self { records }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn js_modules(&self) -> impl Iterator<Item = &JsModule> {
        self.records.iter().filter_map(|r| match r {
            FeedRecord::Js(m) => Some(m),
            FeedRecord::Css(_) => None,
        })
    }

    pub fn css_modules(&self) -> impl Iterator<Item = &CssModule> {
        self.records.iter().filter_map(|r| match r {
            FeedRecord::Css(m) => Some(m),
            FeedRecord::Js(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_js_record_decodes_as_one_element_feed() {
        let feed: ParsedFeed = serde_json::from_value(json!({
            "id": "a",
            "entry": true,
            "source": "console.log(1)",
            "deps": {"./b": "b"},
            "file": "a.js"
        }))
        .unwrap();

        assert_eq!(feed.records.len(), 1);
        let module = feed.js_modules().next().unwrap();
        assert!(module.is_entry());
        assert_eq!(module.deps.get("./b").map(String::as_str), Some("b"));
    }

    #[test]
    fn css_array_decodes_as_css_records() {
        let feed: ParsedFeed = serde_json::from_value(json!([
            {"id": "x", "name": "pkg", "version": "1.0.0", "file": "x.css", "content": "a{}"},
            {"id": "y", "name": "pkg", "version": "1.0.0", "file": "y.css", "content": "b{}"}
        ]))
        .unwrap();

        assert_eq!(feed.css_modules().count(), 2);
        assert!(feed.records.iter().all(|r| r.asset_type() == AssetType::Css));
    }

    #[test]
    fn unrecognised_shapes_fail_to_decode() {
        assert!(serde_json::from_value::<ParsedFeed>(json!({"hello": "world"})).is_err());
        assert!(serde_json::from_value::<ParsedFeed>(json!("text")).is_err());
    }

    #[test]
    fn serializes_back_to_an_array() {
        let feed = ParsedFeed::new(vec![FeedRecord::Css(CssModule {
            id: "x".into(),
            name: "pkg".into(),
            version: "1.0.0".into(),
            file: "x.css".into(),
            content: "a{}".into(),
        })]);

        let value = serde_json::to_value(&feed).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["name"], "pkg");
    }
}
