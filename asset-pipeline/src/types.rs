use std::fmt;
use std::str::FromStr;

use asset_core::{bail_asset, AssetError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Largest feed-id list a single bundle request may name.
pub const MAX_FEEDS_PER_BUNDLE: usize = 100;

static FEED_FILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9._-]+\.(json|js)$").expect("feed file regex should compile"));

/// Feed ids are used verbatim as sink keys, so case is kept.
pub(crate) static FEED_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[a-z0-9._-]+\.(json|js)$").expect("feed id regex should compile"));

static BUNDLE_FILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9._-]+\.(js|css)$").expect("bundle file regex should compile"));

/// Which bundler and MIME type apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Js,
    Css,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Js => "js",
            AssetType::Css => "css",
        }
    }

    /// File extension of bundles of this type.
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            AssetType::Js => "application/javascript",
            AssetType::Css => "text/css",
        }
    }

    /// Type of a stored bundle, judged by its file extension.
    pub fn from_file_name(name: &str) -> Option<AssetType> {
        match name.rsplit_once('.')?.1 {
            "js" => Some(AssetType::Js),
            "css" => Some(AssetType::Css),
            _ => None,
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "js" => Ok(AssetType::Js),
            "css" => Ok(AssetType::Css),
            other => Err(AssetError::bad_request(format!(
                "Unsupported asset type '{other}', expected 'js' or 'css'"
            ))),
        }
    }
}

/// Key of a stored feed blob, as named by a client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedId(String);

impl FeedId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id names a stored JSON feed document.
    pub fn is_json_reference(&self) -> bool {
        self.0.to_ascii_lowercase().ends_with(".json")
    }
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered, non-empty list of at most [`MAX_FEEDS_PER_BUNDLE`] feed ids,
/// each matching `^[a-zA-Z0-9._-]+\.(json|js)$` with no `..` run.
///
/// Only [`crate::validate::feed_id_list`] and [`FeedIdList::new`] construct
/// one, so holding a `FeedIdList` means the bundle precondition holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedIdList(Vec<FeedId>);

impl FeedIdList {
    pub fn new<I, S>(ids: I) -> Result<Self, AssetError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        crate::validate::check_feed_ids(&ids)?;
        Ok(Self(ids.into_iter().map(FeedId).collect()))
    }

    pub(crate) fn from_checked(ids: Vec<String>) -> Self {
        Self(ids.into_iter().map(FeedId).collect())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FeedId> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[FeedId] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a FeedIdList {
    type Item = &'a FeedId;
    type IntoIter = std::slice::Iter<'a, FeedId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A file name requested from a `GET` route: trimmed, lowercased, and
/// matched against the allowed pattern for its namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileName(String);

impl FileName {
    /// Names under `/feed/`: `^[a-z0-9._-]+\.(json|js)$`.
    pub fn feed(raw: &str) -> Result<Self, AssetError> {
        Self::parse(raw, &FEED_FILE_RE, "json or js")
    }

    /// Names under `/bundle/`: `^[a-z0-9._-]+\.(js|css)$`.
    pub fn bundle(raw: &str) -> Result<Self, AssetError> {
        Self::parse(raw, &BUNDLE_FILE_RE, "js or css")
    }

    fn parse(raw: &str, pattern: &Regex, extensions: &str) -> Result<Self, AssetError> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            bail_asset!(bad_request, "File name is required");
        }
        if !pattern.is_match(&normalized) {
            bail_asset!(
                bad_request,
                "Invalid file name '{}': expected [a-z0-9._-] ending in {}",
                normalized,
                extensions
            );
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lowercase hex SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(pub(crate) String);

impl ContentHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `{hash}.{ext}`, the key an artifact is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoredObjectName(String);

impl StoredObjectName {
    /// Name of a bundle: `{hash}.js` or `{hash}.css`.
    pub fn artifact(hash: &ContentHash, asset_type: AssetType) -> Self {
        Self(format!("{}.{}", hash, asset_type.extension()))
    }

    /// Name of an ingested raw feed: `{hash}.json`.
    pub fn feed(hash: &ContentHash) -> Self {
        Self(format!("{hash}.json"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for StoredObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a successful upload hands back: `{file, uri}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub file: String,
    pub uri: String,
}

impl UploadReceipt {
    pub fn new(name: StoredObjectName, base_uri: &str) -> Self {
        let uri = format!("{base_uri}{name}");
        Self {
            file: name.into_string(),
            uri,
        }
    }
}
