//! Input schemas checked before any sink access.
//!
//! Every rejection is a `BadRequest` whose `errors` map field paths to
//! messages, e.g. `{"[2]": ["is required"]}`.

use asset_core::{AssetError, AssetResult};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::types::FEED_ID_RE;
use crate::{AssetType, FeedIdList, ParsedFeed, MAX_FEEDS_PER_BUNDLE};

/// Accumulates `path -> [messages]`.
#[derive(Debug, Default)]
pub struct SchemaErrors {
    map: Map<String, Value>,
}

impl SchemaErrors {
    pub fn push_schema(&mut self, msg: impl Into<String>) {
        self.push_field("_schema", msg);
    }

    pub fn push_field(&mut self, field: &str, msg: impl Into<String>) {
        let msg = Value::String(msg.into());
        match self.map.get_mut(field) {
            Some(Value::Array(arr)) => arr.push(msg),
            _ => {
                self.map.insert(field.to_string(), Value::Array(vec![msg]));
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn into_bad_request(self, message: &str) -> AssetError {
        AssetError::bad_request(message).with_errors(Value::Object(self.map))
    }
}

fn message_of(e: &ValidationError) -> String {
    if let Some(message) = &e.message {
        return message.to_string();
    }
    match &*e.code {
        "required" => "is required".to_string(),
        "length" => "has invalid length".to_string(),
        code => code.to_string(),
    }
}

impl SchemaErrors {
    /// Record every `validator` failure under its path below `prefix`,
    /// e.g. `[1].file` or `[0].deps[2]`.
    fn absorb(&mut self, prefix: &str, errs: &ValidationErrors) {
        for (field, kind) in errs.errors() {
            let path = if prefix.is_empty() {
                field.to_string()
            } else {
                format!("{prefix}.{field}")
            };
            match kind {
                ValidationErrorsKind::Field(list) => {
                    for e in list {
                        self.push_field(&path, message_of(e));
                    }
                }
                ValidationErrorsKind::Struct(nested) => self.absorb(&path, nested),
                ValidationErrorsKind::List(items) => {
                    for (idx, nested) in items {
                        self.absorb(&format!("{path}[{idx}]"), nested);
                    }
                }
            }
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
struct FeedIdListSchema {
    #[validate(length(min = 1, max = 100, message = "must contain between 1 and 100 feed ids"))]
    ids: Vec<String>,
}

/// Length and per-entry checks shared by every way of building a [`FeedIdList`].
pub(crate) fn check_feed_ids(ids: &[String]) -> AssetResult<()> {
    const MESSAGE: &str = "Feed id list validation failed";

    let schema = FeedIdListSchema { ids: ids.to_vec() };
    let mut errors = SchemaErrors::default();

    if let Err(e) = schema.validate() {
        for err in e.field_errors().values().flat_map(|list| list.iter()) {
            errors.push_schema(message_of(err));
        }
    }

    for (idx, id) in ids.iter().enumerate() {
        let path = format!("[{idx}]");
        if id.trim().is_empty() {
            errors.push_field(&path, "is required");
        } else if !FEED_ID_RE.is_match(id) {
            errors.push_field(&path, "must be a file name of [a-zA-Z0-9._-] ending in .json or .js");
        } else if id.contains("..") {
            errors.push_field(&path, "must not contain '..'");
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.into_bad_request(MESSAGE))
    }
}

fn parse_json_body(body: &[u8], empty_message: &str) -> AssetResult<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AssetError::bad_request(empty_message));
    }
    serde_json::from_slice(body).map_err(|e| {
        AssetError::bad_request("Failed to parse the request body as JSON")
            .with_errors(json!({"_schema": [e.to_string()]}))
            .with_source(e)
    })
}

/// Validate a request body naming the feeds to bundle.
///
/// Must be a JSON array of 1 to 100 non-empty strings.
pub fn feed_id_list(body: &[u8]) -> AssetResult<FeedIdList> {
    const MESSAGE: &str = "Feed id list validation failed";

    let value = parse_json_body(body, "Request body is empty, expected a JSON array of feed ids")?;
    let Value::Array(entries) = value else {
        let mut errors = SchemaErrors::default();
        errors.push_schema("must be an array of feed ids");
        return Err(errors.into_bad_request(MESSAGE));
    };

    let mut errors = SchemaErrors::default();
    let mut ids = Vec::with_capacity(entries.len().min(MAX_FEEDS_PER_BUNDLE));
    for (idx, entry) in entries.into_iter().enumerate() {
        match entry {
            Value::String(s) => ids.push(s),
            _ => errors.push_field(&format!("[{idx}]"), "must be a string"),
        }
    }
    if !errors.is_empty() {
        return Err(errors.into_bad_request(MESSAGE));
    }

    check_feed_ids(&ids)?;
    Ok(FeedIdList::from_checked(ids))
}

/// Validate a raw feed upload for the given asset type.
///
/// The payload must decode as one module record or a non-empty array of
/// them, all of `asset_type`, each passing its field rules.
pub fn raw_feed(asset_type: AssetType, payload: &[u8]) -> AssetResult<ParsedFeed> {
    const MESSAGE: &str = "Feed schema validation failed";

    let value = parse_json_body(payload, "Feed payload is empty")?;
    let feed: ParsedFeed = serde_json::from_value(value).map_err(|e| {
        AssetError::bad_request(format!("Feed payload is not a valid {asset_type} feed"))
            .with_errors(json!({"_schema": [e.to_string()]}))
            .with_source(e)
    })?;

    let mut errors = SchemaErrors::default();
    if feed.is_empty() {
        errors.push_schema("must contain at least one module record");
    }
    for (idx, record) in feed.records.iter().enumerate() {
        let path = format!("[{idx}]");
        if record.asset_type() != asset_type {
            errors.push_field(&path, format!("expected a {asset_type} module record"));
            continue;
        }
        if let Err(e) = record.validate() {
            errors.absorb(&path, &e);
        }
    }

    if errors.is_empty() {
        Ok(feed)
    } else {
        Err(errors.into_bad_request(MESSAGE))
    }
}
