use async_trait::async_trait;
use bytes::Bytes;

use super::{ensure_asset_type, unique_records};
use crate::{AssetType, Bundler, BundleOptions, BundlerError, FeedRecord, ParsedFeed};

const PRELUDE: &str = r#"(function (modules, entries) {
  var cache = {};
  function load(id) {
    if (cache[id]) return cache[id].exports;
    var def = modules[id];
    if (!def) throw new Error("Cannot find module '" + id + "'");
    var module = cache[id] = { exports: {} };
    def[0].call(module.exports, function (request) {
      var dep = def[1][request];
      return load(dep === undefined ? request : dep);
    }, module, module.exports);
    return module.exports;
  }
  for (var i = 0; i < entries.length; i++) load(entries[i]);
})({
"#;

/// Packs CommonJS module records into one self-executing module map.
///
/// Modules are keyed by id in first-seen order and entry modules run in
/// order. The output is a pure function of the records and options.
#[derive(Debug, Clone, Default)]
pub struct JsBundler;

impl JsBundler {
    pub fn new() -> Self {
        Self
    }
}

fn js_string(s: &str) -> Result<String, BundlerError> {
    serde_json::to_string(s).map_err(BundlerError::other)
}

#[async_trait]
impl Bundler for JsBundler {
    async fn bundle(&self, feeds: &[ParsedFeed], options: &BundleOptions) -> Result<Bytes, BundlerError> {
        ensure_asset_type(feeds, AssetType::Js)?;

        let modules: Vec<_> = unique_records(feeds)
            .into_iter()
            .filter_map(|r| match r {
                FeedRecord::Js(m) => Some(m),
                FeedRecord::Css(_) => None,
            })
            .collect();

        if modules.is_empty() {
            return Err(BundlerError::Empty);
        }

        let mut out = String::new();
        if let Some(env) = &options.env {
            out.push_str(&format!("var process = {{ env: {{ NODE_ENV: {} }} }};\n", js_string(env)?));
        }
        out.push_str(PRELUDE);

        for (i, module) in modules.iter().enumerate() {
            let deps = serde_json::to_string(&module.deps).map_err(BundlerError::other)?;
            out.push_str(&format!(
                "{}: [function (require, module, exports) {{\n{}\n}}, {}]",
                js_string(&module.id)?,
                module.source,
                deps
            ));
            out.push_str(if i + 1 < modules.len() { ",\n" } else { "\n" });
        }

        let entries = modules
            .iter()
            .filter(|m| m.is_entry())
            .map(|m| js_string(&m.id))
            .collect::<Result<Vec<_>, _>>()?;
        out.push_str(&format!("}}, [{}]);\n", entries.join(", ")));

        Ok(Bytes::from(out))
    }
}
