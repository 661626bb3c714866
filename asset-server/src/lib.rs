use std::sync::Arc;

use anyhow::{bail, Context};
use asset_axum::{AssetApp, AssetState, MemoryMetaStore, DEFAULT_BODY_LIMIT};
use asset_core::AssetConfig;
use asset_pipeline::{Pipeline, PipelineSettings};
use asset_sink::{FsSink, MemorySink, Sink};

pub const ENV_PREFIX: &str = "ASSET__";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 7100;

/// Environment overrides on top of the built-in defaults.
pub fn load_config() -> AssetConfig {
    let mut config = AssetConfig::new();
    config.load_env(ENV_PREFIX);
    apply_defaults(&mut config);
    config
}

/// Fill every key nothing has set yet. `public.url` follows the listen address.
pub fn apply_defaults(config: &mut AssetConfig) {
    config.set_default("http.host", DEFAULT_HOST);
    config.set_default("http.port", DEFAULT_PORT.to_string());

    let public_url = format!("http://{}", listen_addr(config));
    config.set_default("public.url", public_url);
    config.set_default("sink.kind", "memory");
    config.set_default("body.limit_bytes", DEFAULT_BODY_LIMIT.to_string());
}

pub fn listen_addr(config: &AssetConfig) -> String {
    let host = config.get("http.host").unwrap_or(DEFAULT_HOST);
    let port = config.get("http.port").map(str::to_string).unwrap_or_else(|| DEFAULT_PORT.to_string());
    format!("{host}:{port}")
}

async fn open_sink(config: &AssetConfig) -> anyhow::Result<Arc<dyn Sink>> {
    match config.get("sink.kind").unwrap_or("memory") {
        "memory" => Ok(Arc::new(MemorySink::new())),
        "fs" => {
            let root = config.get("sink.path").context("sink.kind=fs requires sink.path")?;
            let sink = FsSink::open(root)
                .await
                .with_context(|| format!("failed to open sink directory {root}"))?;
            Ok(Arc::new(sink))
        }
        other => bail!("unknown sink.kind '{other}', expected 'memory' or 'fs'"),
    }
}

pub async fn build(config: &AssetConfig) -> anyhow::Result<AssetApp> {
    let snapshot = config.snapshot();
    let sink = open_sink(config).await?;
    tracing::info!(sink = sink.kind(), "sink ready");

    let pipeline = Pipeline::with_settings(PipelineSettings::from_snapshot(&snapshot));
    let public_url = config
        .get("public.url")
        .map(str::to_string)
        .unwrap_or_else(|| format!("http://{}", listen_addr(config)));
    let state = AssetState::from_parts(sink, Arc::new(MemoryMetaStore::new()), Arc::new(pipeline), &public_url);

    let limit = snapshot.get_usize("body.limit_bytes").unwrap_or(DEFAULT_BODY_LIMIT);
    Ok(AssetApp::with_body_limit(state, limit))
}
