//! Axum adapter for the asset bundling pipeline.
//!
//! Exposes feed ingestion, bundle creation and retrieval of stored objects
//! over HTTP, rendering every failure as the classified JSON error body.

pub mod app;
pub mod meta;
pub mod routes;
pub mod state;
mod error;

pub use app::{AssetApp, DEFAULT_BODY_LIMIT};
pub use error::AssetAxumError;
pub use meta::{MemoryMetaStore, MetaStore};
pub use state::AssetState;
