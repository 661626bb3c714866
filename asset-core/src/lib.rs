//! asset-core: error classification and configuration shared by the asset
//! bundling crates.

pub mod config;
pub mod errors;

pub use config::{AssetConfig, AssetConfigSnapshot};
pub use errors::{AssetError, AssetResult, ErrorKind};
