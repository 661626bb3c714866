//! # asset-sink: key/blob storage for feeds and bundles
//!
//! The bundling pipeline only needs two primitives from storage: read the
//! whole object under a key, and create-or-overwrite the object under a key.
//! [`Sink`] is that contract. Absence is reported through a structured
//! [`SinkError::NotFound`] so callers can tell a permanent miss from a
//! transient failure without inspecting messages.
//!
//! ```rust
//! use asset_sink::{MemorySink, Sink};
//! use bytes::Bytes;
//!
//! # #[tokio::main]
//! # async fn main() -> asset_sink::SinkResult<()> {
//! let sink = MemorySink::new();
//! sink.set("feed.json", Bytes::from_static(b"[]")).await?;
//! assert_eq!(sink.get("feed.json").await?, Bytes::from_static(b"[]"));
//! assert!(sink.get("other.json").await.unwrap_err().is_not_found());
//! # Ok(())
//! # }
//! ```

mod error;
mod fs;
mod memory;
pub mod store;

pub use error::{SinkError, SinkResult};
pub use fs::FsSink;
pub use memory::MemorySink;
pub use store::Sink;
