#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
mod gate;
mod snapshot;
mod store;

pub use error::{CacheError, CacheResult};
pub use gate::{CacheDecision, CacheGate, RebuildReason, is_fresh};
pub use snapshot::{SNAPSHOT_VERSION, Snapshot};
pub use store::SnapshotStore;

/// Tracing target for cache operations.
pub const TRACING_TARGET: &str = "folio_cache";
