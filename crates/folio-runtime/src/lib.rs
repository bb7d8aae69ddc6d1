#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod engine;
mod error;
pub mod prelude;
mod seed;

pub use error::{BuildError, BuildResult};
pub use seed::resolve_seed;

/// Tracing target for runtime operations.
pub const TRACING_TARGET: &str = "folio_runtime";
