//! Site build engine.
//!
//! This module provides the runtime for building a site:
//! - [`SiteBuilder`]: runs a complete build
//! - [`TreeAssembler`]: fetches complete block trees
//! - [`BuildContext`]: per-build shared state
//! - [`BuildConfig`]: configuration options
//! - [`BuildReport`]: per-document outcomes

mod assembler;
mod builder;
mod config;
mod context;
mod report;
mod writer;

pub use assembler::TreeAssembler;
pub use builder::SiteBuilder;
pub use config::{BuildConfig, BuildConfigBuilder};
pub use context::BuildContext;
pub use report::{BuildReport, DocumentOutcome, DocumentReport};
pub use writer::PageWriter;

/// Tracing target for engine operations.
pub(crate) const TRACING_TARGET: &str = "folio_runtime::engine";
